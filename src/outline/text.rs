//! Block content is addressed by char offsets; these convert to byte positions.

pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn clamp_offset(text: &str, offset: usize) -> usize {
    offset.min(char_len(text))
}

pub fn byte_index(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    text.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(text.len())
}

/// Splits `text` at a char offset, clamping past-the-end offsets.
pub fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    text.split_at(byte_index(text, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_index_handles_multibyte_chars() {
        let text = "añb€c";
        assert_eq!(byte_index(text, 0), 0);
        assert_eq!(byte_index(text, 2), 3);
        assert_eq!(byte_index(text, 4), 6);
        assert_eq!(byte_index(text, 5), text.len());
        assert_eq!(byte_index(text, 42), text.len());
    }

    #[test]
    fn split_at_char_clamps() {
        assert_eq!(split_at_char("héllo", 2), ("hé", "llo"));
        assert_eq!(split_at_char("abc", 10), ("abc", ""));
        assert_eq!(split_at_char("", 0), ("", ""));
    }

    #[test]
    fn clamp_offset_counts_chars() {
        assert_eq!(clamp_offset("日本", 5), 2);
        assert_eq!(clamp_offset("日本", 1), 1);
    }
}
