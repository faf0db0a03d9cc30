use super::*;

fn line(start: usize, end: usize) -> VisualLine {
    VisualLine { start, end }
}

fn texts(text: &str, lines: &[VisualLine]) -> Vec<String> {
    lines
        .iter()
        .map(|l| text.chars().skip(l.start).take(l.len()).collect())
        .collect()
}

#[test]
fn hard_breaks_split_on_newlines_only() {
    let text = "alpha beta\ngamma\n";
    let lines = HardBreaks.visual_lines(3, text);
    assert_eq!(lines, vec![line(0, 10), line(11, 16), line(17, 17)]);
}

#[test]
fn empty_text_has_one_empty_line() {
    assert_eq!(HardBreaks.visual_lines(0, ""), vec![line(0, 0)]);
    assert_eq!(wrap_lines("", 10), vec![line(0, 0)]);
}

#[test]
fn wrap_breaks_before_overflowing_word() {
    let text = "the quick brown fox";
    let lines = wrap_lines(text, 10);
    assert_eq!(texts(text, &lines), ["the quick ", "brown fox"]);
    assert_eq!(lines, vec![line(0, 10), line(10, 19)]);
}

#[test]
fn wrap_respects_explicit_newlines() {
    let text = "one two\nthree four five";
    let lines = wrap_lines(text, 10);
    assert_eq!(texts(text, &lines), ["one two", "three four ", "five"]);
    assert_eq!(lines[1].start, 8);
}

#[test]
fn wrap_breaks_long_words_by_char() {
    let text = "abcdefghij";
    let lines = wrap_lines(text, 4);
    assert_eq!(texts(text, &lines), ["abcd", "efgh", "ij"]);
}

#[test]
fn wrap_counts_wide_chars_as_two_columns() {
    let text = "日本語テキスト";
    let lines = wrap_lines(text, 6);
    assert_eq!(texts(text, &lines), ["日本語", "テキス", "ト"]);
}

#[test]
fn soft_wrap_narrows_with_depth() {
    let layout = SoftWrap::new(20);
    assert_eq!(layout.available(0), 18);
    assert_eq!(layout.available(3), 12);
    assert_eq!(layout.available(50), 1);
}

#[test]
fn caret_on_wrap_boundary_belongs_to_next_line() {
    let lines = vec![line(0, 10), line(10, 19)];
    assert_eq!(line_index_at(&lines, 9), 0);
    assert_eq!(line_index_at(&lines, 10), 1);
    assert_eq!(line_index_at(&lines, 19), 1);

    let hard = vec![line(0, 5), line(6, 9)];
    assert_eq!(line_index_at(&hard, 5), 0);
    assert_eq!(line_index_at(&hard, 6), 1);
}

#[test]
fn columns_and_offsets_agree() {
    let text = "ab日本cd";
    let whole = line(0, 6);
    assert_eq!(column_at(text, whole, 3), 4);
    assert_eq!(offset_at_column(text, whole, 4), 3);
    assert_eq!(offset_at_column(text, whole, 3), 2);
    assert_eq!(offset_at_column(text, whole, 99), 6);
}

#[test]
fn offset_at_column_stays_on_its_line() {
    let text = "abc\ndefgh";
    let second = line(4, 9);
    assert_eq!(offset_at_column(text, second, 0), 4);
    assert_eq!(offset_at_column(text, second, 2), 6);
    assert_eq!(offset_at_column(text, line(0, 3), 10), 3);
}

#[test]
fn offset_in_wrapped_line_stops_before_the_boundary() {
    let text = "the quick brown fox";
    let lines = wrap_lines(text, 10);
    assert_eq!(offset_in_line(text, &lines, 0, 15), 9);
    assert_eq!(line_index_at(&lines, offset_in_line(text, &lines, 0, 15)), 0);
    assert_eq!(offset_in_line(text, &lines, 0, 3), 3);
    assert_eq!(offset_in_line(text, &lines, 1, 30), 19);

    let hard = HardBreaks.visual_lines(0, "abc\ndefgh");
    assert_eq!(offset_in_line("abc\ndefgh", &hard, 0, 10), 3);
}
