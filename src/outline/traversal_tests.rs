use super::outline_tests::{block, find, page};
use super::*;

/// a
///   a1
///     a1x
///   a2
/// b
/// c
///   c1
fn fixture() -> Outline {
    page(vec![
        block("a").with_children(vec![
            block("a1").with_children(vec![block("a1x")]),
            block("a2"),
        ]),
        block("b"),
        block("c").with_children(vec![block("c1")]),
    ])
}

fn order(outline: &Outline) -> Vec<String> {
    outline
        .preorder()
        .map(|(_, block)| block.content().to_string())
        .collect()
}

#[test]
fn preorder_visits_parents_before_children() {
    let outline = fixture();
    assert_eq!(order(&outline), ["a", "a1", "a1x", "a2", "b", "c", "c1"]);
    let depths: Vec<usize> = outline.preorder().map(|(depth, _)| depth).collect();
    assert_eq!(depths, [0, 1, 2, 1, 0, 0, 1]);
}

#[test]
fn next_block_descends_then_climbs() {
    let outline = fixture();
    let next = |from: &str| {
        outline
            .next_block(find(&outline, from))
            .unwrap()
            .map(|id| outline.content(id).unwrap().to_string())
    };

    assert_eq!(next("a").as_deref(), Some("a1"));
    assert_eq!(next("a1x").as_deref(), Some("a2"));
    assert_eq!(next("a2").as_deref(), Some("b"));
    assert_eq!(next("b").as_deref(), Some("c"));
    assert_eq!(next("c1"), None);
}

#[test]
fn prev_block_returns_parent_or_deepest_descendant() {
    let outline = fixture();
    let prev = |from: &str| {
        outline
            .prev_block(find(&outline, from))
            .unwrap()
            .map(|id| outline.content(id).unwrap().to_string())
    };

    assert_eq!(prev("a1").as_deref(), Some("a"));
    assert_eq!(prev("a2").as_deref(), Some("a1x"));
    assert_eq!(prev("b").as_deref(), Some("a2"));
    assert_eq!(prev("c1").as_deref(), Some("c"));
    assert_eq!(prev("a"), None);
}

#[test]
fn next_and_prev_are_inverse_across_the_document() {
    let outline = fixture();
    let ids: Vec<BlockId> = outline.preorder().map(|(_, block)| block.id()).collect();

    for pair in ids.windows(2) {
        assert_eq!(outline.next_block(pair[0]).unwrap(), Some(pair[1]));
        assert_eq!(outline.prev_block(pair[1]).unwrap(), Some(pair[0]));
    }
}

#[test]
fn first_and_last_blocks() {
    let outline = fixture();
    assert_eq!(outline.first_block(), Some(find(&outline, "a")));
    assert_eq!(outline.last_block(), Some(find(&outline, "c1")));
    assert_eq!(
        outline.last_descendant(find(&outline, "a")).unwrap(),
        find(&outline, "a2")
    );
    let b = find(&outline, "b");
    assert_eq!(outline.last_descendant(b).unwrap(), b);
    assert_eq!(outline.first_child(b).unwrap(), None);
}

#[test]
fn traversal_of_unknown_block_is_an_error() {
    let outline = fixture();
    let stranger = BlockId::new();
    assert_eq!(
        outline.next_block(stranger),
        Err(OutlineError::UnknownBlock(stranger))
    );
    assert_eq!(
        outline.prev_block(stranger),
        Err(OutlineError::UnknownBlock(stranger))
    );
}
