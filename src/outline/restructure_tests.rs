use super::outline_tests::{block, contents, find, page};
use super::*;

#[test]
fn split_without_children_inserts_next_sibling() {
    let mut outline = page(vec![block("foo"), block("bar")]);
    let foo = find(&outline, "foo");
    let root = outline.root();

    let split = outline.split_at(foo, "fo", "o").unwrap().unwrap();

    assert_eq!(outline.content(foo).unwrap(), "fo");
    assert_eq!(outline.content(split.new_block).unwrap(), "o");
    assert_eq!(split.parent, root);
    assert_eq!(
        contents(&outline, outline.children(root).unwrap()),
        ["fo", "o", "bar"]
    );
    assert_eq!(outline.parent(split.new_block).unwrap(), Some(root));
    outline.validate().unwrap();
}

#[test]
fn split_with_children_pushes_text_down_as_first_child() {
    let mut outline = page(vec![block("parent").with_children(vec![
        block("c1"),
        block("c2"),
    ])]);
    let parent = find(&outline, "parent");

    let split = outline.split_at(parent, "par", "ent").unwrap().unwrap();

    assert_eq!(outline.content(parent).unwrap(), "par");
    assert_eq!(split.parent, parent);
    assert_eq!(
        contents(&outline, outline.children(parent).unwrap()),
        ["ent", "c1", "c2"]
    );
    assert_eq!(split.changed(), vec![parent, split.new_block]);
    outline.validate().unwrap();
}

#[test]
fn split_of_root_is_a_no_op() {
    let mut outline = page(vec![block("a")]);
    let before = outline.clone();
    let root = outline.root();
    assert_eq!(outline.split_at(root, "x", "y").unwrap(), None);
    assert_eq!(outline, before);
}

#[test]
fn indent_moves_block_under_previous_sibling() {
    let mut outline = page(vec![
        block("a").with_children(vec![block("a1")]),
        block("b").with_children(vec![block("b1")]),
        block("c"),
    ]);
    let a = find(&outline, "a");
    let b = find(&outline, "b");
    let root = outline.root();

    let indented = outline.indent(b).unwrap().unwrap();

    assert_eq!(indented.parent, root);
    assert_eq!(indented.new_parent, a);
    assert_eq!(contents(&outline, outline.children(a).unwrap()), ["a1", "b"]);
    assert_eq!(contents(&outline, outline.children(b).unwrap()), ["b1"]);
    assert_eq!(contents(&outline, outline.children(root).unwrap()), ["a", "c"]);
    outline.validate().unwrap();
}

#[test]
fn indent_of_first_child_is_a_no_op() {
    let mut outline = page(vec![block("a"), block("b")]);
    let a = find(&outline, "a");
    let before = outline.clone();

    assert_eq!(outline.indent(a).unwrap(), None);
    assert_eq!(outline, before);
}

#[test]
fn outdent_adopts_following_siblings() {
    let mut outline = page(vec![
        block("p").with_children(vec![
            block("x"),
            block("y").with_children(vec![block("y1")]),
            block("z1"),
            block("z2"),
        ]),
        block("q"),
    ]);
    let p = find(&outline, "p");
    let y = find(&outline, "y");
    let root = outline.root();

    let outdented = outline.outdent(y).unwrap().unwrap();

    assert_eq!(outdented.parent, p);
    assert_eq!(outdented.grand_parent, root);
    assert_eq!(contents(&outline, &outdented.adopted), ["z1", "z2"]);
    assert_eq!(contents(&outline, outline.children(p).unwrap()), ["x"]);
    assert_eq!(
        contents(&outline, outline.children(y).unwrap()),
        ["y1", "z1", "z2"]
    );
    assert_eq!(
        contents(&outline, outline.children(root).unwrap()),
        ["p", "y", "q"]
    );
    assert_eq!(outline.parent(find(&outline, "z2")).unwrap(), Some(y));
    outline.validate().unwrap();
}

#[test]
fn outdent_of_top_level_block_is_a_no_op() {
    let mut outline = page(vec![block("a"), block("b")]);
    let b = find(&outline, "b");
    let before = outline.clone();

    assert_eq!(outline.outdent(b).unwrap(), None);
    assert_eq!(outline, before);
}

#[test]
fn outdent_undoes_indent() {
    let mut outline = page(vec![
        block("a").with_children(vec![block("a1")]),
        block("b").with_children(vec![block("b1")]),
        block("c"),
    ]);
    let b = find(&outline, "b");
    let before = outline.clone();

    outline.indent(b).unwrap().unwrap();
    outline.outdent(b).unwrap().unwrap();

    assert_eq!(outline, before);
}

#[test]
fn merge_appends_text_to_previous_block() {
    let mut outline = page(vec![
        block("a").with_children(vec![block("deep")]),
        block("tail"),
    ]);
    let deep = find(&outline, "deep");
    let tail = find(&outline, "tail");

    let merged = outline.merge_backward(tail).unwrap().unwrap();

    assert_eq!(merged.target, deep);
    assert_eq!(merged.offset, 4);
    assert_eq!(outline.content(deep).unwrap(), "deeptail");
    assert!(!outline.contains(tail));
    assert_eq!(
        contents(&outline, outline.children(outline.root()).unwrap()),
        ["a"]
    );
    outline.validate().unwrap();
}

#[test]
fn merge_of_first_child_lands_in_parent() {
    let mut outline = page(vec![block("héllo").with_children(vec![block("!")])]);
    let parent = find(&outline, "héllo");
    let child = find(&outline, "!");

    let merged = outline.merge_backward(child).unwrap().unwrap();

    assert_eq!(merged.target, parent);
    assert_eq!(merged.offset, 5);
    assert_eq!(outline.content(parent).unwrap(), "héllo!");
    assert!(outline.children(parent).unwrap().is_empty());
}

#[test]
fn merge_boundaries_are_no_ops() {
    let mut outline = page(vec![block("a").with_children(vec![block("a1")]), block("b")]);
    let a = find(&outline, "a");
    let before = outline.clone();

    assert_eq!(outline.merge_backward(a).unwrap(), None, "has children");
    assert_eq!(outline, before);

    let mut single = page(vec![block("only")]);
    let only = find(&single, "only");
    assert_eq!(single.merge_backward(only).unwrap(), None, "first block");
}

#[test]
fn indent_outdent_split_scenario() {
    let mut outline = page(vec![block("foo"), block("bar")]);
    let root = outline.root();
    let a = find(&outline, "foo");
    let b = find(&outline, "bar");

    outline.indent(b).unwrap().unwrap();
    assert_eq!(outline.children(root).unwrap(), &[a]);
    assert_eq!(outline.children(a).unwrap(), &[b]);

    outline.outdent(b).unwrap().unwrap();
    assert_eq!(outline.children(root).unwrap(), &[a, b]);
    assert!(outline.children(a).unwrap().is_empty());

    let split = outline.split_at(a, "fo", "o").unwrap().unwrap();
    assert_eq!(outline.content(a).unwrap(), "fo");
    assert_eq!(outline.children(root).unwrap(), &[a, split.new_block, b]);
    assert_eq!(outline.content(split.new_block).unwrap(), "o");
    outline.validate().unwrap();
}
