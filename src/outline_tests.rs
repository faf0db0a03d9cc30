use super::*;

pub(crate) fn block(content: &str) -> BlockRecord {
    BlockRecord::new(content)
}

pub(crate) fn page(children: Vec<BlockRecord>) -> Outline {
    Outline::from_record(BlockRecord::new("").with_children(children)).unwrap()
}

pub(crate) fn find(outline: &Outline, content: &str) -> BlockId {
    outline
        .preorder()
        .find(|(_, block)| block.content() == content)
        .map(|(_, block)| block.id())
        .unwrap_or_else(|| panic!("no block with content {content:?}"))
}

pub(crate) fn contents(outline: &Outline, ids: &[BlockId]) -> Vec<String> {
    ids.iter()
        .map(|id| outline.content(*id).unwrap().to_string())
        .collect()
}

#[test]
fn construction_links_every_child_to_its_parent() {
    let outline = page(vec![
        block("a").with_children(vec![block("a1").with_children(vec![block("a1x")])]),
        block("b"),
    ]);
    let a = find(&outline, "a");
    let a1 = find(&outline, "a1");
    let a1x = find(&outline, "a1x");

    assert_eq!(outline.parent(a).unwrap(), Some(outline.root()));
    assert_eq!(outline.parent(a1).unwrap(), Some(a));
    assert_eq!(outline.parent(a1x).unwrap(), Some(a1));
    assert_eq!(outline.len(), 5);
    outline.validate().unwrap();
}

#[test]
fn new_outline_has_one_empty_block() {
    let outline = Outline::new();
    let first = outline.first_block().unwrap();
    assert_eq!(outline.content(first).unwrap(), "");
    assert_eq!(outline.children(outline.root()).unwrap(), &[first]);
    outline.validate().unwrap();
}

#[test]
fn ensure_initialized_only_fills_empty_documents() {
    let mut outline = Outline::from_record(BlockRecord::new("")).unwrap();
    let added = outline.ensure_initialized();
    assert!(added.is_some());
    assert_eq!(outline.ensure_initialized(), None);
    assert_eq!(outline.len(), 2);
}

#[test]
fn parent_and_index_reports_position() {
    let outline = page(vec![block("a"), block("b"), block("c")]);
    let c = find(&outline, "c");
    assert_eq!(
        outline.parent_and_index(c).unwrap(),
        Some((outline.root(), 2))
    );
    assert_eq!(outline.parent_and_index(outline.root()).unwrap(), None);
}

#[test]
fn parent_and_index_flags_orphans() {
    let mut outline = page(vec![block("a"), block("b")]);
    let root = outline.root();
    let b = find(&outline, "b");
    outline
        .blocks_mut()
        .get_mut(&root)
        .unwrap()
        .children
        .retain(|id| *id != b);

    assert_eq!(
        outline.parent_and_index(b),
        Err(OutlineError::Orphaned {
            block: b,
            parent: root
        })
    );
    assert_eq!(
        outline.validate(),
        Err(OutlineError::Orphaned {
            block: b,
            parent: root
        })
    );
}

#[test]
fn unknown_ids_are_errors() {
    let outline = Outline::new();
    let stranger = BlockId::new();
    assert_eq!(
        outline.content(stranger),
        Err(OutlineError::UnknownBlock(stranger))
    );
    assert!(!outline.contains(stranger));
}

#[test]
fn validate_detects_parent_mismatch() {
    let mut outline = page(vec![block("a"), block("b")]);
    let a = find(&outline, "a");
    let b = find(&outline, "b");
    outline.blocks_mut().get_mut(&b).unwrap().parent = Some(a);

    assert_eq!(
        outline.validate(),
        Err(OutlineError::ParentMismatch {
            child: b,
            listed_by: outline.root(),
            recorded: Some(a),
        })
    );
}

#[test]
fn validate_detects_double_listing() {
    let mut outline = page(vec![block("a").with_children(vec![block("x")]), block("b")]);
    let a = find(&outline, "a");
    let x = find(&outline, "x");
    outline.blocks_mut().get_mut(&a).unwrap().children.push(x);

    assert_eq!(outline.validate(), Err(OutlineError::Cycle(x)));
}

#[test]
fn from_record_rejects_duplicate_ids() {
    let shared = BlockId::new();
    let record = BlockRecord::new("").with_children(vec![
        block("a").with_id(shared),
        block("b").with_id(shared),
    ]);
    assert_eq!(
        Outline::from_record(record),
        Err(OutlineError::DuplicateId(shared))
    );
}

#[test]
fn depth_and_ancestors_skip_the_root() {
    let outline = page(vec![block("a").with_children(vec![
        block("b").with_children(vec![block("c")]),
    ])]);
    let a = find(&outline, "a");
    let b = find(&outline, "b");
    let c = find(&outline, "c");

    assert_eq!(outline.depth(a).unwrap(), 0);
    assert_eq!(outline.depth(c).unwrap(), 2);
    assert_eq!(outline.ancestors(c).unwrap(), vec![a, b]);
}

#[test]
fn record_round_trip_preserves_ids_and_structure() {
    let outline = page(vec![
        block("one").with_children(vec![block("two").with_children(vec![block("three")])]),
        block(""),
    ]);
    let record = outline.to_record().unwrap();
    let rebuilt = Outline::from_record(record.clone()).unwrap();

    assert_eq!(rebuilt, outline);
    assert_eq!(rebuilt.to_record().unwrap(), record);
    rebuilt.validate().unwrap();
}

#[test]
fn records_omit_empty_children() {
    let leaf = block("leaf");
    let json = serde_json::to_value(&leaf).unwrap();
    assert!(json.get("children").is_none());
    assert_eq!(json["content"], "leaf");
    assert_eq!(json["id"], leaf.id.to_string());
}

#[test]
fn records_without_ids_get_fresh_ones() {
    let record: BlockRecord =
        serde_json::from_str(r#"{"content":"","children":[{"content":"a"},{"content":"b"}]}"#)
            .unwrap();
    let outline = Outline::from_record(record).unwrap();
    let a = find(&outline, "a");
    let b = find(&outline, "b");
    assert_ne!(a, b);
    outline.validate().unwrap();
}
