use xml_settings_core::XmlNode;

use crate::query_mappings::{QueryGroup, QueryMappings};

pub const ID: &str = "id";

/// What [`apply`] changed in a dbwatcher source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceChange {
    /// Upper-cased source id, when an `id` element exists.
    pub id: Option<String>,
    /// Wrapper elements appended for query groups that had source elements.
    pub wrappers: Vec<String>,
    /// Old query and dropped elements removed from the tree.
    pub removed: usize,
}

/// Restructure a dbwatcher source document for the new schema.
///
/// The first `id` element is upper-cased, each query group found in the
/// mappings is folded into its wrapper, dropped elements are removed, and the
/// appended elements are added empty at the end of the root.
pub fn apply(root: &mut XmlNode, mappings: &QueryMappings) -> SourceChange {
    let mut change = SourceChange {
        id: uppercase_id(root),
        ..SourceChange::default()
    };

    for group in &mappings.groups {
        let (wrapper, removed) = fold_group(root, group);
        change.removed += removed;
        if let Some(wrapper) = wrapper {
            change.wrappers.push(wrapper.tag.clone());
            root.children.push(wrapper);
        }
    }

    for tag in &mappings.dropped {
        change.removed += root.remove_descendants(tag);
    }

    for tag in &mappings.appended {
        root.children.push(XmlNode::new(tag.as_str()));
    }

    change
}

/// Output file name for a source file: stem upper-cased, extension kept.
pub fn output_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) => format!("{}{}", name[..dot].to_uppercase(), &name[dot..]),
        None => name.to_uppercase(),
    }
}

fn uppercase_id(root: &mut XmlNode) -> Option<String> {
    let id = root.find_first_mut(ID)?;
    let upper = id.text_content().to_uppercase();
    id.children.clear();
    id.text = (!upper.is_empty()).then(|| upper.clone());
    Some(upper)
}

/// Captured text of the first occurrence of one query source element.
struct QuerySnapshot {
    target: String,
    text: String,
    cdata: bool,
}

/// Build the wrapper for one group and strip its source elements.
///
/// Text is snapshotted from every source before anything is removed. The
/// wrapper exists only if at least one source element was present; sources
/// with empty text produce no child.
fn fold_group(root: &mut XmlNode, group: &QueryGroup) -> (Option<XmlNode>, usize) {
    let snapshots: Vec<QuerySnapshot> = group
        .fields
        .iter()
        .filter_map(|field| {
            first_descendant(root, &field.source).map(|node| QuerySnapshot {
                target: field.target.clone(),
                text: node.text_content(),
                cdata: node.has_cdata(),
            })
        })
        .collect();

    let removed: usize = group
        .fields
        .iter()
        .map(|field| root.remove_descendants(&field.source))
        .sum();

    if snapshots.is_empty() {
        return (None, removed);
    }

    let mut query = XmlNode::new(group.query.as_str());
    query.set_attribute(ID, group.id.as_str());
    for snapshot in snapshots.into_iter().filter(|s| !s.text.is_empty()) {
        let mut child = XmlNode::with_text(snapshot.target, snapshot.text);
        child.cdata = snapshot.cdata;
        query.children.push(child);
    }

    let mut wrapper = XmlNode::new(group.wrapper.as_str());
    wrapper.children.push(query);
    (Some(wrapper), removed)
}

fn first_descendant<'a>(root: &'a XmlNode, tag: &str) -> Option<&'a XmlNode> {
    root.children.iter().find_map(|child| child.find_first(tag))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xml_settings_core::{parse, XmlNode};

    use super::{apply, output_file_name};
    use crate::query_mappings::default_query_mappings;

    fn convert(xml: &str) -> XmlNode {
        let mut root = parse(xml.as_bytes()).expect("parse");
        apply(&mut root, &default_query_mappings());
        root
    }

    fn tags(node: &XmlNode) -> Vec<&str> {
        node.children.iter().map(|c| c.tag.as_str()).collect()
    }

    #[test]
    fn uppercases_id_text() {
        let root = convert("<dbwatcher><id>abc</id></dbwatcher>");
        assert_eq!(root.get_text(&["id"]), Some("ABC"));
    }

    #[test]
    fn folds_full_collect_sql_into_sql_full() {
        let root = convert(
            "<dbwatcher>\
               <fullCollectSqlPre>TRUNCATE stage</fullCollectSqlPre>\
               <fullCollectSql>SELECT * FROM news</fullCollectSql>\
               <fullCollectSqlPost>DELETE FROM stage</fullCollectSqlPost>\
             </dbwatcher>",
        );

        assert_eq!(tags(&root), vec!["sqlFull", "sqlFieldUpdate", "sqlDocAdd"]);
        let query = root
            .get_child("sqlFull")
            .and_then(|n| n.get_child("fullQuery"))
            .expect("fullQuery");
        assert_eq!(query.attribute("id"), Some("FULL_SQL"));
        assert_eq!(tags(query), vec!["pre", "main", "post"]);
        assert_eq!(query.get_text(&["pre"]), Some("TRUNCATE stage"));
        assert_eq!(query.get_text(&["main"]), Some("SELECT * FROM news"));
        assert_eq!(query.get_text(&["post"]), Some("DELETE FROM stage"));
        for old in ["fullCollectSqlPre", "fullCollectSql", "fullCollectSqlPost"] {
            assert!(root.find_first(old).is_none(), "{old} should be gone");
        }
    }

    #[test]
    fn folds_incremental_group_in_field_order() {
        let root = convert(
            "<dbwatcher>\
               <incCollectSql>SELECT * FROM news WHERE id IN (?)</incCollectSql>\
               <autoUpdateCheckPost>UPDATE log SET done = 1</autoUpdateCheckPost>\
               <updateIdSelectSql>SELECT id FROM log</updateIdSelectSql>\
               <autoUpdateCheckPre>LOCK log</autoUpdateCheckPre>\
             </dbwatcher>",
        );

        assert_eq!(tags(&root), vec!["sqlIncremental", "sqlFieldUpdate", "sqlDocAdd"]);
        let query = root
            .get_child("sqlIncremental")
            .and_then(|n| n.get_child("incrementalQuery"))
            .expect("incrementalQuery");
        assert_eq!(query.attribute("id"), Some("INC_SQL"));
        assert_eq!(tags(query), vec!["pre", "updateId", "main", "post"]);
        assert_eq!(query.get_text(&["updateId"]), Some("SELECT id FROM log"));
    }

    #[test]
    fn empty_sources_are_removed_without_children() {
        let root = convert(
            "<dbwatcher><fullCollectSqlPre/><fullCollectSql>SELECT 1</fullCollectSql></dbwatcher>",
        );
        let query = root
            .get_child("sqlFull")
            .and_then(|n| n.get_child("fullQuery"))
            .expect("fullQuery");
        assert_eq!(tags(query), vec!["main"]);
        assert!(root.find_first("fullCollectSqlPre").is_none());
    }

    #[test]
    fn all_empty_sources_still_create_the_wrapper() {
        let root = convert("<dbwatcher><autoUpdateCheckPre></autoUpdateCheckPre></dbwatcher>");
        let query = root
            .get_child("sqlIncremental")
            .and_then(|n| n.get_child("incrementalQuery"))
            .expect("incrementalQuery");
        assert!(query.children.is_empty());
        assert!(root.get_child("sqlFull").is_none());
    }

    #[test]
    fn whitespace_only_source_text_counts_as_empty() {
        let root = convert("<dbwatcher><fullCollectSql>   \n\t </fullCollectSql></dbwatcher>");
        let query = root
            .get_child("sqlFull")
            .and_then(|n| n.get_child("fullQuery"))
            .expect("fullQuery");
        assert!(query.children.is_empty());
        assert!(root.find_first("fullCollectSql").is_none());
    }

    #[test]
    fn comments_inside_a_source_are_not_query_text() {
        let root = convert(
            "<dbwatcher><fullCollectSql><!-- nightly -->SELECT 1</fullCollectSql></dbwatcher>",
        );
        let main = root
            .get_child("sqlFull")
            .and_then(|n| n.get_child("fullQuery"))
            .and_then(|n| n.get_child("main"))
            .expect("main");
        assert_eq!(main.text.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn no_sources_only_appends_new_sections() {
        let root = convert("<dbwatcher><id>news</id><jdbc>oracle</jdbc></dbwatcher>");
        assert_eq!(tags(&root), vec!["id", "jdbc", "sqlFieldUpdate", "sqlDocAdd"]);
        assert!(root.get_child("sqlFieldUpdate").expect("appended").children.is_empty());
    }

    #[test]
    fn removes_dropped_elements_everywhere() {
        let root = convert(
            "<dbwatcher>\
               <manualUpdateCheckPost>x</manualUpdateCheckPost>\
               <nested><fieldUpdateCollectSqlPre>y</fieldUpdateCollectSqlPre></nested>\
               <fieldUpdateCollectSqlPost>z</fieldUpdateCollectSqlPost>\
               <manualUpdateCheckPost>again</manualUpdateCheckPost>\
             </dbwatcher>",
        );
        assert_eq!(tags(&root), vec!["nested", "sqlFieldUpdate", "sqlDocAdd"]);
        assert!(root.get_child("nested").expect("nested").children.is_empty());
    }

    #[test]
    fn relocates_nested_sources_and_keeps_first_text() {
        let mut root = parse(
            b"<dbwatcher><collect>\
              <fullCollectSql><![CDATA[SELECT a FROM t WHERE a < 2]]></fullCollectSql>\
              </collect>\
              <fullCollectSql>SELECT ignored</fullCollectSql></dbwatcher>",
        )
        .expect("parse");
        let change = apply(&mut root, &default_query_mappings());

        assert_eq!(change.removed, 2);
        assert_eq!(change.wrappers, vec!["sqlFull".to_string()]);
        let main = root
            .get_child("sqlFull")
            .and_then(|n| n.get_child("fullQuery"))
            .and_then(|n| n.get_child("main"))
            .expect("main");
        assert_eq!(main.text.as_deref(), Some("SELECT a FROM t WHERE a < 2"));
        assert!(main.cdata);
        assert!(root.find_first("fullCollectSql").is_none());
    }

    #[test]
    fn output_name_uppercases_stem_only() {
        assert_eq!(output_file_name("news_feed.xml"), "NEWS_FEED.xml");
        assert_eq!(output_file_name("archive.v2.xml"), "ARCHIVE.V2.xml");
        assert_eq!(output_file_name("noext"), "NOEXT");
    }
}
