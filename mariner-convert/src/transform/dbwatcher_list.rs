use xml_settings_core::XmlNode;

pub const ELEMENT: &str = "element";
pub const ID: &str = "id";

/// Upper-case every `element/@id` that is entirely lower-case.
///
/// Mixed-case and empty ids are left alone. Returns how many ids changed.
pub fn uppercase_element_ids(root: &mut XmlNode) -> usize {
    let mut changed = 0;
    root.for_each_mut(&mut |node: &mut XmlNode| {
        if node.tag != ELEMENT {
            return;
        }
        let Some(id) = node.attribute(ID) else {
            return;
        };
        if id.is_empty() || id != id.to_lowercase() {
            return;
        }
        let upper = id.to_uppercase();
        if upper != id {
            node.set_attribute(ID, upper);
            changed += 1;
        }
    });
    changed
}
