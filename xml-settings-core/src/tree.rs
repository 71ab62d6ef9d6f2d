use std::collections::BTreeMap;

/// What an [`XmlNode`] stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Element,
    /// Character data that follows a child element. Text before the first
    /// child lives in the parent's `text` field.
    Text,
    /// `<!-- ... -->`, body kept verbatim in `text`.
    Comment,
}

/// A generic XML tree node.
///
/// Text and comment nodes carry an empty tag, so tag lookups never match them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub kind: NodeKind,
    /// Element tag name.
    pub tag: String,
    /// XML attributes keyed by name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements, interleaved with text and comment nodes.
    pub children: Vec<XmlNode>,
    /// Optional text content.
    pub text: Option<String>,
    /// Text was read from (and is written back as) a CDATA section.
    pub cdata: bool,
}

impl XmlNode {
    /// Create a new XML node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            cdata: false,
        }
    }

    /// Create a node holding only `text`.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// A comment node with the given body.
    pub fn comment(body: impl Into<String>) -> Self {
        let mut node = Self::new(String::new());
        node.kind = NodeKind::Comment;
        node.text = Some(body.into());
        node
    }

    /// A character data node, written back as CDATA when `cdata` is set.
    pub fn text_node(text: impl Into<String>, cdata: bool) -> Self {
        let mut node = Self::new(String::new());
        node.kind = NodeKind::Text;
        node.text = Some(text.into());
        node.cdata = cdata;
        node
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Whether any of this node's own character data came from a CDATA section.
    pub fn has_cdata(&self) -> bool {
        self.cdata
            || self
                .children
                .iter()
                .any(|child| child.kind == NodeKind::Text && child.cdata)
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find(|child| child.is_element() && child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.is_element() && child.tag == tag)
            .collect()
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        if path.is_empty() {
            return self.text.as_deref();
        }

        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        current.text.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Concatenated text of this node and all of its descendants, in document
    /// order. Comments do not contribute.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// First node with `tag` in document order, this node included.
    pub fn find_first(&self, tag: &str) -> Option<&XmlNode> {
        if self.is_element() && self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_first(tag))
    }

    /// Mutable variant of [`XmlNode::find_first`].
    pub fn find_first_mut(&mut self, tag: &str) -> Option<&mut XmlNode> {
        if self.is_element() && self.tag == tag {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_first_mut(tag))
    }

    /// Visit this node and every descendant mutably, parents before children.
    pub fn for_each_mut(&mut self, visit: &mut impl FnMut(&mut XmlNode)) {
        visit(self);
        for child in &mut self.children {
            child.for_each_mut(visit);
        }
    }

    /// Remove every descendant element named `tag` (with its subtree).
    ///
    /// Returns how many elements were removed. The node itself is never removed.
    pub fn remove_descendants(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|child| !(child.is_element() && child.tag == tag));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_descendants(tag);
        }
        removed
    }
}

fn collect_text(node: &XmlNode, out: &mut String) {
    if node.kind == NodeKind::Comment {
        return;
    }
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.children {
        collect_text(child, out);
    }
}
