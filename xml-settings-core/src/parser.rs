use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::document::{declaration_line, XmlDocument};
use crate::tree::{NodeKind, XmlNode};

/// Errors that can occur while parsing XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input XML could not be tokenized or decoded from its declared charset.
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to decode text entity or bytes.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    /// Failed to read input file.
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Structural issue in XML document.
    #[error("malformed XML: {0}")]
    Malformed(String),
}

/// Parse XML bytes into an [`XmlNode`] tree.
///
/// Whitespace-only text is dropped. Comments inside the root are kept as
/// [`NodeKind::Comment`](crate::NodeKind::Comment) children; processing
/// instructions and the doctype are not kept.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    Ok(read_tree(xml)?.root)
}

/// Everything read from one document besides its declaration line.
struct ParsedTree {
    prolog: Vec<XmlNode>,
    root: XmlNode,
    epilog: Vec<XmlNode>,
    encoding: &'static Encoding,
}

fn read_tree(xml: &[u8]) -> Result<ParsedTree, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => builder.open(build_node_start(&e, &reader)?),
            Event::Empty(e) => builder.attach(build_node_start(&e, &reader)?)?,
            Event::End(_) => builder.close()?,
            Event::Text(e) => builder.push_text(&e.unescape()?, false),
            Event::CData(e) => builder.push_text(&reader.decoder().decode(&e)?, true),
            Event::Comment(e) => {
                let body = reader.decoder().decode(&e)?;
                builder.push_comment(XmlNode::comment(body));
            }
            Event::Eof => break,
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
        buf.clear();
    }

    let encoding = reader.decoder().encoding();
    let (prolog, root, epilog) = builder.finish()?;
    Ok(ParsedTree {
        prolog,
        root,
        epilog,
        encoding,
    })
}

/// Open elements plus the finished root, if any.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<XmlNode>,
    root: Option<XmlNode>,
    prolog: Vec<XmlNode>,
    epilog: Vec<XmlNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: XmlNode) {
        self.stack.push(node);
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let node = self.stack.pop().ok_or_else(|| {
            ParseError::Malformed("encountered closing tag without open tag".to_string())
        })?;
        self.attach(node)
    }

    /// Add a complete element to the open parent, or make it the root.
    fn attach(&mut self, node: XmlNode) -> Result<(), ParseError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        } else if self.root.is_none() {
            self.root = Some(node);
        } else {
            return Err(ParseError::Malformed(
                "multiple top-level elements found".to_string(),
            ));
        }
        Ok(())
    }

    /// Append text to the open element. Text outside the root is ignored.
    ///
    /// Text seen before the element's first child goes into its `text`; later
    /// runs become text nodes so their position among the children survives.
    fn push_text(&mut self, text: &str, cdata: bool) {
        let Some(current) = self.stack.last_mut() else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        if current.children.is_empty() {
            current.cdata |= cdata;
            match &mut current.text {
                Some(existing) => existing.push_str(text),
                None => current.text = Some(text.to_string()),
            }
            return;
        }
        match current.children.last_mut() {
            Some(last) if last.kind == NodeKind::Text => {
                last.cdata |= cdata;
                last.text.get_or_insert_with(String::new).push_str(text);
            }
            _ => current.children.push(XmlNode::text_node(text, cdata)),
        }
    }

    fn push_comment(&mut self, comment: XmlNode) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(comment);
        } else if self.root.is_none() {
            self.prolog.push(comment);
        } else {
            self.epilog.push(comment);
        }
    }

    fn finish(self) -> Result<(Vec<XmlNode>, XmlNode, Vec<XmlNode>), ParseError> {
        if !self.stack.is_empty() {
            return Err(ParseError::Malformed(
                "unclosed element(s) at end of document".to_string(),
            ));
        }
        let root = self
            .root
            .ok_or_else(|| ParseError::Malformed("no root element found".to_string()))?;
        Ok((self.prolog, root, self.epilog))
    }
}

/// Parse an XML file into an [`XmlNode`] tree.
pub fn parse_file(path: &Path) -> Result<XmlNode, ParseError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Parse XML bytes into an [`XmlDocument`], keeping the literal declaration
/// line, top-level comments and the declared encoding.
pub fn parse_document(xml: &[u8]) -> Result<XmlDocument, ParseError> {
    let tree = read_tree(xml)?;
    Ok(XmlDocument {
        declaration: declaration_line(xml),
        prolog: tree.prolog,
        root: tree.root,
        epilog: tree.epilog,
        encoding: tree.encoding,
    })
}

/// Parse an XML file into an [`XmlDocument`].
pub fn parse_document_file(path: &Path) -> Result<XmlDocument, ParseError> {
    let bytes = fs::read(path)?;
    parse_document(&bytes)
}

fn build_node_start(
    e: &quick_xml::events::BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> Result<XmlNode, ParseError> {
    let tag = qname_to_string(e.name(), reader)?;
    let mut node = XmlNode::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = qname_to_string(attr.key, reader)?;
        let value = attr
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        node.attributes.insert(key, value);
    }

    Ok(node)
}

fn qname_to_string(name: QName<'_>, reader: &Reader<&[u8]>) -> Result<String, ParseError> {
    Ok(reader.decoder().decode(name.as_ref())?.into_owned())
}
