use std::fs;
use std::io::Write as _;
use std::path::Path;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::document::XmlDocument;
use crate::tree::{NodeKind, XmlNode};

/// Spaces per nesting level in written output.
pub const INDENT_WIDTH: usize = 4;

/// Errors that can occur while writing XML from an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Temporary file could not be moved over the destination.
    #[error("failed to replace XML file: {0}")]
    Persist(#[from] tempfile::PersistError),
    /// Serialized body was not valid UTF-8 before re-encoding.
    #[error("invalid UTF-8 in serialized XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// A comment body would close the comment early.
    #[error("comment cannot contain \"-->\": {0}")]
    InvalidComment(String),
}

/// Serialize an [`XmlNode`] tree into XML bytes.
pub fn write(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    write_node(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Serialize a document: declaration line, prolog comments, indented body,
/// epilog comments, each followed by a newline.
///
/// The result is encoded in `doc.encoding`. Characters that charset cannot
/// represent are written as numeric character references.
pub fn write_document(doc: &XmlDocument) -> Result<Vec<u8>, WriteError> {
    let mut out = String::with_capacity(doc.declaration.len() + 64);
    out.push_str(&doc.declaration);
    out.push('\n');
    for node in doc.prolog.iter().chain([&doc.root]).chain(&doc.epilog) {
        out.push_str(std::str::from_utf8(&write(node)?)?);
        out.push('\n');
    }
    let (encoded, _, _) = doc.encoding.encode(&out);
    Ok(encoded.into_owned())
}

/// Serialize a document and write it to `path`.
///
/// Parent directories are created. Bytes go to a temporary file next to the
/// destination which is then renamed over it, so `path` is either fully
/// written or left untouched.
pub fn write_file(doc: &XmlDocument, path: &Path) -> Result<(), WriteError> {
    let bytes = write_document(doc)?;
    write_atomic(path, &bytes)
}

/// Write raw bytes to `path` through a temporary file in the same directory.
///
/// On unix the file is created `0644` before the umask, like any regular file
/// the process would create.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    persist_bytes(path, bytes, None)
}

/// [`write_atomic`], then give the file exactly `permissions` before it
/// replaces `path`. Used for verbatim copies that keep their source mode.
pub fn write_atomic_with_permissions(
    path: &Path,
    bytes: &[u8],
    permissions: fs::Permissions,
) -> Result<(), WriteError> {
    persist_bytes(path, bytes, Some(permissions))
}

fn persist_bytes(
    path: &Path,
    bytes: &[u8],
    permissions: Option<fs::Permissions>,
) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<(), WriteError> {
    match node.kind {
        NodeKind::Element => {}
        NodeKind::Text => {
            if let Some(text) = &node.text {
                write_text(writer, text, node.cdata)?;
            }
            return Ok(());
        }
        NodeKind::Comment => {
            let body = node.text.as_deref().unwrap_or_default();
            if body.contains("-->") {
                return Err(WriteError::InvalidComment(body.to_string()));
            }
            writer.write_event(Event::Comment(BytesText::from_escaped(body)))?;
            return Ok(());
        }
    }

    let mut start = BytesStart::new(node.tag.as_str());

    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.children.is_empty() && node.text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(text) = &node.text {
        write_text(writer, text, node.cdata)?;
    }

    for child in &node.children {
        write_node(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.tag.as_str())))?;
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str, cdata: bool) -> Result<(), WriteError> {
    // "]]>" cannot live inside a CDATA section; fall back to escaped text.
    if cdata && !text.contains("]]>") {
        writer.write_event(Event::CData(BytesCData::new(text)))?;
    } else {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    Ok(())
}
