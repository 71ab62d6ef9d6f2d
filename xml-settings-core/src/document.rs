use encoding_rs::Encoding;

use crate::tree::XmlNode;

/// Declaration written when the source file does not start with one.
pub const DEFAULT_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A parsed XML file: the literal declaration line, the element tree and the
/// comments around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Declaration text exactly as it appeared in the source.
    pub declaration: String,
    /// Comments between the declaration and the root element.
    pub prolog: Vec<XmlNode>,
    pub root: XmlNode,
    /// Comments after the root element.
    pub epilog: Vec<XmlNode>,
    /// Charset the source was decoded from; output is encoded back into it.
    pub encoding: &'static Encoding,
}

/// Extract the XML declaration from the first line of raw file bytes.
///
/// The line is taken verbatim up to and including the closing `?>`. A leading
/// UTF-8 byte order mark is skipped. Files whose first line is not a
/// declaration get [`DEFAULT_DECLARATION`].
pub fn declaration_line(raw: &[u8]) -> String {
    let raw = raw.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(raw);
    let first_line = raw.split(|b| *b == b'\n').next().unwrap_or_default();
    let Ok(line) = std::str::from_utf8(first_line) else {
        return DEFAULT_DECLARATION.to_string();
    };
    let line = line.trim_end_matches('\r');
    if !line.starts_with("<?xml") {
        return DEFAULT_DECLARATION.to_string();
    }
    match line.find("?>") {
        Some(end) => line[..end + 2].to_string(),
        None => DEFAULT_DECLARATION.to_string(),
    }
}
