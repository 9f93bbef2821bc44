//! XML helpers shared by the YNC transport and device description parsing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

// ─────────────────────────────────────────────────────────────────────────────
// XML Parsing Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Extracts text content from the first occurrence of an XML element.
///
/// Matches on the local name, so `<yamaha:X_controlURL>` is found with
/// `"X_controlURL"`. Entities in the text are decoded.
///
/// # Example
/// ```ignore
/// let xml = r#"<root><friendlyName>RX-V677</friendlyName></root>"#;
/// assert_eq!(extract_xml_text(xml, "friendlyName"), Some("RX-V677".to_string()));
/// ```
pub fn extract_xml_text(xml: &str, element_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let target_bytes = element_name.as_bytes();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == target_bytes => {
                if let Ok(text) = reader.read_text(e.name()) {
                    let decoded = html_escape::decode_html_entities(&text);
                    return Some(decoded.trim().to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    None
}

/// Extracts text content of the first element whose ancestry ends with `path`.
///
/// YNC responses reuse leaf names (`Val` appears under both `Lvl` and
/// `Subwoofer_Trim`), so leaf lookups must be qualified by their parents.
///
/// # Example
/// ```ignore
/// let xml = "<A><Lvl><Val>-500</Val></Lvl><Trim><Val>0</Val></Trim></A>";
/// assert_eq!(extract_xml_path(xml, &["Trim", "Val"]), Some("0".to_string()));
/// ```
pub fn extract_xml_path(xml: &str, path: &[&str]) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(e.local_name().as_ref().to_vec());
                if stack_ends_with(&stack, path) {
                    if let Ok(text) = reader.read_text(e.name()) {
                        let decoded = html_escape::decode_html_entities(&text);
                        return Some(decoded.trim().to_string());
                    }
                    return None;
                }
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    None
}

fn stack_ends_with(stack: &[Vec<u8>], path: &[&str]) -> bool {
    stack.len() >= path.len()
        && stack[stack.len() - path.len()..]
            .iter()
            .zip(path)
            .all(|(name, want)| name.as_slice() == want.as_bytes())
}

/// Returns an attribute of the document's root element.
///
/// Used to read the `RC` (result code) attribute of `<YAMAHA_AV>` responses.
pub fn extract_root_attr(xml: &str, attr_name: &[u8]) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => return get_xml_attr(e, attr_name),
            Ok(Event::Eof) => return None,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Gets an attribute value from an XML element.
pub fn get_xml_attr(elem: &BytesStart, attr_name: &[u8]) -> Option<String> {
    elem.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == attr_name)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// XML Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Escapes XML special characters for embedding in XML content.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
