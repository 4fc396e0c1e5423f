use super::XmlElement;
use crate::errors::XmlError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An element whose closing tag has not been read yet.
struct OpenElement {
    element: XmlElement,
    text: String,
}

impl OpenElement {
    fn close(self) -> XmlElement {
        let mut element = self.element;
        // Text is only kept on leaves; whitespace between children is layout.
        if element.children.is_empty() && !self.text.is_empty() {
            element.text = Some(self.text);
        }
        element
    }
}

/// Parses `xml` into an element tree.
///
/// Returns `Ok(None)` when the text contains no element at all. The declaration,
/// comments and processing instructions are skipped. A second top-level element or an
/// unclosed element is reported as [`XmlError::Malformed`].
pub fn parse_document(xml: &str) -> Result<Option<XmlElement>, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(OpenElement {
                element: open_element(&start)?,
                text: String::new(),
            }),
            Event::Empty(start) => attach(&mut stack, &mut root, open_element(&start)?)?,
            Event::End(end) => {
                let open = stack.pop().ok_or_else(|| {
                    XmlError::Malformed(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name().as_ref())
                    ))
                })?;
                attach(&mut stack, &mut root, open.close())?;
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    let raw = String::from_utf8_lossy(&*text);
                    let unescaped =
                        unescape(&raw).map_err(|e| XmlError::Malformed(e.to_string()))?;
                    open.text.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&*data));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(open) = stack.last_mut() {
                    let name = String::from_utf8_lossy(&*reference);
                    open.text.push_str(&resolve_reference(&name)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "element <{}> is never closed",
            open.element.name
        )));
    }
    Ok(root)
}

fn open_element(start: &BytesStart) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape(&raw)
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [OpenElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.element.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(XmlError::Malformed(format!(
            "second top-level element <{}>",
            element.name
        )));
    }
    Ok(())
}

/// Resolves an entity or character reference (`amp`, `#38`, `#x26`).
fn resolve_reference(name: &str) -> Result<String, XmlError> {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name.strip_prefix('#').and_then(|code| {
            let number = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            number.and_then(char::from_u32)
        }),
    };
    resolved
        .map(String::from)
        .ok_or_else(|| XmlError::Malformed(format!("unknown entity reference &{name};")))
}
