use super::XmlElement;
use crate::errors::XmlError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Number of spaces per nesting level.
pub const INDENT_SIZE: usize = 4;

/// Renders `root` as a complete XML document.
///
/// The output starts with the XML declaration, is indented by [`INDENT_SIZE`] spaces
/// and ends with a newline. Elements without text or children are written as empty
/// elements (`<tag/>`) rather than dropped.
pub fn write_document(root: &XmlElement) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    let mut rendered = String::from_utf8(writer.into_inner())?;
    rendered.push('\n');
    Ok(rendered)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> Result<(), XmlError> {
    check_name(&element.name)?;
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        check_name(key)?;
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        match element.text.as_deref().filter(|text| !text.is_empty()) {
            Some(text) => {
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            None => {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }
        }
    } else {
        writer.write_event(Event::Start(start))?;
        for child in &element.children {
            write_element(writer, child)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// Rejects names the parser could not read back (`bad key`, `1st`, ``).
fn check_name(name: &str) -> Result<(), XmlError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_declaration_and_indentation() {
        let root = XmlElement::new("Profile")
            .with_attribute("xmlns", "urn:test")
            .with_child(XmlElement::new("custom").with_text("false"))
            .with_child(
                XmlElement::new("loginHours")
                    .with_child(XmlElement::new("mondayStart").with_text("300")),
            )
            .with_child(XmlElement::new("description"));

        let xml = write_document(&root).unwrap();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <Profile xmlns=\"urn:test\">\n    \
             <custom>false</custom>\n    \
             <loginHours>\n        \
             <mondayStart>300</mondayStart>\n    \
             </loginHours>\n    \
             <description/>\n\
             </Profile>\n"
        );
    }

    #[test]
    fn test_escapes_text_and_attributes() {
        let root = XmlElement::new("root")
            .with_attribute("note", "a \"quoted\" <value>")
            .with_child(XmlElement::new("formula").with_text("A & B < C"));

        let xml = write_document(&root).unwrap();

        assert!(xml.contains("<formula>A &amp; B &lt; C</formula>"));
        assert!(!xml.contains("<value>"));
    }

    #[test]
    fn test_rejects_invalid_names() {
        for name in ["bad key", "", "1st", "a<b"] {
            let root = XmlElement::new("root").with_child(XmlElement::new(name));
            assert!(
                matches!(write_document(&root), Err(XmlError::InvalidName(_))),
                "`{name}` should be rejected"
            );
        }
        let ok = XmlElement::new("soapenv:Envelope").with_attribute("xmlns:xsi", "urn:x");
        assert!(write_document(&ok).is_ok());
    }
}
