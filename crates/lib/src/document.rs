//! # Canonical Document Builder
//!
//! Turns one raw remote record into the canonical, namespaced document that is written
//! to disk: transport keys removed, `fullName` lifted out of the body, and the
//! metadata namespace placed on the root element.

use crate::constants::{IDENTIFIER_FIELD, METADATA_NAMESPACE};
use crate::errors::{BuildError, XmlError};
use crate::normalize::strip_transport_keys;
use crate::xml::{write_document, XmlElement};
use serde_json::{Map, Value};

/// Returns the identifying name of a raw record, if it has a string `fullName`.
pub fn record_identifier(record: &Value) -> Option<&str> {
    record.get(IDENTIFIER_FIELD).and_then(Value::as_str)
}

/// A single-rooted metadata document ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalDocument {
    /// The record type, used as the root element name.
    pub root: String,
    /// The namespace placed on the root element.
    pub namespace: String,
    /// The identifier that was lifted out of the body.
    pub name: String,
    /// The record fields in their original order.
    pub body: Map<String, Value>,
}

impl CanonicalDocument {
    /// Builds the canonical document for `record`.
    ///
    /// Fails if the record is not an object or has no string `fullName`.
    pub fn from_record(record_type: &str, record: &Value) -> Result<Self, BuildError> {
        let name = record_identifier(record)
            .ok_or(BuildError::MissingIdentifier(IDENTIFIER_FIELD))?
            .to_string();

        let mut body = match strip_transport_keys(record) {
            Value::Object(map) => map,
            _ => return Err(BuildError::NotARecord),
        };
        body.shift_remove(IDENTIFIER_FIELD);

        Ok(Self {
            root: record_type.to_string(),
            namespace: METADATA_NAMESPACE.to_string(),
            name,
            body,
        })
    }

    /// The document as an element tree, namespace attribute first.
    pub fn to_element(&self) -> XmlElement {
        let mut root = XmlElement::new(&self.root).with_attribute("xmlns", &self.namespace);
        for (key, value) in &self.body {
            root.children.extend(XmlElement::from_field(key, value));
        }
        root
    }

    /// Renders the document as XML text.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        write_document(&self.to_element())
    }
}
