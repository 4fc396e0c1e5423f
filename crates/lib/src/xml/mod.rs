//! # XML Support
//!
//! A small element tree plus a writer and a parser built on `quick-xml` events.
//!
//! - **Writing** always emits the `<?xml version="1.0" encoding="UTF-8"?>` declaration,
//!   indents nested elements by four spaces and never drops empty elements.
//! - **Parsing** rebuilds the same tree from text, so `parse_document(write_document(t))`
//!   returns `t`.
//!
//! [`XmlElement::from_field`] and [`XmlElement::to_value`] translate between the tree and
//! loosely-typed `serde_json` values:
//!
//! ```xml
//! <fieldPermissions>
//!     <editable>true</editable>
//!     <field>Account.Name</field>
//! </fieldPermissions>
//! <fieldPermissions>
//!     <editable>false</editable>
//!     <field>Account.Phone</field>
//! </fieldPermissions>
//! ```
//!
//! is the value
//!
//! ```json
//! { "fieldPermissions": [
//!     { "editable": "true", "field": "Account.Name" },
//!     { "editable": "false", "field": "Account.Phone" }
//! ] }
//! ```
//!
//! Attributes are kept under the `$` key and the text of an element that also carries
//! attributes under `_`.

mod element;
mod reader;
mod writer;

pub use element::XmlElement;
pub use reader::parse_document;
pub use writer::{write_document, INDENT_SIZE};
