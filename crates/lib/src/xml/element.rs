use crate::constants::{ATTRIBUTES_KEY, TEXT_KEY};
use serde_json::{Map, Value};

/// A generic XML element: name, ordered attributes, ordered children and optional text.
///
/// An element either holds children or text. Text next to child elements is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// The element name without its namespace prefix (`soapenv:Body` -> `Body`).
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Looks up an attribute by its exact name.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the first child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|child| child.local_name() == local_name)
    }

    /// Iterates over all children with the given local name, in document order.
    pub fn children_named<'a, 'b>(
        &'a self,
        local_name: &'b str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'b
    where
        'a: 'b,
    {
        self.children
            .iter()
            .filter(move |child| child.local_name() == local_name)
    }

    /// The element text, or an empty string for elements without text.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Removes every direct child with the given local name and returns how many were
    /// removed. `md:userLicense` matches `userLicense`.
    pub fn remove_children(&mut self, local_name: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|child| child.local_name() != local_name);
        before - self.children.len()
    }

    /// Builds the element(s) representing the field `name` holding `value`.
    ///
    /// Arrays produce one sibling per entry (nested arrays are flattened), objects
    /// become nested elements, `null` and `""` become empty elements and other
    /// primitives become text.
    pub fn from_field(name: &str, value: &Value) -> Vec<XmlElement> {
        match value {
            Value::Array(items) => items
                .iter()
                .flat_map(|item| Self::from_field(name, item))
                .collect(),
            Value::Object(map) => {
                let mut element = XmlElement::new(name);
                for (key, child) in map {
                    match key.as_str() {
                        ATTRIBUTES_KEY => {
                            if let Value::Object(attributes) = child {
                                element.attributes.extend(
                                    attributes
                                        .iter()
                                        .map(|(k, v)| (k.clone(), scalar_text(v))),
                                );
                            }
                        }
                        TEXT_KEY => element.text = Some(scalar_text(child)),
                        _ => element.children.extend(Self::from_field(key, child)),
                    }
                }
                vec![element]
            }
            scalar => {
                let mut element = XmlElement::new(name);
                let text = scalar_text(scalar);
                if !text.is_empty() {
                    element.text = Some(text);
                }
                vec![element]
            }
        }
    }

    /// Converts the element into a loosely-typed value.
    ///
    /// Leaves become strings, repeated children become arrays (in first-seen key
    /// order), attributes go under `$` and `xsi:nil="true"` becomes `null`.
    pub fn to_value(&self) -> Value {
        if self.children.is_empty() && self.is_nil() {
            return Value::Null;
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>();
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
        }

        if self.children.is_empty() {
            if map.is_empty() {
                return Value::String(self.text().to_string());
            }
            if !self.text().is_empty() {
                map.insert(TEXT_KEY.to_string(), Value::String(self.text().to_string()));
            }
            return Value::Object(map);
        }

        for child in &self.children {
            let value = child.to_value();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }
        Value::Object(map)
    }

    fn is_nil(&self) -> bool {
        self.attributes
            .iter()
            .any(|(k, v)| local_part(k) == "nil" && v == "true")
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
