//! # Profile Cleaning
//!
//! Removes environment-specific top-level fields from a Profile document so the file
//! can move between orgs. Only whole root children are removed; nothing nested is
//! inspected.

use crate::constants::PROFILE_TYPE;
use crate::errors::XmlError;
use crate::xml::{parse_document, write_document};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which top-level fields to strip. Every field is stripped by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CleanConfig {
    #[serde(default = "enabled")]
    pub login_ip_ranges: bool,
    #[serde(default = "enabled")]
    pub user_license: bool,
    #[serde(default = "enabled")]
    pub login_hours: bool,
}

fn enabled() -> bool {
    true
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            login_ip_ranges: true,
            user_license: true,
            login_hours: true,
        }
    }
}

impl CleanConfig {
    /// A configuration that strips nothing.
    pub fn none() -> Self {
        Self {
            login_ip_ranges: false,
            user_license: false,
            login_hours: false,
        }
    }

    /// The element names selected for removal.
    pub fn fields_to_strip(&self) -> Vec<&'static str> {
        [
            (self.login_ip_ranges, "loginIpRanges"),
            (self.user_license, "userLicense"),
            (self.login_hours, "loginHours"),
        ]
        .into_iter()
        .filter_map(|(on, field)| on.then_some(field))
        .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.fields_to_strip().is_empty()
    }
}

/// Strips the configured fields from a Profile document and re-renders it.
///
/// Text without a root element, or whose root is not a `Profile`, is returned
/// unchanged. Cleaning is idempotent: cleaning the output again gives the same bytes.
pub fn clean_profile(xml: &str, config: &CleanConfig) -> Result<String, XmlError> {
    let mut root = match parse_document(xml)? {
        Some(root) if root.local_name() == PROFILE_TYPE => root,
        _ => {
            debug!("No Profile root element found, leaving document untouched.");
            return Ok(xml.to_string());
        }
    };

    for field in config.fields_to_strip() {
        let removed = root.remove_children(field);
        if removed > 0 {
            debug!("Removed {} `{}` element(s)", removed, field);
        }
    }

    write_document(&root)
}
