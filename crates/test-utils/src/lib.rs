use async_trait::async_trait;
use metasync::{MetadataError, MetadataReader, ReadResult};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// --- Mock Metadata Reader ---

/// An in-memory `MetadataReader` that records every call it receives.
///
/// Known records are answered by `fullName`; unknown names come back as `null`
/// (or as an empty typed record, see [`MockMetadataReader::with_empty_missing`]).
/// Scripted responses, when present, are returned instead, one per call.
#[derive(Clone, Debug)]
pub struct MockMetadataReader {
    records: Arc<Mutex<Vec<Value>>>,
    scripted: Arc<Mutex<VecDeque<ReadResult>>>,
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    fail_on_call: Option<usize>,
    empty_missing: bool,
}

impl MockMetadataReader {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
            empty_missing: false,
        }
    }

    /// Adds a raw record. It is looked up by its `fullName`.
    pub fn add_record(&self, record: Value) {
        self.records.lock().unwrap().push(record);
    }

    /// Adds one raw Profile per name, built with [`profile_record`].
    pub fn with_profiles(self, names: &[&str]) -> Self {
        for name in names {
            self.add_record(profile_record(name));
        }
        self
    }

    /// Queues a response returned verbatim by the next `read` call.
    pub fn push_response(&self, response: ReadResult) {
        self.scripted.lock().unwrap().push_back(response);
    }

    /// Makes the `n`-th `read` call (1-based) fail.
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Answers unknown names with a typed record that has no `fullName`.
    pub fn with_empty_missing(mut self) -> Self {
        self.empty_missing = true;
        self
    }

    /// Retrieves the recorded `read` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn lookup(&self, record_type: &str, name: &str) -> Value {
        let records = self.records.lock().unwrap();
        match records
            .iter()
            .find(|r| r.get("fullName").and_then(Value::as_str) == Some(name))
        {
            Some(record) => record.clone(),
            None if self.empty_missing => json!({ "$": { "xsi:type": record_type } }),
            None => Value::Null,
        }
    }
}

impl Default for MockMetadataReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataReader for MockMetadataReader {
    async fn read(&self, record_type: &str, names: &[String]) -> Result<ReadResult, MetadataError> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((record_type.to_string(), names.to_vec()));
            calls.len()
        };

        if self.fail_on_call == Some(call_number) {
            return Err(MetadataError::Call(format!(
                "MockMetadataReader: call {call_number} was programmed to fail"
            )));
        }

        if let Some(response) = self.scripted.lock().unwrap().pop_front() {
            return Ok(response);
        }

        let mut found: Vec<Value> = names
            .iter()
            .map(|name| self.lookup(record_type, name))
            .collect();
        if found.len() == 1 {
            Ok(ReadResult::One(found.remove(0)))
        } else {
            Ok(ReadResult::Many(found))
        }
    }

    async fn list(&self, _record_type: &str) -> Result<Vec<String>, MetadataError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.get("fullName").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }
}

// --- Fixtures ---

/// A raw Profile record as the SOAP decoder produces it, transport keys included.
pub fn profile_record(name: &str) -> Value {
    json!({
        "$": { "xsi:type": "Profile" },
        "fullName": name,
        "custom": "true",
        "fieldPermissions": [
            {
                "$": { "xsi:type": "ProfileFieldLevelSecurity" },
                "editable": "true",
                "field": "Account.Rating",
                "readable": "true"
            },
            {
                "editable": "false",
                "field": "Account.Site",
                "readable": "true"
            }
        ],
        "loginHours": { "mondayStart": "300", "mondayEnd": "1200" },
        "loginIpRanges": [
            { "endAddress": "10.0.0.255", "startAddress": "10.0.0.1" }
        ],
        "userLicense": "Salesforce",
        "description": ""
    })
}

/// A rendered Profile document with every cleanable field present.
pub const PROFILE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Profile xmlns="http://soap.sforce.com/2006/04/metadata">
    <custom>true</custom>
    <fieldPermissions>
        <editable>true</editable>
        <field>Account.Rating</field>
        <readable>true</readable>
    </fieldPermissions>
    <loginHours>
        <mondayEnd>1200</mondayEnd>
        <mondayStart>300</mondayStart>
    </loginHours>
    <loginIpRanges>
        <endAddress>10.0.0.255</endAddress>
        <startAddress>10.0.0.1</startAddress>
    </loginIpRanges>
    <loginIpRanges>
        <endAddress>192.168.0.255</endAddress>
        <startAddress>192.168.0.1</startAddress>
    </loginIpRanges>
    <userLicense>Salesforce</userLicense>
</Profile>
"#;
