//! Building SOAP request envelopes and picking apart SOAP responses.

use crate::SoapError;
use metasync::constants::METADATA_NAMESPACE;
use metasync::xml::{parse_document, write_document, XmlElement};
use metasync::{ReadResult, XmlError};

pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Wraps `payload` in a SOAP envelope carrying the session header.
pub fn build_envelope(session_id: &str, payload: XmlElement) -> Result<String, XmlError> {
    let envelope = XmlElement::new("soapenv:Envelope")
        .with_attribute("xmlns:soapenv", SOAP_ENV_NAMESPACE)
        .with_attribute("xmlns:met", METADATA_NAMESPACE)
        .with_child(
            XmlElement::new("soapenv:Header").with_child(
                XmlElement::new("met:SessionHeader")
                    .with_child(XmlElement::new("met:sessionId").with_text(session_id)),
            ),
        )
        .with_child(XmlElement::new("soapenv:Body").with_child(payload));
    write_document(&envelope)
}

/// The `readMetadata` request body for `names` of type `record_type`.
pub fn read_metadata_payload(record_type: &str, names: &[String]) -> XmlElement {
    names.iter().fold(
        XmlElement::new("met:readMetadata")
            .with_child(XmlElement::new("met:type").with_text(record_type)),
        |payload, name| payload.with_child(XmlElement::new("met:fullNames").with_text(name.as_str())),
    )
}

/// The `listMetadata` request body for every record of type `record_type`.
pub fn list_metadata_payload(record_type: &str) -> XmlElement {
    XmlElement::new("met:listMetadata").with_child(
        XmlElement::new("met:queries")
            .with_child(XmlElement::new("met:type").with_text(record_type)),
    )
}

/// Parses a response and returns the single element inside `Envelope/Body`.
///
/// A `Fault` in the body is returned as [`SoapError::Fault`].
pub(crate) fn response_body(xml: &str) -> Result<XmlElement, SoapError> {
    let root = parse_document(xml)?
        .ok_or_else(|| SoapError::Decode("empty response".to_string()))?;
    if root.local_name() != "Envelope" {
        return Err(SoapError::Decode(format!(
            "expected a SOAP Envelope, found <{}>",
            root.name
        )));
    }

    let body = root
        .child("Body")
        .ok_or_else(|| SoapError::Decode("response has no SOAP Body".to_string()))?;
    let content = body
        .children
        .first()
        .ok_or_else(|| SoapError::Decode("SOAP Body is empty".to_string()))?;

    if content.local_name() == "Fault" {
        return Err(SoapError::Fault {
            code: content.child("faultcode").map(|e| e.text()).unwrap_or_default().to_string(),
            message: content
                .child("faultstring")
                .map(|e| e.text())
                .unwrap_or_default()
                .to_string(),
        });
    }
    Ok(content.clone())
}

/// Decodes a `readMetadataResponse` into raw records.
///
/// Every `records` element becomes one value; a lone record is returned as
/// [`ReadResult::One`], the same shape the API hands back for a single name.
pub fn decode_read_response(body: &XmlElement) -> Result<ReadResult, SoapError> {
    expect_element(body, "readMetadataResponse")?;
    let mut records = body
        .child("result")
        .map(|result| {
            result
                .children_named("records")
                .map(XmlElement::to_value)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if records.len() == 1 {
        Ok(ReadResult::One(records.remove(0)))
    } else {
        Ok(ReadResult::Many(records))
    }
}

/// Decodes a `listMetadataResponse` into the listed record names.
pub fn decode_list_response(body: &XmlElement) -> Result<Vec<String>, SoapError> {
    expect_element(body, "listMetadataResponse")?;
    body.children_named("result")
        .map(|result| {
            result
                .child("fullName")
                .map(|name| name.text().to_string())
                .ok_or_else(|| SoapError::Decode("list result has no fullName".to_string()))
        })
        .collect()
}

fn expect_element(element: &XmlElement, local_name: &str) -> Result<(), SoapError> {
    if element.local_name() == local_name {
        Ok(())
    } else {
        Err(SoapError::Decode(format!(
            "expected <{local_name}>, found <{}>",
            element.name
        )))
    }
}
