//! # Profile Cleaning Tests

use anyhow::Result;
use metasync::xml::parse_document;
use metasync::{clean_profile, CleanConfig, XmlError};
use metasync_test_utils::PROFILE_XML;

fn root_children(xml: &str) -> Vec<String> {
    parse_document(xml)
        .unwrap()
        .expect("root element")
        .children
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn test_default_config_strips_all_environment_fields() -> Result<()> {
    // Act
    let cleaned = clean_profile(PROFILE_XML, &CleanConfig::default())?;

    // Assert
    assert_eq!(root_children(&cleaned), vec!["custom", "fieldPermissions"]);
    assert!(cleaned.contains(
        "    <fieldPermissions>\n        <editable>true</editable>\n        <field>Account.Rating</field>\n        <readable>true</readable>\n    </fieldPermissions>\n"
    ));
    assert!(cleaned.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(cleaned.contains("<Profile xmlns=\"http://soap.sforce.com/2006/04/metadata\">"));
    Ok(())
}

#[test]
fn test_cleaning_is_idempotent() -> Result<()> {
    let config = CleanConfig::default();

    let once = clean_profile(PROFILE_XML, &config)?;
    let twice = clean_profile(&once, &config)?;

    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_individual_toggles() -> Result<()> {
    let config = CleanConfig {
        login_ip_ranges: true,
        user_license: false,
        login_hours: false,
    };

    let cleaned = clean_profile(PROFILE_XML, &config)?;

    assert_eq!(
        root_children(&cleaned),
        vec!["custom", "fieldPermissions", "loginHours", "userLicense"]
    );
    Ok(())
}

#[test]
fn test_disabled_config_keeps_every_field() -> Result<()> {
    let cleaned = clean_profile(PROFILE_XML, &CleanConfig::none())?;

    // The fixture is already in canonical layout, so nothing changes.
    assert_eq!(cleaned, PROFILE_XML);
    Ok(())
}

#[test]
fn test_absent_fields_are_a_noop() -> Result<()> {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Profile xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n    <custom>false</custom>\n</Profile>\n";

    let cleaned = clean_profile(xml, &CleanConfig::default())?;

    assert_eq!(cleaned, xml);
    Ok(())
}

#[test]
fn test_non_profile_documents_pass_through() -> Result<()> {
    let config = CleanConfig::default();
    for input in [
        "",
        "not xml at all",
        "<?xml version=\"1.0\"?>\n<!-- only a comment -->\n",
        "<PermissionSet>\n  <userLicense>Salesforce</userLicense>\n</PermissionSet>",
    ] {
        assert_eq!(clean_profile(input, &config)?, input);
    }
    Ok(())
}

#[test]
fn test_malformed_profile_is_an_error() {
    let result = clean_profile("<Profile><custom>true</Profile>", &CleanConfig::default());
    assert!(matches!(
        result,
        Err(XmlError::Xml(_)) | Err(XmlError::Malformed(_))
    ));
}

#[test]
fn test_prefixed_profile_fields_are_stripped() -> Result<()> {
    // Arrange
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
               <md:Profile xmlns:md=\"http://soap.sforce.com/2006/04/metadata\">\n    \
               <md:custom>false</md:custom>\n    \
               <md:loginHours>\n        \
               <md:mondayStart>300</md:mondayStart>\n    \
               </md:loginHours>\n    \
               <md:userLicense>Salesforce</md:userLicense>\n\
               </md:Profile>\n";

    // Act
    let cleaned = clean_profile(xml, &CleanConfig::default())?;

    // Assert
    assert_eq!(root_children(&cleaned), vec!["md:custom"]);
    assert!(!cleaned.contains("loginHours"));
    assert!(!cleaned.contains("userLicense"));
    assert_eq!(clean_profile(&cleaned, &CleanConfig::default())?, cleaned);
    Ok(())
}
