//! # Profile Store Tests

use anyhow::Result;
use metasync::ProfileStore;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_write_creates_directories_and_names_file() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let store = ProfileStore::new(dir.path().join("force-app/main/default/profiles"));

    // Act
    let path = store.write("Custom Sales", "<Profile/>\n")?;

    // Assert
    assert_eq!(
        path,
        dir.path()
            .join("force-app/main/default/profiles/Custom Sales.profile-meta.xml")
    );
    assert_eq!(fs::read_to_string(&path)?, "<Profile/>\n");
    assert_eq!(store.read("Custom Sales")?, "<Profile/>\n");
    Ok(())
}

#[test]
fn test_write_overwrites_existing_file() -> Result<()> {
    let dir = tempdir()?;
    let store = ProfileStore::new(dir.path());

    store.write("Admin", "first")?;
    let path = store.write("Admin", "second")?;

    assert_eq!(fs::read_to_string(path)?, "second");
    Ok(())
}

#[test]
fn test_discover_names_lists_profile_files_only() -> Result<()> {
    // Arrange
    let dir = tempdir()?;
    let store = ProfileStore::new(dir.path());
    store.write("Standard", "<Profile/>")?;
    store.write("Admin", "<Profile/>")?;
    fs::write(dir.path().join("notes.txt"), "ignored")?;
    fs::write(dir.path().join("Sales.permissionset-meta.xml"), "ignored")?;
    fs::create_dir(dir.path().join("nested.profile-meta.xml"))?;

    // Act
    let names = store.discover_names()?;

    // Assert
    assert_eq!(names, vec!["Admin".to_string(), "Standard".to_string()]);
    Ok(())
}

#[test]
fn test_discover_names_in_missing_directory_is_empty() -> Result<()> {
    let dir = tempdir()?;
    let store = ProfileStore::new(dir.path().join("does-not-exist"));

    assert!(store.discover_names()?.is_empty());
    Ok(())
}

#[test]
fn test_read_missing_profile_reports_path() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path());

    let err = store.read("Nobody").unwrap_err().to_string();

    assert!(err.contains("Nobody.profile-meta.xml"), "Unexpected error: {err}");
}
