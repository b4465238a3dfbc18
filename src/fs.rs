//! Synchronous file helpers used by durable storage.

use anyhow::{Context, Result};
use std::io::{ErrorKind, Write};
use std::path::Path;

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).context(format!("Unable to create directory {}", path.display()))
}

pub(crate) fn write_all(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut f = std::fs::File::create(path)
        .context(format!("Unable to create file {}", path.display()))?;
    f.write_all(data)
        .context(format!("Unable to write data to {}", path.display()))?;
    f.sync_all()
        .context(format!("Unable to flush data to {}", path.display()))
}

/// Reads a file, returning `None` if it does not exist.
pub(crate) fn read_optional(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            _ => Err(e).context(format!("Unable to read file {}", path.display())),
        },
    }
}

/// Removes a file. A file that does not exist is not an error.
pub(crate) fn remove_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(()),
            _ => Err(e).context(format!("Unable to remove file {}", path.display())),
        },
    }
}

#[test]
fn read_optional_missing_file_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    assert!(read_optional(tempdir.path().join("nope")).unwrap().is_none());
}

#[test]
fn write_and_remove_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let path = tempdir.path().join("a").join("b.json");
    create_dir_all(path.parent().unwrap()).unwrap();
    write_all(&path, b"[]").unwrap();
    assert_eq!(read_optional(&path).unwrap().as_deref(), Some("[]"));
    remove_file(&path).unwrap();
    remove_file(&path).unwrap();
    assert!(!path.exists());
}
