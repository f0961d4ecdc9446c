//! Name rules for gallery objects on top of what `normalize_path` enforces.

use thiserror::Error;

/// Longest accepted object or folder name, in bytes.
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("name cannot be empty")]
    Empty,
    #[error("'{0}' must be a single name without separators")]
    Nested(String),
    /// Also covers `..` and the folder placeholder.
    #[error("'{0}' starts with a dot")]
    Hidden(String),
    #[error("name contains control characters")]
    Control,
    #[error("name is longer than {MAX_NAME_LEN} bytes")]
    TooLong,
}

/// Check one uploaded file name or folder segment. Returns it trimmed.
pub fn check_name(name: &str) -> Result<&str, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.chars().any(char::is_control) {
        return Err(NameError::Control);
    }
    if name.contains(['/', '\\']) {
        return Err(NameError::Nested(name.to_string()));
    }
    if name.starts_with('.') {
        return Err(NameError::Hidden(name.to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong);
    }
    Ok(name)
}

/// Check every segment of an already normalized folder path.
pub fn check_folder(folder: &str) -> Result<(), NameError> {
    folder.split('/').try_for_each(|segment| check_name(segment).map(drop))
}

/// Split `a/b/c.jpg` into `("a/b", "c.jpg")`.
pub fn split_parent(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}
