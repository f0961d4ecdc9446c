use super::error::StorageError;

/// Normalize an object path: trim surrounding slashes and collapse empty
/// segments. Rejects traversal segments, backslashes and control characters.
///
/// The empty string denotes the bucket root and is accepted.
pub fn normalize_path(path: &str) -> Result<String, StorageError> {
    if path.chars().any(|c| c.is_control()) {
        return Err(StorageError::InvalidPath(
            "control characters are not allowed".into(),
        ));
    }
    if path.contains('\\') {
        return Err(StorageError::InvalidPath("backslashes are not allowed".into()));
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(StorageError::InvalidPath("'..' is not allowed".into()));
            }
            s => segments.push(s),
        }
    }
    Ok(segments.join("/"))
}

/// Join a folder and a name into an object path. An empty folder is the root.
pub fn join_path(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Public URL for an object:
/// `{base_url}/storage/v1/object/public/{bucket}/{path}`.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        path.trim_start_matches('/')
    )
}
