use async_trait::async_trait;
use chrono::{DateTime, Utc};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::path::{normalize_path, public_object_url};
use super::traits::{ListOptions, ObjectEntry, ObjectStore, apply_list_options};
use crate::config::StorageAppConfig;

/// Object store backed by an S3-compatible endpoint.
///
/// S3 has no native offset, so listings fetch every key under the prefix
/// (with `/` as delimiter) and paginate in memory.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    bucket_name: String,
}

impl S3ObjectStore {
    pub fn new(config: &StorageAppConfig) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: config.s3.region.clone(),
            endpoint: config.s3.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&config.s3.access_key),
            Some(&config.s3.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        let bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?
            .with_path_style();

        Ok(Self {
            bucket,
            public_base_url: config.public_base_url.clone(),
            bucket_name: config.bucket.clone(),
        })
    }
}

fn backend_error(err: s3::error::S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn check_status(code: u16, path: &str) -> Result<(), StorageError> {
    match code {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(path.to_string())),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for {path}"
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list(
        &self,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, StorageError> {
        let folder = normalize_path(prefix)?;
        let key_prefix = if folder.is_empty() {
            String::new()
        } else {
            format!("{folder}/")
        };

        let results = self
            .bucket
            .list(key_prefix.clone(), Some("/".to_string()))
            .await
            .map_err(backend_error)?;

        let mut entries = Vec::new();
        for result in results {
            for prefix in result.common_prefixes.unwrap_or_default() {
                let name = prefix
                    .prefix
                    .strip_prefix(&key_prefix)
                    .unwrap_or(&prefix.prefix)
                    .trim_end_matches('/');
                if !name.is_empty() {
                    entries.push(ObjectEntry {
                        name: name.to_string(),
                        size: None,
                        created_at: None,
                        updated_at: None,
                    });
                }
            }
            for object in result.contents {
                let name = object
                    .key
                    .strip_prefix(&key_prefix)
                    .unwrap_or(&object.key);
                if name.is_empty() {
                    continue;
                }
                let modified = DateTime::parse_from_rfc3339(&object.last_modified)
                    .ok()
                    .map(|t| t.with_timezone(&Utc));
                entries.push(ObjectEntry {
                    name: name.to_string(),
                    size: Some(object.size),
                    created_at: modified,
                    updated_at: modified,
                });
            }
        }

        debug!(prefix = %key_prefix, count = entries.len(), "Listed S3 prefix");
        Ok(apply_list_options(entries, options))
    }

    async fn upload(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let key = normalize_path(path)?;
        let response = self
            .bucket
            .put_object(&key, data)
            .await
            .map_err(backend_error)?;
        check_status(response.status_code(), &key)
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let key = normalize_path(path)?;
        let response = self.bucket.get_object(&key).await.map_err(|e| match e {
            s3::error::S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.clone()),
            other => backend_error(other),
        })?;
        check_status(response.status_code(), &key)?;
        Ok(response.bytes().to_vec())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            let key = normalize_path(path)?;
            let response = self.bucket.delete_object(&key).await.map_err(backend_error)?;
            match check_status(response.status_code(), &key) {
                Ok(()) | Err(StorageError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket_name, path)
    }
}
