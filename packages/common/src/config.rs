use serde::Deserialize;

/// Which object store implementation backs the gallery.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

/// Connection settings for an S3-compatible endpoint.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Config {
    /// Endpoint URL, e.g. "https://<project>.supabase.co/storage/v1/s3".
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}

/// App-level storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    /// Default: filesystem.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend. Default: "./data/storage".
    #[serde(default = "default_root")]
    pub root: String,
    /// Bucket name. Default: "gallery".
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Base URL that public object URLs are built from. Default: "http://localhost:54321".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default)]
    pub s3: S3Config,
}

fn default_backend() -> StorageBackend {
    StorageBackend::Filesystem
}
fn default_root() -> String {
    "./data/storage".into()
}
fn default_bucket() -> String {
    "gallery".into()
}
fn default_public_base_url() -> String {
    "http://localhost:54321".into()
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root: default_root(),
            bucket: default_bucket(),
            public_base_url: default_public_base_url(),
            s3: S3Config::default(),
        }
    }
}
