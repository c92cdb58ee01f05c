use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// StorageService
///
/// Contract for the object-storage layer. The media pipeline is
/// direct-to-bucket: handlers only ever issue presigned upload URLs, resolve
/// keys to public URLs, and delete objects when content is replaced or
/// removed. Swapping the S3 client for the in-memory mock keeps the handler
/// tests off the network.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in `Env::Local` to
    /// provision the MinIO bucket at startup. No-op in production.
    async fn ensure_bucket_exists(&self);

    /// Generates a temporary, signed URL allowing a client to PUT a file
    /// directly into the bucket, constrained to `content_type` and expiring
    /// after ten minutes.
    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String>;

    /// Removes a stored object. Called when an image is replaced or its
    /// owning record is deleted; failures are logged by callers, never fatal.
    async fn delete_object(&self, key: &str) -> Result<(), String>;

    /// Public URL an uploaded object is served from (path-style).
    fn object_url(&self, key: &str) -> String;

    /// Inverse of `object_url`: recovers the object key from a stored public
    /// URL. Returns `None` for URLs that do not point into the bucket.
    fn key_for_url(&self, url: &str) -> Option<String>;
}

/// Shared handle to the storage layer inside the application state.
pub type StorageState = Arc<dyn StorageService>;

/// S3StorageClient
///
/// Concrete implementation on the AWS SDK. S3 compatibility covers both the
/// local Dockerized MinIO instance and the hosted storage gateway in
/// production; `force_path_style(true)` is required for both.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    endpoint: String,
    bucket_name: String,
}

impl S3StorageClient {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// CreateBucket is idempotent, so this is safe to call on every startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String> {
        let expires_in = Duration::from_secs(600);

        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(|e| e.to_string())?;

        let presigned_req = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            // Forces the upload request to carry this Content-Type header.
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| e.to_string())?;

        Ok(presigned_req.uri().to_string())
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket_name, key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/{}/", self.endpoint, self.bucket_name);
        url.strip_prefix(&prefix)
            .filter(|key| !key.is_empty())
            .map(|key| key.to_string())
    }
}

/// Strips path-traversal components (`..`, `.`, empty segments) from a
/// user-influenced key segment.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// In-memory implementation for unit and router tests: deterministic URLs,
/// optional simulated failure, and a record of deleted keys so cleanup
/// behavior can be asserted.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Keys passed to `delete_object` so far.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().map(|keys| keys.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        _content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock storage error: simulated failure".to_string());
        }
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?signature=fake",
            sanitize_key(key)
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock storage error: simulated failure".to_string());
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(key.to_string());
        }
        Ok(())
    }

    fn object_url(&self, key: &str) -> String {
        format!("http://localhost:9000/mock-bucket/{}", sanitize_key(key))
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("http://localhost:9000/mock-bucket/")
            .filter(|key| !key.is_empty())
            .map(|key| key.to_string())
    }
}
