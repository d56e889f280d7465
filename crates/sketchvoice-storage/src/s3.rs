use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Region where `CreateBucket` must be sent without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    region: Option<String>,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance from a loaded SDK configuration
    ///
    /// # Arguments
    /// * `sdk_config` - Shared AWS configuration (credentials, retry, default region)
    /// * `region` - Region override for S3 requests and bucket creation
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO). Enables path-style addressing.
    pub fn new(
        sdk_config: &SdkConfig,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

        if let Some(ref region) = region {
            builder = builder.region(Region::new(region.clone()));
        }

        if let Some(ref endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint.clone()).force_path_style(true);
        }

        let region = region.or_else(|| sdk_config.region().map(|r| r.as_ref().to_string()));

        S3Storage {
            client: Client::from_conf(builder.build()),
            region,
            endpoint_url,
        }
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client, region: Option<String>) -> Self {
        S3Storage {
            client,
            region,
            endpoint_url: None,
        }
    }

    /// Generate URL for an S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, bucket: &str, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                bucket,
                self.region.as_deref().unwrap_or(DEFAULT_REGION),
                key
            )
        }
    }

    /// Bucket configuration carrying the region affinity, if one is needed.
    fn create_bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        match self.region.as_deref() {
            None | Some(DEFAULT_REGION) => None,
            Some(region) => Some(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            ),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let result = self
            .client
            .put_object()
            .bucket(bucket)
            .key(storage_key)
            .content_type(content_type)
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await;

        result.map_err(|e| {
            let message = DisplayErrorContext(&e).to_string();
            tracing::error!(
                error = %message,
                bucket = %bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(message)
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(bucket, storage_key))
    }
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.operation = "ListBuckets"
    ))]
    async fn list_containers(&self) -> StorageResult<Vec<String>> {
        let output = self.client.list_buckets().send().await.map_err(|e| {
            let message = DisplayErrorContext(&e).to_string();
            tracing::error!(error = %message, "S3 list buckets failed");
            StorageError::ListFailed(message)
        })?;

        let names: Vec<String> = output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(String::from))
            .collect();

        tracing::debug!(bucket_count = names.len(), "S3 list buckets successful");
        Ok(names)
    }

    #[tracing::instrument(skip(self), fields(
        aws.service.name = "s3",
        aws.s3.bucket = %container,
        aws.s3.operation = "CreateBucket"
    ))]
    async fn create_container(&self, container: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let mut request = self.client.create_bucket().bucket(container);
        if let Some(configuration) = self.create_bucket_configuration() {
            request = request.create_bucket_configuration(configuration);
        }

        match request.send().await {
            Ok(_) => {}
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_bucket_already_owned_by_you() {
                    tracing::info!(bucket = %container, "S3 bucket already owned by caller");
                    return Ok(());
                }
                let message = DisplayErrorContext(&service_error).to_string();
                tracing::error!(
                    error = %message,
                    bucket = %container,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 create bucket failed"
                );
                return Err(StorageError::CreateContainerFailed {
                    container: container.to_string(),
                    message,
                });
            }
        }

        tracing::info!(
            bucket = %container,
            region = self.region.as_deref().unwrap_or(DEFAULT_REGION),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 bucket created"
        );
        Ok(())
    }

    async fn upload_with_key(
        &self,
        container: &str,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.put(container, storage_key, data, content_type).await
    }

    async fn upload_stream(
        &self,
        container: &str,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<(u64, String)> {
        // PutObject needs a known length; source images are small enough to buffer.
        let mut buffer = Vec::with_capacity(content_length.unwrap_or(0) as usize);
        reader.read_to_end(&mut buffer).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
        })?;

        let size = buffer.len() as u64;
        let url = self.put(container, storage_key, buffer, content_type).await?;
        Ok((size, url))
    }

    async fn download(&self, container: &str, storage_key: &str) -> StorageResult<Vec<u8>> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(container)
            .key(storage_key)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return StorageError::NotFound(storage_key.to_string());
                }
                let message = DisplayErrorContext(&service_error).to_string();
                tracing::error!(
                    error = %message,
                    bucket = %container,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::DownloadFailed(message)
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tracing::info!(
            bucket = %container,
            key = %storage_key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn exists(&self, container: &str, storage_key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(container)
            .key(storage_key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(StorageError::BackendError(
                        DisplayErrorContext(&service_error).to_string(),
                    ))
                }
            }
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials};

    fn storage(region: Option<&str>, endpoint: Option<&str>) -> S3Storage {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .region(Region::new(region.unwrap_or(DEFAULT_REGION).to_string()))
            .build();
        let mut storage =
            S3Storage::from_client(Client::from_conf(config), region.map(String::from));
        storage.endpoint_url = endpoint.map(String::from);
        storage
    }

    #[test]
    fn url_uses_virtual_host_style_on_aws() {
        let storage = storage(Some("ap-southeast-2"), None);
        assert_eq!(
            storage.generate_url("project-sketch-to-voice", "sketch/sample.png"),
            "https://project-sketch-to-voice.s3.ap-southeast-2.amazonaws.com/sketch/sample.png"
        );
    }

    #[test]
    fn url_uses_path_style_on_custom_endpoint() {
        let storage = storage(None, Some("http://localhost:9000/"));
        assert_eq!(
            storage.generate_url("bucket", "text/sample.png.txt"),
            "http://localhost:9000/bucket/text/sample.png.txt"
        );
    }

    #[test]
    fn location_constraint_omitted_for_us_east_1() {
        assert!(storage(None, None).create_bucket_configuration().is_none());
        assert!(storage(Some("us-east-1"), None)
            .create_bucket_configuration()
            .is_none());

        let configuration = storage(Some("eu-west-1"), None)
            .create_bucket_configuration()
            .unwrap();
        assert_eq!(
            configuration.location_constraint(),
            Some(&BucketLocationConstraint::EuWest1)
        );
    }

    #[test]
    fn reports_s3_backend() {
        assert_eq!(storage(None, None).backend_type(), StorageBackend::S3);
    }
}
