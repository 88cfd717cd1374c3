use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

// Uploads objects to an S3/MinIO style bucket behind a token-authenticated gateway
#[derive(Clone)]
pub struct StorageClient {
    http_client: Client,
    endpoint: String,
    bucket: String,
    access_token: SecretString,
    public_url: String,
}

impl StorageClient {
    pub fn new(
        endpoint: String,
        bucket: String,
        access_token: SecretString,
        public_url: String,
        timeout: Duration,
    ) -> Result<StorageClient, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket,
            access_token,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    // Returns the stored path, `/{bucket}/{object}`
    #[tracing::instrument("Uploading object to storage", skip(self, body))]
    pub async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<String, reqwest::Error> {
        let path = format!("/{}/{}", self.bucket, object_name.trim_start_matches('/'));

        self.http_client
            .put(format!("{}{}", self.endpoint, path))
            .bearer_auth(self.access_token.expose_secret())
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(path)
    }

    pub fn public_url_for(&self, path: &str) -> String {
        format!("{}{}", self.public_url, path)
    }
}
