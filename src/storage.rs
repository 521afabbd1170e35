// Supabase Storage REST client (uploads + public URLs).

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::util::env::SiteConfig;

pub struct StorageClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    /// Needs the service key; uploads bypass row-level security.
    pub fn new(cfg: &SiteConfig) -> Result<Self> {
        let service_key = cfg.require_service_key()?.to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("building storage http client")?;
        Ok(Self {
            client,
            base_url: cfg.supabase_url.clone(),
            service_key,
        })
    }

    pub fn object_url(&self, bucket: &str, path: &str) -> String {
        object_url(&self.base_url, bucket, path)
    }

    /// Upload one object. With `upsert` an existing object at the same path is replaced.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        body: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> Result<()> {
        let url = self.object_url(bucket, path);
        let size = body.len();
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .with_context(|| format!("uploading {bucket}/{path}"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("storage upload {bucket}/{path} failed: {status} {text}");
        }
        debug!(bucket, path, size, "uploaded object");
        Ok(())
    }
}

fn object_url(base_url: &str, bucket: &str, path: &str) -> String {
    let encoded = path
        .split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/storage/v1/object/{bucket}/{encoded}", base_url.trim_end_matches('/'))
}

/// Public URL for a `bucket/path` storage path as recorded in the `images` table.
pub fn public_url(base_url: &str, storage_path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}",
        base_url.trim_end_matches('/'),
        storage_path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_urls() {
        assert_eq!(
            public_url("https://abc.supabase.co", "mountain-images/slieve-donard/1.webp"),
            "https://abc.supabase.co/storage/v1/object/public/mountain-images/slieve-donard/1.webp"
        );
        assert_eq!(
            public_url("https://abc.supabase.co/", "/backgrounds/x.webp"),
            "https://abc.supabase.co/storage/v1/object/public/backgrounds/x.webp"
        );
    }

    #[test]
    fn object_url_encodes_segments_not_slashes() {
        assert_eq!(
            object_url("https://abc.supabase.co", "content-images", "walks/my photo.webp"),
            "https://abc.supabase.co/storage/v1/object/content-images/walks/my%20photo.webp"
        );
    }

    #[test]
    fn client_requires_service_key() {
        let cfg = SiteConfig {
            supabase_url: "https://abc.supabase.co".into(),
            anon_key: Some("anon".into()),
            service_key: None,
            mapbox_token: None,
            legacy_site_path: "legacy".into(),
        };
        assert!(StorageClient::new(&cfg).is_err());
    }
}
