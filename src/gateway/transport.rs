//! HTTP plumbing behind a trait so the client can run against a scripted gateway in tests.

use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{GenerateError, Result};

/// Downloads are written through a buffer of this size.
pub const DOWNLOAD_CHUNK_BYTES: usize = 256 * 1024;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value>;

    async fn get_json(&self, url: &str, headers: &HeaderMap) -> Result<Value>;

    /// Fetch `url` without credentials and store the body at `out`. Returns bytes written.
    async fn download_to(&self, url: &str, out: &Path) -> Result<u64>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// `request_timeout` bounds each individual request, downloads included.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value> {
        let resp = self.http.post(url).headers(headers.clone()).json(body).send().await?;
        read_json(url, resp).await
    }

    async fn get_json(&self, url: &str, headers: &HeaderMap) -> Result<Value> {
        let resp = self.http.get(url).headers(headers.clone()).send().await?;
        read_json(url, resp).await
    }

    async fn download_to(&self, url: &str, out: &Path) -> Result<u64> {
        let resp = ensure_success(url, self.http.get(url).send().await?).await?;

        let (file, temp_path) = temp_sibling(out)?.into_parts();
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_BYTES, tokio::fs::File::from_std(file));
        let mut written = 0u64;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            writer.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        writer.flush().await?;
        writer.into_inner().sync_all().await?;

        // Dropping temp_path on an earlier error removes the partial file.
        temp_path.persist(out).map_err(|e| GenerateError::Io(e.error))?;
        Ok(written)
    }
}

async fn ensure_success(url: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(GenerateError::Http { url: url.to_string(), status: status.as_u16(), body })
}

async fn read_json(url: &str, resp: reqwest::Response) -> Result<Value> {
    let resp = ensure_success(url, resp).await?;
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

fn temp_sibling(out: &Path) -> Result<tempfile::NamedTempFile> {
    let dir = parent_dir(out);
    std::fs::create_dir_all(&dir)?;
    Ok(tempfile::Builder::new().prefix(".slidegen-").suffix(".part").tempfile_in(dir)?)
}

fn parent_dir(out: &Path) -> PathBuf {
    match out.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write `bytes` to `out` via a temporary sibling, so `out` only ever holds a complete image.
pub fn write_atomic(out: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = temp_sibling(out)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(out).map_err(|e| GenerateError::Io(e.error))?;
    Ok(())
}
