//! Image-generation gateway client.
//!
//! One creation request per image, then whatever follow-up the response shape calls for: task polling,
//! a direct download, or decoding inline base64 data.

pub mod poll;
pub mod shape;
pub mod transport;

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Url,
};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::{
    config::GatewaySettings,
    error::{GenerateError, Result},
};
use poll::{first_image_url, task_status, transition, PollState};
use shape::{classify, GatewayResponse};
pub use transport::{HttpTransport, Transport};

/// The three header conventions gateways use for the key. All are sent on every API request.
pub fn auth_headers(api_key: &str) -> Result<HeaderMap> {
    let invalid = |_| GenerateError::config("GEMINI_API_KEY contains characters not allowed in an HTTP header");
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(invalid)?);
    let key = HeaderValue::from_str(api_key).map_err(invalid)?;
    headers.insert(HeaderName::from_static("x-api-key"), key.clone());
    headers.insert(HeaderName::from_static("x-goog-api-key"), key);
    Ok(headers)
}

/// `{base}/v1/tasks/{task_id}?language=en`, with the id percent-encoded as one path segment.
pub fn task_url(base_url: &str, task_id: &str) -> Result<String> {
    let invalid = || GenerateError::config(format!("GEMINI_BASE_URL {base_url:?} is not a usable base URL"));
    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(["v1", "tasks", task_id]);
    url.set_query(Some("language=en"));
    Ok(url.into())
}

/// Inline image data; line breaks and other ASCII whitespace inside the base64 are ignored.
pub fn decode_inline(b64: &str) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = b64.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// How a single image was materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Polled { task_id: String, ticks: u32 },
    Downloaded,
    Inline,
}

pub struct Client<T: Transport = HttpTransport> {
    transport: T,
    settings: GatewaySettings,
    headers: HeaderMap,
}

impl Client<HttpTransport> {
    pub fn from_settings(settings: GatewaySettings) -> Result<Self> {
        let transport = HttpTransport::new(settings.request_timeout)?;
        Self::with_transport(transport, settings)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(transport: T, settings: GatewaySettings) -> Result<Self> {
        let headers = auth_headers(&settings.api_key)?;
        Ok(Self { transport, settings, headers })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn generate(&self, prompt: &str, size: &str, resolution: &str, out: &Path) -> Result<Outcome> {
        let url = format!("{}/v1/images/generations", self.settings.base_url);
        let body = json!({
            "model": self.settings.model,
            "prompt": prompt,
            "n": 1,
            "size": size,
            "resolution": resolution,
        });
        debug!(%url, model = %self.settings.model, size, resolution, "creating image");
        let payload = self.transport.post_json(&url, &self.headers, &body).await?;

        match classify(payload) {
            GatewayResponse::TaskHandle(task_id) | GatewayResponse::TaskHandleList(task_id) => {
                let ticks = self.poll_task(&task_id, out).await?;
                Ok(Outcome::Polled { task_id, ticks })
            }
            GatewayResponse::DirectResultList(image_url) => {
                self.download(&image_url, out).await?;
                Ok(Outcome::Downloaded)
            }
            GatewayResponse::InlineResultList(b64) => {
                let bytes = decode_inline(&b64)?;
                transport::write_atomic(out, &bytes)?;
                debug!(path = %out.display(), bytes = bytes.len(), "wrote inline image");
                Ok(Outcome::Inline)
            }
            GatewayResponse::Unrecognized(payload) => Err(GenerateError::UnrecognizedShape(payload)),
        }
    }

    /// Polls until the task settles or the wall-clock budget runs out. Returns the number of status fetches.
    async fn poll_task(&self, task_id: &str, out: &Path) -> Result<u32> {
        let url = task_url(&self.settings.base_url, task_id)?;
        let started = Instant::now();
        let mut ticks = 0u32;

        loop {
            let elapsed = started.elapsed();
            let (state, payload) = if elapsed > self.settings.timeout {
                (PollState::TimedOut, Value::Null)
            } else {
                let payload = self.transport.get_json(&url, &self.headers).await?;
                ticks += 1;
                let status = task_status(&payload);
                debug!(task_id, tick = ticks, status = status.unwrap_or("<none>"), "polled task");
                (transition(status), payload)
            };

            match state {
                PollState::TimedOut => {
                    debug!(task_id, ticks, "poll budget exhausted");
                    return Err(GenerateError::TimedOut { task_id: task_id.to_string(), elapsed });
                }
                PollState::Succeeded => {
                    let image_url = first_image_url(&payload).ok_or_else(|| GenerateError::MissingImageUrl {
                        task_id: task_id.to_string(),
                        payload: payload.clone(),
                    })?;
                    self.download(&image_url, out).await?;
                    return Ok(ticks);
                }
                PollState::Failed => {
                    return Err(GenerateError::TaskFailed { task_id: task_id.to_string(), payload });
                }
                PollState::Pending => sleep(self.settings.poll_interval).await,
            }
        }
    }

    async fn download(&self, url: &str, out: &Path) -> Result<()> {
        let bytes = self.transport.download_to(url, out).await?;
        info!(path = %out.display(), bytes, "downloaded image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_headers_send_key_three_ways() {
        let h = auth_headers("sk-123").unwrap();
        assert_eq!(h.get(AUTHORIZATION).unwrap(), "Bearer sk-123");
        assert_eq!(h.get("x-api-key").unwrap(), "sk-123");
        assert_eq!(h.get("x-goog-api-key").unwrap(), "sk-123");
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn task_url_encodes_the_id_as_one_segment() {
        assert_eq!(task_url("https://gw.test", "t-1").unwrap(), "https://gw.test/v1/tasks/t-1?language=en");
        assert_eq!(
            task_url("https://gw.test/api/", "a/b?c#d").unwrap(),
            "https://gw.test/api/v1/tasks/a%2Fb%3Fc%23d?language=en"
        );
        assert!(task_url("not a url", "t").unwrap_err().is_config());
        assert!(task_url("mailto:ops@example.com", "t").unwrap_err().is_config());
    }

    #[test]
    fn inline_data_tolerates_line_breaks() {
        assert_eq!(decode_inline("aGVs\nbG8g\r\nd29y bGQ=").unwrap(), b"hello world");
        assert!(matches!(decode_inline("%%%"), Err(GenerateError::Decode(_))));
    }

    #[test]
    fn auth_headers_reject_control_characters() {
        assert!(auth_headers("bad\nkey").unwrap_err().is_config());
    }
}
