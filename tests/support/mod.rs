#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use slidegen::{
    error::{GenerateError, Result},
    gateway::{transport::write_atomic, Transport},
    GatewaySettings, ImageRequest, Plan,
};
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub enum Call {
    Post { url: String, headers: HeaderMap, body: Value },
    Get { url: String, headers: HeaderMap, at: Instant, output_present: bool },
    Download { url: String, out: PathBuf },
}

/// In-memory gateway: creation responses and task statuses are served from queues.
#[derive(Default)]
pub struct ScriptedGateway {
    posts: Mutex<VecDeque<Value>>,
    gets: Mutex<VecDeque<Value>>,
    /// Served once `gets` runs dry.
    get_fallback: Mutex<Option<Value>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Call>>,
    watch: Mutex<Option<PathBuf>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_post(self, v: Value) -> Self {
        self.posts.lock().unwrap().push_back(v);
        self
    }

    pub fn on_get(self, v: Value) -> Self {
        self.gets.lock().unwrap().push_back(v);
        self
    }

    pub fn on_get_forever(self, v: Value) -> Self {
        *self.get_fallback.lock().unwrap() = Some(v);
        self
    }

    pub fn serve_file(self, url: &str, bytes: &[u8]) -> Self {
        self.files.lock().unwrap().insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Record whether `path` exists at each status poll.
    pub fn watch(self, path: &Path) -> Self {
        *self.watch.lock().unwrap() = Some(path.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }
}

pub fn is_post(c: &Call) -> bool {
    matches!(c, Call::Post { .. })
}

pub fn is_get(c: &Call) -> bool {
    matches!(c, Call::Get { .. })
}

pub fn is_download(c: &Call) -> bool {
    matches!(c, Call::Download { .. })
}

#[async_trait]
impl Transport for ScriptedGateway {
    async fn post_json(&self, url: &str, headers: &HeaderMap, body: &Value) -> Result<Value> {
        self.calls.lock().unwrap().push(Call::Post { url: url.into(), headers: headers.clone(), body: body.clone() });
        self.posts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GenerateError::Http { url: url.into(), status: 500, body: "no scripted response".into() })
    }

    async fn get_json(&self, url: &str, headers: &HeaderMap) -> Result<Value> {
        let output_present = self.watch.lock().unwrap().as_ref().is_some_and(|p| p.exists());
        self.calls.lock().unwrap().push(Call::Get {
            url: url.into(),
            headers: headers.clone(),
            at: Instant::now(),
            output_present,
        });
        let next = self.gets.lock().unwrap().pop_front();
        next.or_else(|| self.get_fallback.lock().unwrap().clone())
            .ok_or_else(|| GenerateError::Http { url: url.into(), status: 500, body: "no scripted status".into() })
    }

    async fn download_to(&self, url: &str, out: &Path) -> Result<u64> {
        self.calls.lock().unwrap().push(Call::Download { url: url.into(), out: out.to_path_buf() });
        let bytes = self.files.lock().unwrap().get(url).cloned();
        match bytes {
            Some(bytes) => {
                write_atomic(out, &bytes)?;
                Ok(bytes.len() as u64)
            }
            None => Err(GenerateError::Http { url: url.into(), status: 404, body: "not found".into() }),
        }
    }
}

pub fn settings(poll_secs: f64, timeout_secs: f64) -> GatewaySettings {
    GatewaySettings {
        base_url: "https://gw.test".into(),
        api_key: "sk-test".into(),
        model: "gemini-3-pro-image-preview".into(),
        poll_interval: Duration::from_secs_f64(poll_secs),
        timeout: Duration::from_secs_f64(timeout_secs),
        request_timeout: Duration::from_secs(120),
    }
}

pub fn plan_of(names: &[&str]) -> Plan {
    Plan {
        version: 1,
        theme: "golden-hour".into(),
        model_hint: "gemini-3-pro-image-preview".into(),
        images: names
            .iter()
            .enumerate()
            .map(|(i, n)| ImageRequest {
                name: n.to_string(),
                slide_number: 5 + i as u32,
                size: "16:9".into(),
                resolution: "1K".into(),
                prompt: format!("illustrate {n}"),
            })
            .collect(),
    }
}
