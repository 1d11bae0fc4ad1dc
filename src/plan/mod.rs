//! Plan data model: the persisted contract between `make-plan` and `generate`.

pub mod builder;
pub mod prompt;

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};

pub use builder::build_plan;

pub const PLAN_VERSION: u32 = 1;
pub const DEFAULT_SIZE: &str = "16:9";
pub const DEFAULT_RESOLUTION: &str = "1K";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slide_number: u32,
    #[serde(default = "default_size")]
    pub size: String,
    #[serde(default = "default_resolution")]
    pub resolution: String,
    #[serde(default)]
    pub prompt: String,
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

fn default_resolution() -> String {
    DEFAULT_RESOLUTION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub model_hint: String,
    #[serde(default)]
    pub images: Vec<ImageRequest>,
}

impl Plan {
    /// Parse plan JSON, filling unnamed items with `image-<NN>` (1-based).
    pub fn from_json(text: &str) -> Result<Self> {
        let mut plan: Plan = serde_json::from_str(text)?;
        for (i, img) in plan.images.iter_mut().enumerate() {
            if img.name.trim().is_empty() {
                img.name = format!("image-{:02}", i + 1);
            }
        }
        Ok(plan)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| GenerateError::config(format!("Failed to read plan '{}': {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Checks every item up front so a bad plan fails before any request is sent.
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(GenerateError::config("Plan has no images[]"));
        }
        let mut seen = HashSet::new();
        for img in &self.images {
            if !is_safe_name(&img.name) {
                return Err(GenerateError::config(format!("Plan item name {:?} is not a safe file name", img.name)));
            }
            if !seen.insert(img.name.as_str()) {
                return Err(GenerateError::config(format!("Plan item name {} is used more than once", img.name)));
            }
            if img.prompt.trim().is_empty() {
                return Err(GenerateError::config(format!("Plan item {} missing prompt", img.name)));
            }
        }
        Ok(())
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.chars().any(|c| matches!(c, '/' | '\\' | ':' | '\0') || c.is_control())
}
