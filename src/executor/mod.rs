//! Runs a plan against the gateway, one image at a time in plan order.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    error::Result,
    gateway::{Client, Transport},
    plan::{ImageRequest, Plan},
    printer::Progress,
};

#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    pub out_dir: PathBuf,
    pub overwrite: bool,
    /// Keep going after a failed item instead of stopping the run.
    pub keep_going: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub generated: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub fn output_path(out_dir: &Path, item: &ImageRequest) -> PathBuf {
    out_dir.join(format!("{}.png", item.name))
}

pub async fn run_plan<T: Transport>(
    plan: &Plan,
    opts: &ExecuteOptions,
    client: &Client<T>,
    progress: &Progress,
) -> Result<RunSummary> {
    plan.validate()?;
    std::fs::create_dir_all(&opts.out_dir)?;

    let total = plan.images.len();
    let mut summary = RunSummary::default();

    for (i, item) in plan.images.iter().enumerate() {
        let out = output_path(&opts.out_dir, item);
        if out.exists() && !opts.overwrite {
            progress.skip(&out);
            summary.skipped += 1;
            continue;
        }

        progress.start(i + 1, total, &item.name, item.slide_number);
        info!(name = %item.name, slide = item.slide_number, "generating");
        match client.generate(&item.prompt, &item.size, &item.resolution, &out).await {
            Ok(outcome) => {
                info!(name = %item.name, ?outcome, "generated");
                progress.wrote(&out);
                summary.generated += 1;
            }
            Err(err) if opts.keep_going && !err.is_config() => {
                warn!(name = %item.name, error = %err, "image failed, continuing");
                progress.failed(&item.name, &err);
                summary.failed.push(item.name.clone());
            }
            Err(err) => {
                warn!(name = %item.name, error = %err, "image failed");
                return Err(err);
            }
        }
    }

    progress.done();
    Ok(summary)
}
