use std::path::PathBuf;

use clap::{Parser, Subcommand};

use slidegen::plan::builder::{DEFAULT_START_SLIDE, DEFAULT_THEME};

#[derive(Parser, Debug, Clone)]
#[command(name = "slidegen", about = "Generate slide images via an image gateway (base_url + key)", version)]
pub struct Cli {
    /// Path to .env (optional; auto-detect if omitted).
    #[arg(long, global = true)]
    pub dotenv: Option<PathBuf>,

    /// Log gateway traffic (debug level) to stderr. RUST_LOG takes precedence.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create an images plan JSON from a Deep Research markdown.
    MakePlan {
        /// Input markdown file.
        #[arg(long = "in", value_name = "MD")]
        input: PathBuf,

        /// Theme slug used for the style hint.
        #[arg(long, default_value = DEFAULT_THEME)]
        theme: String,

        /// First analysis slide number.
        #[arg(long = "analysis-start-slide", default_value_t = DEFAULT_START_SLIDE)]
        analysis_start_slide: u32,

        /// Output plan JSON path.
        #[arg(long)]
        out: PathBuf,
    },

    /// Generate images from a plan JSON.
    Generate {
        /// Plan JSON path.
        #[arg(long)]
        plan: PathBuf,

        /// Output directory.
        #[arg(long = "out-dir", default_value = "images")]
        out_dir: PathBuf,

        /// Override GEMINI_BASE_URL.
        #[arg(long = "base-url")]
        base_url: Option<String>,

        /// Override GEMINI_API_KEY.
        #[arg(long)]
        key: Option<String>,

        /// Override GEMINI_MODEL.
        #[arg(long)]
        model: Option<String>,

        /// Seconds between task status checks (default 1.5, or SLIDEGEN_POLL_INTERVAL).
        #[arg(long = "poll-interval")]
        poll_interval: Option<f64>,

        /// Seconds to wait for one task before giving up (default 180, or SLIDEGEN_TIMEOUT).
        #[arg(long)]
        timeout: Option<f64>,

        /// Regenerate images whose output file already exists.
        #[arg(long)]
        overwrite: bool,

        /// Continue with the remaining images after one fails.
        #[arg(long = "keep-going")]
        keep_going: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
