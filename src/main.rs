mod cli;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use cli::Command;
use slidegen::{
    build_plan,
    executor::{run_plan, ExecuteOptions},
    printer::Progress,
    utils::read_document,
    Client, Config, GatewaySettings, Overrides, Plan,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let default_level = if args.verbose { "slidegen=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load(args.dotenv.as_deref())?;
    if let Some(p) = &cfg.dotenv_path {
        tracing::debug!(path = %p.display(), "loaded dotenv");
    }

    match args.command {
        Command::MakePlan { input, theme, analysis_start_slide, out } => {
            let document = read_document(&input)?;
            let plan = build_plan(&document, &theme, analysis_start_slide);
            if plan.images.is_empty() {
                tracing::warn!(path = %input.display(), "no Detailed Analysis sections found; plan is empty");
            }
            plan.write_to(&out)
                .with_context(|| format!("Failed to write plan '{}'", out.display()))?;
            println!("Wrote plan: {}", out.display());
            Ok(())
        }
        Command::Generate {
            plan,
            out_dir,
            base_url,
            key,
            model,
            poll_interval,
            timeout,
            overwrite,
            keep_going,
        } => {
            let overrides = Overrides {
                base_url,
                api_key: key,
                model,
                poll_interval_secs: poll_interval,
                timeout_secs: timeout,
            };
            let settings = GatewaySettings::resolve(&cfg, &overrides)?;
            let plan = Plan::read_from(&plan)?;
            let client = Client::from_settings(settings)?;
            let opts = ExecuteOptions { out_dir, overwrite, keep_going };

            let summary = run_plan(&plan, &opts, &client, &Progress::default()).await?;
            if !summary.is_success() {
                bail!("{} image(s) failed: {}", summary.failed.len(), summary.failed.join(", "));
            }
            Ok(())
        }
    }
}
