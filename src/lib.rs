//! Slide illustration planning and image generation.
//!
//! Modules:
//! - `plan`: plan data model plus the document-to-plan builder and prompt template.
//! - `gateway`: generation gateway client (shape classification, task polling, downloads).
//! - `executor`: sequential plan runner with skip-existing idempotence.
//! - `config`: layered configuration and gateway settings resolution.
//! - `error`: error taxonomy shared by the above.

pub mod config;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod plan;
pub mod printer;
pub mod utils;

pub use config::{Config, GatewaySettings, Overrides};
pub use error::GenerateError;
pub use executor::{run_plan, ExecuteOptions, RunSummary};
pub use gateway::Client;
pub use plan::{build_plan, ImageRequest, Plan};
