pub mod ai;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod server;

pub use ai::{CompletionClient, CompletionRequest, OpenAiClient};
pub use analysis::{AnalysisError, AnalysisRequest, AnalysisResponse, AnalysisService};
pub use cli::{Cli, CommandHandler, Commands};
pub use config::Settings;
pub use server::{create_router, run_server, AppState};
