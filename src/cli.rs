use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hotel_intel::config::{ServiceConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use hotel_intel::sort::SortKey;

#[derive(Parser, Debug)]
#[command(
    name = "hotel-intel",
    version,
    about = "Search-grounded hotel intelligence reports with spreadsheet export"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    #[arg(long, env = "GEMINI_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Directory export files are written to.
    #[arg(long, default_value = ".", global = true)]
    pub out_dir: PathBuf,

    /// Read a saved service response instead of calling the service.
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig::new(
            self.api_key.clone(),
            self.model.clone(),
            self.endpoint.clone(),
            self.timeout_secs,
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Menu-driven session (the default).
    Interactive,
    /// Search once, print the report and optionally export it.
    Search(SearchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[arg(long)]
    pub hotel: String,

    #[arg(long)]
    pub city: String,

    /// Sort the room table; repeat the flag to toggle direction.
    #[arg(long, value_enum)]
    pub sort: Vec<SortArg>,

    #[arg(long, default_value_t = false)]
    pub export: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Name,
    Size,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Size => SortKey::Size,
        }
    }
}
