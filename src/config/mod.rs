pub mod cli;
pub mod settings;
pub mod toml_config;

pub use cli::CliArgs;
pub use settings::{ConflictPolicy, ConnectionSettings, ImportSettings, InputFormat};
