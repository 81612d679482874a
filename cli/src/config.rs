//! Command-line and environment configuration.

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Terminal client for a paginated todo list.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo", version)]
pub struct Config {
    /// Base URL of the todo service
    #[arg(long, env = "TODO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Owner of newly created todos
    #[arg(long, env = "TODO_USER_ID", default_value_t = 1)]
    pub user_id: u64,

    /// Height of the list viewport in rows
    #[arg(long, env = "TODO_ROWS", default_value_t = 15, value_parser = clap::value_parser!(u16).range(1..))]
    pub rows: u16,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "TODO_LOG", default_value = "warn")]
    pub log_level: String,
}

impl Config {
    /// Parse arguments after loading a `.env` file, if any.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}
