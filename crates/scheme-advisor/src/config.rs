use std::path::{Path, PathBuf};

use advisor_common::openai::OpenAiClientConfig;

use crate::error::AppError;

const DEFAULT_DATASET_PATH: &str = "Government_Schemes_Dataset.csv";
const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the scheme CSV.
    pub dataset_path: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    pub openai: OpenAiClientConfig,
    /// Serve MCP over raw TCP instead of stdio.
    pub tcp_listen_addr: Option<String>,
    /// Serve MCP over streamable HTTP at `/mcp`.
    pub http_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `SCHEMES_CSV_PATH` (default: "Government_Schemes_Dataset.csv"; must exist)
    /// - `ADVISOR_MODEL` (default: "llama3-8b-8192")
    /// - `OPENAI_BASE_URL`, `GROQ_API_KEY`/`OPENAI_API_KEY`, `OPENAI_TIMEOUT_SECS`,
    ///   `OPENAI_MAX_ERROR_BODY_BYTES`
    /// - `MCP_TCP_LISTEN_ADDR`, `MCP_HTTP_LISTEN_ADDR` (mutually exclusive)
    ///
    /// A missing API key is not an error here; advisory calls fail when made.
    pub fn from_env() -> Result<Self, AppError> {
        let dataset_path = std::env::var("SCHEMES_CSV_PATH")
            .unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string());
        if !Path::new(&dataset_path).is_file() {
            return Err(AppError::Config(format!(
                "scheme dataset not found: {dataset_path} (set SCHEMES_CSV_PATH)"
            )));
        }

        let model = std::env::var("ADVISOR_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let tcp_listen_addr = std::env::var("MCP_TCP_LISTEN_ADDR").ok();
        let http_listen_addr = std::env::var("MCP_HTTP_LISTEN_ADDR").ok();
        if tcp_listen_addr.is_some() && http_listen_addr.is_some() {
            return Err(AppError::Config(
                "MCP_TCP_LISTEN_ADDR and MCP_HTTP_LISTEN_ADDR cannot both be set".to_string(),
            ));
        }

        Ok(Self {
            dataset_path,
            model,
            openai: OpenAiClientConfig::from_env(),
            tcp_listen_addr,
            http_listen_addr,
        })
    }

    pub fn dataset_path(&self) -> PathBuf {
        Path::new(&self.dataset_path).to_path_buf()
    }
}
