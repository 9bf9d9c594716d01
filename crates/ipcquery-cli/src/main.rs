use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap::builder::FalseyValueParser;
use ipcquery_ai::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
use ipcquery_server::{HandlerConfig, ResponseMode};
use tracing_subscriber::EnvFilter;

/// Ask Gemini about Indian Penal Code sections over HTTP.
#[derive(Parser, Debug)]
#[command(name = "ipcquery", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "IPCQUERY_BIND", default_value = "127.0.0.1:6000")]
    bind: SocketAddr,

    /// Gemini API key (not checked until the first request)
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// strict: validate the reply as a record; passthrough: return raw text
    #[arg(long, env = "IPCQUERY_MODE", default_value = "strict")]
    mode: ResponseMode,

    /// Timeout for each model call, in seconds
    #[arg(long, env = "IPCQUERY_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Request application/json output from the model
    #[arg(
        long,
        env = "IPCQUERY_JSON_OUTPUT",
        action = clap::ArgAction::SetTrue,
        value_parser = env_flag()
    )]
    json_output: bool,
}

/// Parser for boolean env values: `0`, `false`, `no`, `off` and empty are false,
/// anything else is true.
fn env_flag() -> FalseyValueParser {
    FalseyValueParser::new()
}

impl Cli {
    fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            json_output: self.json_output,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("ipcquery v{}", env!("CARGO_PKG_VERSION"));
    if cli.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is empty; generation calls will fail");
    }

    let client = GeminiClient::new(cli.gemini_config()).context("building Gemini client")?;
    tracing::info!(model = client.model(), mode = %cli.mode, "generation backend ready");

    let config = HandlerConfig {
        mode: cli.mode,
        ..HandlerConfig::default()
    };
    let app = ipcquery_server::router(Arc::new(client), config);
    ipcquery_server::run(cli.bind, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::builder::TypedValueParser;
    use std::ffi::OsStr;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    fn default_of(id: &str) -> String {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id().as_str() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn defaults() {
        assert_eq!(default_of("bind"), "127.0.0.1:6000");
        assert_eq!(default_of("model"), DEFAULT_MODEL);
        assert_eq!(default_of("base_url"), DEFAULT_BASE_URL);
        assert_eq!(default_of("timeout_secs"), "60");
        assert_eq!(default_of("mode"), "strict");
        assert_eq!(default_of("mode").parse::<ResponseMode>(), Ok(ResponseMode::Strict));
    }

    #[test]
    fn json_output_reads_its_env_var() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id().as_str() == "json_output")
            .unwrap();
        assert_eq!(arg.get_env(), Some(OsStr::new("IPCQUERY_JSON_OUTPUT")));
    }

    #[test]
    fn env_flag_accepts_numeric_and_word_booleans() {
        let cmd = Cli::command();
        for value in ["1", "true", "yes", "on", "TRUE"] {
            assert!(env_flag().parse_ref(&cmd, None, OsStr::new(value)).unwrap(), "{value}");
        }
        for value in ["0", "false", "no", "off", ""] {
            assert!(!env_flag().parse_ref(&cmd, None, OsStr::new(value)).unwrap(), "{value}");
        }
    }

    #[test]
    fn json_output_flag() {
        let cli = Cli::try_parse_from(["ipcquery", "--json-output"]).unwrap();
        assert!(cli.gemini_config().json_output);
    }

    #[test]
    fn passthrough_flag() {
        let cli = Cli::try_parse_from(["ipcquery", "--mode", "passthrough", "--timeout-secs", "5"])
            .unwrap();
        assert_eq!(cli.mode, ResponseMode::Passthrough);
        assert_eq!(cli.gemini_config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["ipcquery", "--mode", "loose"]).is_err());
    }
}
