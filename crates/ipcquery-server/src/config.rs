use std::fmt;
use std::str::FromStr;

use ipcquery_core::IPC_PROMPT_TEMPLATE;

/// How the handler treats the model's reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    /// Normalise, parse and validate; reject replies that don't fit.
    #[default]
    Strict,
    /// Return the model's text untouched.
    Passthrough,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!(
                "unknown response mode '{other}' (expected 'strict' or 'passthrough')"
            )),
        }
    }
}

/// Per-process handler settings, built once at startup.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    pub mode: ResponseMode,
    /// Preamble placed before `"\nIPC Section: " + query`.
    pub prompt_template: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            mode: ResponseMode::default(),
            prompt_template: IPC_PROMPT_TEMPLATE.to_string(),
        }
    }
}
