use crate::error::{ConfigError, GenerateError};
use std::env;
use std::str::FromStr;

pub const DEFAULT_API_VERSION: &str = "2024-06-01";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_INSTRUCTION: &str = "you are a bot that answers questions from the document";

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    pub frequency_penalty: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.6,
            max_tokens: 256,
            frequency_penalty: 0.7,
        }
    }
}

/// Everything the answer generator needs to reach the completion endpoint.
///
/// Endpoint and key stay optional here: their absence is reported when an
/// answer is requested, before any network traffic.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_version: String,
    pub model: String,
    pub instruction: String,
    pub sampling: SamplingParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            sampling: SamplingParams::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = SamplingParams::default();

        let sampling = SamplingParams {
            temperature: parse_or(&lookup, "DOCQA_TEMPERATURE", defaults.temperature)?,
            top_p: parse_or(&lookup, "DOCQA_TOP_P", defaults.top_p)?,
            max_tokens: parse_or(&lookup, "DOCQA_MAX_TOKENS", defaults.max_tokens)?,
            frequency_penalty: parse_or(
                &lookup,
                "DOCQA_FREQUENCY_PENALTY",
                defaults.frequency_penalty,
            )?,
        };

        Ok(Self {
            endpoint: non_blank("AZURE_OPENAI_ENDPOINT"),
            api_key: non_blank("AZURE_OPENAI_API_KEY"),
            api_version: non_blank("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model: non_blank("AZURE_OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            sampling,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }

    /// Endpoint and API key, or `MissingCredentials` if either is absent.
    pub fn credentials(&self) -> Result<(&str, &str), GenerateError> {
        match (self.endpoint.as_deref(), self.api_key.as_deref()) {
            (Some(endpoint), Some(key)) if !endpoint.trim().is_empty() && !key.trim().is_empty() => {
                Ok((endpoint, key))
            }
            _ => Err(GenerateError::MissingCredentials),
        }
    }

    /// Chat completions URL for the configured deployment, without the query string.
    pub fn completions_url(&self, endpoint: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value,
        }),
    }
}
