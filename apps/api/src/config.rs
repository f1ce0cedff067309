use anyhow::{Context, Result};

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_GITHUB_UPLOADS_URL: &str = "https://uploads.github.com";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// `GITHUB_TOKEN` is deliberately optional here: its absence is reported per request
/// by the release uploader, not at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub llm_timeout_secs: u64,
    pub github_token: Option<String>,
    pub github_repository: String,
    pub github_api_url: String,
    pub github_uploads_url: String,
    pub github_timeout_secs: u64,
    pub release_tag: String,
    pub release_name: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let github_repository = require_env("GITHUB_REPOSITORY")?;
        if !is_owner_and_name(&github_repository) {
            anyhow::bail!(
                "GITHUB_REPOSITORY must look like 'owner/name', got '{github_repository}'"
            );
        }

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            github_token: optional_env("GITHUB_TOKEN"),
            github_repository,
            github_api_url: env_or("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            github_uploads_url: env_or("GITHUB_UPLOADS_URL", DEFAULT_GITHUB_UPLOADS_URL),
            github_timeout_secs: parse_env("GITHUB_TIMEOUT_SECS", 60)?,
            release_tag: env_or("RELEASE_TAG", "v1.0.0"),
            release_name: env_or("RELEASE_NAME", "Career Reports"),
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

fn is_owner_and_name(repository: &str) -> bool {
    matches!(
        repository.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_shape_accepts_owner_and_name() {
        assert!(is_owner_and_name("octo/reports"));
    }

    #[test]
    fn test_repository_shape_rejects_malformed_values() {
        assert!(!is_owner_and_name("reports"));
        assert!(!is_owner_and_name("/reports"));
        assert!(!is_owner_and_name("octo/"));
        assert!(!is_owner_and_name("octo/reports/extra"));
    }
}
