use std::str::FromStr;

use anyhow::{anyhow, ensure, Context, Result};

/// Which `DocumentExtractor` backs CV uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorBackend {
    Mock,
    Pdf,
}

impl FromStr for ExtractorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "pdf" => Ok(Self::Pdf),
            other => Err(anyhow!("unknown CV extractor '{other}' (expected 'mock' or 'pdf')")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Public origin used when issuing application links.
    pub app_base_url: String,
    pub session_ttl_secs: u64,
    pub cv_extractor: ExtractorBackend,
    pub mock_extraction_delay_ms: u64,
    pub interview_budget_secs: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket: require_env("S3_BUCKET")?,
            s3_endpoint: require_env("S3_ENDPOINT")?,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "https://selectra.app".to_string()),
            session_ttl_secs: optional_env("SESSION_TTL_SECS", 86_400)?,
            cv_extractor: optional_env("CV_EXTRACTOR", ExtractorBackend::Mock)?,
            mock_extraction_delay_ms: optional_env("MOCK_EXTRACTION_DELAY_MS", 2_000)?,
            interview_budget_secs: interview_budget(optional_env("INTERVIEW_BUDGET_SECS", 40 * 60)?)?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn interview_budget(secs: u32) -> Result<u32> {
    ensure!(secs > 0, "INTERVIEW_BUDGET_SECS must be at least 1 second");
    Ok(secs)
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractor_backend_parses_case_insensitively() {
        assert_eq!("PDF".parse::<ExtractorBackend>().unwrap(), ExtractorBackend::Pdf);
        assert_eq!(" mock ".parse::<ExtractorBackend>().unwrap(), ExtractorBackend::Mock);
    }

    #[test]
    fn test_extractor_backend_rejects_unknown() {
        assert!("ocr".parse::<ExtractorBackend>().is_err());
    }

    #[test]
    fn test_optional_env_falls_back_to_default() {
        let value: u16 = optional_env("SELECTRA_TEST_UNSET_PORT_VARIABLE", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_interview_budget_must_be_positive() {
        assert!(interview_budget(0).is_err());
        assert_eq!(interview_budget(2400).unwrap(), 2400);
    }
}
