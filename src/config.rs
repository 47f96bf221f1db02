use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    /// Identity provider project ref, from `https://<ref>.supabase.co`.
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    pub port: u16,
    pub run_migrations: bool,
    pub listing: ListingConfig,
    pub cache: CacheConfig,
}

/// Page sizes and storage timeout of the listings.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    pub job_page_size: u64,
    pub company_page_size: u64,
    pub fetch_timeout: Duration,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            job_page_size: 10,
            company_page_size: 32,
            fetch_timeout: Duration::from_millis(5000),
        }
    }
}

/// Cache TTLs
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub job_list_ttl: Duration,
    pub company_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            job_list_ttl: Duration::from_secs(60),
            company_ttl: Duration::from_secs(600),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            job_list_ttl: parse_duration_secs("CACHE_TTL_JOB_LIST", defaults.job_list_ttl)?,
            company_ttl: parse_duration_secs("CACHE_TTL_COMPANY", defaults.company_ttl)?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_project_ref = project_ref(&supabase_url).ok_or(ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: "expected https://PROJECT.supabase.co".to_string(),
        })?;

        let listing_defaults = ListingConfig::default();
        let fetch_timeout_ms: u64 = parse_or(
            "LISTING_FETCH_TIMEOUT_MS",
            listing_defaults.fetch_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase_project_ref,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            port: parse_or("PORT", 8080)?,
            run_migrations: parse_or("RUN_MIGRATIONS", true)?,
            listing: ListingConfig {
                job_page_size: parse_or("JOB_PAGE_SIZE", listing_defaults.job_page_size)?,
                company_page_size: parse_or(
                    "COMPANY_PAGE_SIZE",
                    listing_defaults.company_page_size,
                )?,
                fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            },
            cache: CacheConfig::from_env()?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_duration_secs(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    parse_or(name, default.as_secs()).map(Duration::from_secs)
}

/// `https://abcd.supabase.co` -> `abcd`
pub fn project_ref(supabase_url: &str) -> Option<String> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_project_ref() {
        assert_eq!(
            project_ref("https://abcd1234.supabase.co").as_deref(),
            Some("abcd1234")
        );
        assert_eq!(
            project_ref("https://abcd1234.supabase.co/").as_deref(),
            Some("abcd1234")
        );
        assert_eq!(project_ref("http://abcd1234.supabase.co"), None);
        assert_eq!(project_ref("https://.supabase.co"), None);
    }

    #[test]
    fn listing_defaults() {
        let listing = ListingConfig::default();
        assert_eq!(listing.job_page_size, 10);
        assert_eq!(listing.company_page_size, 32);
        assert_eq!(listing.fetch_timeout, Duration::from_secs(5));
    }
}
