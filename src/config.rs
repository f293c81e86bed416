use std::env;
use std::str::FromStr;
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Directory holding the record store blob.
    pub data_dir: String,
    pub log_dir: String,
    pub api_prefix: String,

    // Listing
    pub default_page_size: usize,

    // Uploads
    pub max_upload_bytes: usize,

    // Rate limiting
    pub rate_upload_per_min: u32,
    pub rate_protected_per_min: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            data_dir: env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),

            default_page_size: env_or("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),

            rate_upload_per_min: env_or("RATE_UPLOAD_PER_MIN", defaults.rate_upload_per_min),
            rate_protected_per_min: env_or("RATE_PROTECTED_PER_MIN", defaults.rate_protected_per_min),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8080".to_string(),
            data_dir: "data".to_string(),
            log_dir: "logs".to_string(),
            api_prefix: "/api".to_string(),
            default_page_size: 10,
            max_upload_bytes: 10 * 1024 * 1024, // 10 MiB
            rate_upload_per_min: 30,
            rate_protected_per_min: 1000,
        }
    }
}

/// Parse `key`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring malformed setting");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_keys_use_defaults() {
        assert_eq!(env_or("STES_TEST_SURELY_UNSET_KEY", 42usize), 42);
    }

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.api_prefix, "/api");
        assert!(config.max_upload_bytes > 0);
    }
}
