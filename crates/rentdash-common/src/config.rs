//! Backend location.

/// Production host used when no override was baked in at build time.
pub const DEFAULT_API_BASE: &str = "https://api.rentdash.ng";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme and host, no trailing slash.
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `RENTDASH_API_URL` at compile time; WASM has no process env.
    pub fn from_env() -> Self {
        Self::resolve(option_env!("RENTDASH_API_URL"))
    }

    fn resolve(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_API_BASE),
        }
    }

    /// Absolute URL for an API path (`/api/v1/...`).
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_production_host() {
        assert_eq!(ApiConfig::resolve(None).base_url, DEFAULT_API_BASE);
        assert_eq!(ApiConfig::resolve(Some("  ")).base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn override_is_normalized() {
        let cfg = ApiConfig::resolve(Some("http://localhost:8080/"));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(
            cfg.url("/api/v1/admin/banners"),
            "http://localhost:8080/api/v1/admin/banners"
        );
    }
}
