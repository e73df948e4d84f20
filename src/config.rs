use std::env;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_cookie: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            session_cookie: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through `lookup` so tests don't touch process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("GYM_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_cookie = lookup("GYM_SESSION_COOKIE").filter(|value| !value.trim().is_empty());

        Self {
            api_url: normalize_url(&api_url),
            session_cookie,
        }
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = normalize_url(api_url);
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_env_is_empty() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.session_cookie, None);
    }

    #[test]
    fn reads_url_and_cookie() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GYM_API_URL", "https://gym.example.com/"),
            ("GYM_SESSION_COOKIE", "session=abc"),
        ]);
        let config = ClientConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.endpoint("/api/workouts"), "https://gym.example.com/api/workouts");
        assert_eq!(config.session_cookie.as_deref(), Some("session=abc"));
    }

    #[test]
    fn flag_overrides_env_url() {
        let config = ClientConfig::from_lookup(|_| None).with_api_url("http://10.0.0.2:8000//");
        assert_eq!(config.api_url, "http://10.0.0.2:8000");
    }
}
