pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const API_URL_ENV: &str = "USER_ADMIN_API_URL";

/// Picks the API base url: an explicit value first, then a non-empty
/// `USER_ADMIN_API_URL`, then the local default.
pub fn resolve_api_url(explicit: Option<String>) -> String {
    resolve_api_url_with(explicit, |key| std::env::var(key).ok())
}

pub fn resolve_api_url_with(
    explicit: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> String {
    explicit
        .filter(|url| !url.trim().is_empty())
        .or_else(|| env(API_URL_ENV).filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_beats_environment() {
        let url = resolve_api_url_with(Some("http://api.internal/api".into()), |_| {
            Some("http://env/api".into())
        });
        assert_eq!(url, "http://api.internal/api");
    }

    #[test]
    fn falls_back_to_environment_then_default() {
        let url = resolve_api_url_with(None, |key| {
            (key == API_URL_ENV).then(|| "http://env/api".to_string())
        });
        assert_eq!(url, "http://env/api");

        let url = resolve_api_url_with(None, |_| Some("  ".into()));
        assert_eq!(url, DEFAULT_API_URL);
    }
}
