// src/utils/links.rs

//! URL helpers for endpoints and notice sources.

use url::Url;

/// Join an API base URL and an endpoint path.
///
/// # Examples
/// ```
/// use govtjobs::utils::links::endpoint;
///
/// assert_eq!(
///     endpoint("http://localhost:8080/api/", "/notices"),
///     "http://localhost:8080/api/notices"
/// );
/// ```
pub fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Extract the host from a URL string.
///
/// # Examples
/// ```
/// use govtjobs::utils::links::get_domain;
///
/// assert_eq!(
///     get_domain("https://upsc.gov.in/exams"),
///     Some("upsc.gov.in".to_string())
/// );
/// ```
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}
