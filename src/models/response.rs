use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An HTTP response stored in the cache, keyed by the request URL.
///
/// Responses are stored opaque: status, headers, and body bytes as they came
/// off the wire, plus the time they were cached. Cached entries are served
/// without any freshness check; a whole cache generation is replaced at once
/// when a new version installs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
            cached_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value matching `name`, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew (negative ages) as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn response_with_headers() -> CachedResponse {
        CachedResponse::new(
            200,
            vec![
                ("Content-Type".to_string(), "text/html".to_string()),
                ("Cache-Control".to_string(), "no-store".to_string()),
            ],
            b"<html></html>".to_vec(),
        )
    }

    #[test]
    fn test_is_success() {
        assert!(CachedResponse::new(200, vec![], vec![]).is_success());
        assert!(CachedResponse::new(204, vec![], vec![]).is_success());
        assert!(!CachedResponse::new(304, vec![], vec![]).is_success());
        assert!(!CachedResponse::new(404, vec![], vec![]).is_success());
        assert!(!CachedResponse::new(500, vec![], vec![]).is_success());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let response = response_with_headers();
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("CACHE-CONTROL"), Some("no-store"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_body_text() {
        let response = response_with_headers();
        assert_eq!(response.body_text(), "<html></html>");
    }

    #[test]
    fn test_age_display_just_now() {
        let response = response_with_headers();
        assert_eq!(response.age_display(), "just now");
    }

    #[test]
    fn test_age_display_rounding() {
        let mut response = response_with_headers();
        response.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(response.age_display(), "5m ago");

        response.cached_at = Utc::now() - Duration::minutes(125);
        assert_eq!(response.age_display(), "2h ago");

        response.cached_at = Utc::now() - Duration::days(3);
        assert_eq!(response.age_display(), "3d ago");
    }

    #[test]
    fn test_serde_round_trip() {
        let response = response_with_headers();
        let json = serde_json::to_string(&response).unwrap();
        let parsed: CachedResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
    }
}
