//! Application paths and share links.

/// Prefix of every backend route.
pub const API_BASE: &str = "/api";

/// Where an expired session sends the user.
pub const ROOT_PATH: &str = "/";

/// Link handed to senders: `{base}/p/{public_id}`.
pub fn public_link(base_url: &str, public_id: &str) -> String {
    join(base_url, &format!("/p/{}", public_id))
}

/// Link kept by the owner to read messages: `{base}/r/{private_id}`.
pub fn private_link(base_url: &str, private_id: &str) -> String {
    join(base_url, &format!("/r/{}", private_id))
}

/// Backend endpoint under [`API_BASE`], e.g. `api_url(base, "/generate")`.
pub fn api_url(base_url: &str, path: &str) -> String {
    join(base_url, &format!("{}/{}", API_BASE, path.trim_start_matches('/')))
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_links() {
        assert_eq!(
            public_link("http://localhost:8000", "abc"),
            "http://localhost:8000/p/abc"
        );
        assert_eq!(
            private_link("http://localhost:8000/", "xyz"),
            "http://localhost:8000/r/xyz"
        );
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            api_url("https://drop.example//", "/public/abc"),
            "https://drop.example/api/public/abc"
        );
        assert_eq!(
            api_url("https://drop.example", "generate"),
            "https://drop.example/api/generate"
        );
    }
}
