//! Optional check for a newer release on GitHub.

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug)]
pub enum UpdateError {
    NotFound(String),
    RateLimited(String),
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for UpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateError::NotFound(body) => write!(f, "Repository or release not found: {body}"),
            UpdateError::RateLimited(body) => write!(f, "GitHub rate limit hit: {body}"),
            UpdateError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for UpdateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpdateError::NotFound(_) | UpdateError::RateLimited(_) => None,
            UpdateError::Other(e) => Some(&**e),
        }
    }
}

fn latest_release_tag_with_base(base: &str, repo: &str) -> Result<String, UpdateError> {
    let url = format!("{base}/repos/{repo}/releases/latest");
    let response = ureq::get(&url)
        .set("User-Agent", "stride-planner")
        .set("Accept", "application/json")
        .call();
    let body = match response {
        Ok(r) => r
            .into_string()
            .map_err(|e| UpdateError::Other(Box::new(e)))?,
        Err(ureq::Error::Status(404, r)) => {
            return Err(UpdateError::NotFound(r.into_string().unwrap_or_default()));
        }
        Err(ureq::Error::Status(403, r)) => {
            return Err(UpdateError::RateLimited(r.into_string().unwrap_or_default()));
        }
        Err(e) => return Err(UpdateError::Other(Box::new(e))),
    };
    parse_release_tag(&body).ok_or_else(|| UpdateError::NotFound(body))
}

pub fn parse_release_tag(json: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct Release {
        tag_name: String,
    }
    serde_json::from_str::<Release>(json).ok().map(|r| r.tag_name)
}

/// Poll the latest release of `repo` and report its tag when it differs
/// from the running version. Errors are logged, not surfaced.
pub fn check_for_update(repo: &str, current: &str) -> Option<String> {
    match latest_release_tag_with_base(GITHUB_API, repo) {
        Ok(tag) if tag.trim_start_matches('v') != current.trim_start_matches('v') => Some(tag),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Update check failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn parses_tag_name() {
        let json = r#"{"tag_name":"v0.2.0","name":"0.2"}"#;
        assert_eq!(parse_release_tag(json).as_deref(), Some("v0.2.0"));
        assert_eq!(parse_release_tag("not json"), None);
    }

    #[test]
    fn fetches_latest_tag_from_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/repos/user/app/releases/latest");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"tag_name":"v1.3.0"}"#);
        });
        let tag = latest_release_tag_with_base(&server.base_url(), "user/app").unwrap();
        mock.assert();
        assert_eq!(tag, "v1.3.0");
    }

    #[test]
    fn missing_repo_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/user/gone/releases/latest");
            then.status(404).body("{}");
        });
        let err = latest_release_tag_with_base(&server.base_url(), "user/gone").unwrap_err();
        assert!(matches!(err, UpdateError::NotFound(_)));
    }

    #[test]
    fn rate_limit_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/user/app/releases/latest");
            then.status(403).body("slow down");
        });
        let err = latest_release_tag_with_base(&server.base_url(), "user/app").unwrap_err();
        assert!(matches!(err, UpdateError::RateLimited(_)));
    }
}
