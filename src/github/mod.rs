//! Read-only view of a GitHub organisation and its public repositories.
//!
//! The client never talks to the network itself: every payload comes from a
//! [`JsonFetcher`]. Both the organisation document and the repository list
//! are fetched at most once per client.

use anyhow::{Result, anyhow};
use serde_json::Value;
use tracing::debug;

use crate::utils::{Memoized, access_nested_map};

mod fixtures;

pub use fixtures::FixtureFetcher;

/// Organisation endpoint template; `{org}` is replaced by the login.
pub const ORG_URL: &str = "https://api.github.com/orgs/{org}";

/// Source of JSON documents keyed by URL.
pub trait JsonFetcher {
    fn get_json(&self, url: &str) -> Result<Value>;
}

impl<F: JsonFetcher + ?Sized> JsonFetcher for &F {
    fn get_json(&self, url: &str) -> Result<Value> {
        (**self).get_json(url)
    }
}

pub struct OrgClient<F> {
    org_name: String,
    url_template: String,
    fetcher: F,
    org: Memoized<Value>,
    repos_payload: Memoized<Value>,
}

impl<F: JsonFetcher> OrgClient<F> {
    pub fn new(org_name: impl Into<String>, fetcher: F) -> Self {
        Self {
            org_name: org_name.into(),
            url_template: ORG_URL.to_string(),
            fetcher,
            org: Memoized::new(),
            repos_payload: Memoized::new(),
        }
    }

    /// Use a different organisation URL template (must contain `{org}`).
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    pub fn org_url(&self) -> String {
        self.url_template.replace("{org}", &self.org_name)
    }

    /// The organisation document, fetched on first access.
    pub fn org(&self) -> Result<&Value> {
        self.org.get_or_try_init(|| {
            let url = self.org_url();
            debug!("Fetching organisation `{}` from {}", self.org_name, url);
            self.fetcher.get_json(&url)
        })
    }

    /// `repos_url` of the organisation document.
    pub fn public_repos_url(&self) -> Result<&str> {
        let org = self.org()?;
        access_nested_map(org, &["repos_url"])?
            .as_str()
            .ok_or_else(|| anyhow!("`repos_url` of `{}` is not a string", self.org_name))
    }

    /// The repository list, fetched on first access.
    pub fn repos_payload(&self) -> Result<&Value> {
        self.repos_payload.get_or_try_init(|| {
            let url = self.public_repos_url()?;
            debug!("Fetching repositories of `{}` from {}", self.org_name, url);
            self.fetcher.get_json(url)
        })
    }

    /// Names of the public repositories, optionally only those under `license`.
    pub fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>> {
        let repos = self
            .repos_payload()?
            .as_array()
            .ok_or_else(|| anyhow!("repository payload of `{}` is not a list", self.org_name))?;

        let mut names = Vec::with_capacity(repos.len());
        for repo in repos {
            if license.is_some_and(|key| !Self::has_license(repo, key)) {
                continue;
            }
            let name = access_nested_map(repo, &["name"])?
                .as_str()
                .ok_or_else(|| anyhow!("repository `name` of `{}` is not a string", self.org_name))?;
            names.push(name.to_string());
        }

        Ok(names)
    }

    /// Whether `repo["license"]["key"]` equals `license_key`. A repository
    /// without that path has no license.
    pub fn has_license(repo: &Value, license_key: &str) -> bool {
        access_nested_map(repo, &["license", "key"])
            .map(|key| key.as_str() == Some(license_key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned payloads and records every requested URL.
    #[derive(Default)]
    struct RecordingFetcher {
        payloads: HashMap<String, Value>,
        calls: RefCell<Vec<String>>,
    }

    impl RecordingFetcher {
        fn with(mut self, url: &str, payload: Value) -> Self {
            self.payloads.insert(url.to_string(), payload);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl JsonFetcher for RecordingFetcher {
        fn get_json(&self, url: &str) -> Result<Value> {
            self.calls.borrow_mut().push(url.to_string());
            self.payloads
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow!("unexpected url {}", url))
        }
    }

    const REPOS_URL: &str = "https://api.github.com/orgs/google/repos";

    fn repos_payload() -> Value {
        json!([
            {"name": "episodes.dart", "license": {"key": "bsd-3-clause"}},
            {"name": "cpp-netlib", "license": {"key": "bsl-1.0"}},
            {"name": "dagger", "license": {"key": "apache-2.0"}},
            {"name": "ios-webkit-debug-proxy", "license": {"key": "other"}},
            {"name": "google.github.io", "license": null},
            {"name": "kratu"},
            {"name": "build-debian-cloud", "license": {"key": "apache-2.0"}},
        ])
    }

    fn google_fetcher() -> RecordingFetcher {
        RecordingFetcher::default()
            .with(
                "https://api.github.com/orgs/google",
                json!({"login": "google", "repos_url": REPOS_URL}),
            )
            .with(REPOS_URL, repos_payload())
    }

    #[test]
    fn test_org() {
        for org in ["google", "abc"] {
            let expected = json!({"login": org});
            let url = ORG_URL.replace("{org}", org);
            let fetcher = RecordingFetcher::default().with(&url, expected.clone());

            let client = OrgClient::new(org, &fetcher);
            assert_eq!(client.org().unwrap(), &expected);
            assert_eq!(client.org().unwrap(), &expected);
            assert_eq!(fetcher.calls(), vec![url]);
        }
    }

    #[test]
    fn test_public_repos_url() {
        let fetcher = google_fetcher();
        let client = OrgClient::new("google", &fetcher);

        assert_eq!(client.public_repos_url().unwrap(), REPOS_URL);
    }

    #[test]
    fn test_public_repos_url_missing() {
        let fetcher = RecordingFetcher::default()
            .with("https://api.github.com/orgs/empty", json!({"login": "empty"}));
        let client = OrgClient::new("empty", &fetcher);

        let err = client.public_repos_url().unwrap_err();
        assert_eq!(err.to_string(), "key not found: repos_url");
    }

    #[test]
    fn test_public_repos() {
        let fetcher = google_fetcher();
        let client = OrgClient::new("google", &fetcher);

        let repos = client.public_repos(None).unwrap();
        assert_eq!(repos.len(), 7);
        assert_eq!(repos[0], "episodes.dart");

        // Second listing is served from the cached payloads.
        client.public_repos(None).unwrap();
        assert_eq!(
            fetcher.calls(),
            vec!["https://api.github.com/orgs/google".to_string(), REPOS_URL.to_string()]
        );
    }

    #[test]
    fn test_public_repos_with_license() {
        let fetcher = google_fetcher();
        let client = OrgClient::new("google", &fetcher);

        assert_eq!(
            client.public_repos(Some("apache-2.0")).unwrap(),
            vec!["dagger".to_string(), "build-debian-cloud".to_string()]
        );
        assert!(client.public_repos(Some("mit")).unwrap().is_empty());
    }

    #[test]
    fn test_public_repos_requires_names() {
        let fetcher = RecordingFetcher::default()
            .with(
                "https://api.github.com/orgs/acme",
                json!({"login": "acme", "repos_url": "https://api.github.com/orgs/acme/repos"}),
            )
            .with(
                "https://api.github.com/orgs/acme/repos",
                json!([
                    {"name": "rocket", "license": {"key": "mit"}},
                    {"license": {"key": "apache-2.0"}},
                    {"name": 7, "license": {"key": "bsd-3-clause"}},
                ]),
            );
        let client = OrgClient::new("acme", &fetcher);

        let err = client.public_repos(None).unwrap_err();
        assert_eq!(err.to_string(), "key not found: name");

        let err = client.public_repos(Some("bsd-3-clause")).unwrap_err();
        assert!(err.to_string().contains("is not a string"));

        // Entries excluded by the license filter are never inspected.
        assert_eq!(client.public_repos(Some("mit")).unwrap(), vec!["rocket"]);
    }

    #[test]
    fn test_has_license() {
        let cases = [
            (json!({"license": {"key": "my_license"}}), "my_license", true),
            (json!({"license": {"key": "other_license"}}), "my_license", false),
            (json!({"license": null}), "my_license", false),
            (json!({}), "my_license", false),
        ];

        for (repo, key, expected) in cases {
            assert_eq!(OrgClient::<RecordingFetcher>::has_license(&repo, key), expected);
        }
    }

    #[test]
    fn test_failed_fetch_is_retried() {
        let fetcher = RecordingFetcher::default();
        let client = OrgClient::new("ghost", &fetcher);

        assert!(client.org().is_err());
        assert!(client.org().is_err());
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[test]
    fn test_custom_url_template() {
        let fetcher = RecordingFetcher::default()
            .with("http://localhost/orgs/acme.json", json!({"login": "acme"}));
        let client = OrgClient::new("acme", &fetcher)
            .with_url_template("http://localhost/orgs/{org}.json");

        assert_eq!(client.org_url(), "http://localhost/orgs/acme.json");
        assert_eq!(client.org().unwrap()["login"], "acme");
    }

    #[test]
    fn test_clients_do_not_share_cache() {
        let fetcher = google_fetcher();
        let first = OrgClient::new("google", &fetcher);
        let second = OrgClient::new("google", &fetcher);

        first.org().unwrap();
        second.org().unwrap();
        assert_eq!(fetcher.calls().len(), 2);
    }
}
