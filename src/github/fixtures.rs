use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::info;

use super::JsonFetcher;

/// Serves payloads from a `{ "<url>": <payload>, ... }` document.
#[derive(Debug, Clone, Default)]
pub struct FixtureFetcher {
    payloads: BTreeMap<String, Value>,
}

impl FixtureFetcher {
    pub fn new(payloads: BTreeMap<String, Value>) -> Self {
        Self { payloads }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let payloads: BTreeMap<String, Value> =
            serde_json::from_str(raw).context("fixture document must be a JSON object")?;
        Ok(Self::new(payloads))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading fixtures from {}", path.display()))?;
        let fetcher = Self::from_json(&raw)?;
        info!("Loaded {} fixture payloads from {}", fetcher.len(), path.display());
        Ok(fetcher)
    }

    pub fn insert(&mut self, url: impl Into<String>, payload: Value) {
        self.payloads.insert(url.into(), payload);
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl JsonFetcher for FixtureFetcher {
    fn get_json(&self, url: &str) -> Result<Value> {
        self.payloads
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("No fixture for {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::OrgClient;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_from_json() {
        let fetcher = FixtureFetcher::from_json(
            r#"{
                "https://api.github.com/orgs/acme": {"login": "acme"}
            }"#,
        )
        .unwrap();

        assert_eq!(fetcher.len(), 1);
        assert_eq!(
            fetcher.get_json("https://api.github.com/orgs/acme").unwrap(),
            json!({"login": "acme"})
        );
        assert!(fetcher.get_json("https://api.github.com/orgs/other").is_err());
    }

    #[test]
    fn test_rejects_non_object_document() {
        assert!(FixtureFetcher::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_load_and_list_repos() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = json!({
            "https://api.github.com/orgs/acme": {
                "login": "acme",
                "repos_url": "https://api.github.com/orgs/acme/repos"
            },
            "https://api.github.com/orgs/acme/repos": [
                {"name": "rocket", "license": {"key": "mit"}},
                {"name": "anvil"}
            ]
        });
        write!(file, "{}", doc).unwrap();

        let fetcher = FixtureFetcher::load(file.path()).unwrap();
        let client = OrgClient::new("acme", fetcher);

        assert_eq!(client.public_repos(None).unwrap(), vec!["rocket", "anvil"]);
        assert_eq!(client.public_repos(Some("mit")).unwrap(), vec!["rocket"]);
    }

    #[test]
    fn test_insert() {
        let mut fetcher = FixtureFetcher::default();
        assert!(fetcher.is_empty());

        fetcher.insert("u", json!(1));
        assert_eq!(fetcher.get_json("u").unwrap(), json!(1));
    }
}
