//! Where static JSON datasets come from.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::Value;

use crate::config::WorldboardConfig;
use crate::error::{WorldboardError, WorldboardResult};

/// A read-only source of JSON documents addressed by relative path,
/// e.g. `ports.json` or `country-info.json`.
#[derive(Debug, Clone)]
pub enum DataSource {
    Dir(PathBuf),
    Http {
        client: reqwest::Client,
        base_url: String,
    },
    Memory(HashMap<String, Value>),
}

impl DataSource {
    /// `data_url` wins over `data_dir` when both are configured.
    pub fn from_config(config: &WorldboardConfig) -> WorldboardResult<Self> {
        match &config.data_url {
            Some(url) if !url.trim().is_empty() => DataSource::http(url, config.fetch_timeout()),
            _ => Ok(DataSource::Dir(config.data_path())),
        }
    }

    /// Requests that take longer than `timeout` fail with a fetch error.
    pub fn http(base_url: &str, timeout: Duration) -> WorldboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorldboardError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(DataSource::Http {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn memory<I, K>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        DataSource::Memory(documents.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub async fn fetch_json(&self, path: &str) -> WorldboardResult<Value> {
        let fetch_err = |e: String| WorldboardError::Fetch(path.to_string(), e);

        match self {
            DataSource::Dir(root) => {
                let text = tokio::fs::read_to_string(root.join(path))
                    .await
                    .map_err(|e| fetch_err(e.to_string()))?;
                serde_json::from_str(&text)
                    .map_err(|e| WorldboardError::Parse(format!("{path}: {e}")))
            }
            DataSource::Http { client, base_url } => {
                let resp = client
                    .get(format!("{base_url}/{path}"))
                    .send()
                    .await
                    .map_err(|e| fetch_err(e.to_string()))?;

                if !resp.status().is_success() {
                    return Err(fetch_err(format!("HTTP {}", resp.status())));
                }

                resp.json()
                    .await
                    .map_err(|e| WorldboardError::Parse(format!("{path}: {e}")))
            }
            DataSource::Memory(documents) => documents
                .get(path)
                .cloned()
                .ok_or_else(|| fetch_err("not found".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reads_documents_from_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ports.json"), r#"[{"name":"Rotterdam"}]"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();

        let source = DataSource::Dir(dir.path().to_path_buf());
        assert_eq!(
            source.fetch_json("ports.json").await.unwrap(),
            json!([{"name": "Rotterdam"}])
        );
        assert!(matches!(
            source.fetch_json("missing.json").await,
            Err(WorldboardError::Fetch(..))
        ));
        assert!(matches!(
            source.fetch_json("broken.json").await,
            Err(WorldboardError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn memory_source_serves_known_paths() {
        let source = DataSource::memory([("nuclear.json", json!([]))]);
        assert_eq!(source.fetch_json("nuclear.json").await.unwrap(), json!([]));
        assert!(source.fetch_json("oil_fields.json").await.is_err());
    }

    #[test]
    fn http_base_url_is_normalized() {
        match DataSource::http("https://example.com/data/", Duration::from_secs(5)).unwrap() {
            DataSource::Http { base_url, .. } => assert_eq!(base_url, "https://example.com/data"),
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_fetch_gives_up_after_the_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                open.push(stream);
            }
        });

        let source = DataSource::http(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), source.fetch_json("ports.json"))
            .await
            .expect("request outlived its timeout");
        assert!(matches!(result, Err(WorldboardError::Fetch(..))));
    }
}
