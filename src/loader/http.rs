// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use reqwest::Client;
use reqwest::StatusCode;

use crate::loader::ConfigError;
use crate::loader::ConfigLoader;
use crate::loader::parse_json;
use crate::loader::parse_toml;
use crate::loader::validate_name;
use crate::types::config::CardConfiguration;

/// Resolves configurations by fetching `<base>/<name>.config.toml`, falling
/// back to `<base>/<name>.config.json` when the former is not found.
pub struct HttpLoader {
    base: String,
    client: Client,
}

impl HttpLoader {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn url(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.base)
    }

    /// Fetches a document. `Ok(None)` means the server said it doesn't exist.
    async fn fetch(&self, file_name: &str) -> Result<Option<String>, ConfigError> {
        let url = self.url(file_name);
        log::debug!("Fetching {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ConfigError::Load(format!("Failed to load {file_name}: {e}")))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ConfigError::Load(format!(
                "Failed to load {file_name}: HTTP {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| ConfigError::Load(format!("Failed to load {file_name}: {e}")))?;
        Ok(Some(body))
    }
}

impl ConfigLoader for HttpLoader {
    async fn resolve(&self, name: &str) -> Result<CardConfiguration, ConfigError> {
        validate_name(name)?;
        let toml_name = format!("{name}.config.toml");
        if let Some(body) = self.fetch(&toml_name).await? {
            return parse_toml(&body);
        }
        let json_name = format!("{name}.config.json");
        match self.fetch(&json_name).await? {
            Some(body) => parse_json(&body),
            None => Err(ConfigError::Load(format!(
                "Failed to load {json_name}: not found"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let loader = HttpLoader::new("https://example.com/cards/");
        assert_eq!(
            loader.url("index.config.toml"),
            "https://example.com/cards/index.config.toml"
        );
    }

    #[tokio::test]
    async fn test_invalid_name_never_fetches() {
        let loader = HttpLoader::new("http://127.0.0.1:1");
        let result = loader.resolve("a/b").await;
        assert_eq!(
            result,
            Err(ConfigError::Load("invalid configuration name: a/b".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unreachable_is_load_error() {
        let port = portpicker::pick_unused_port().unwrap_or(1);
        let loader = HttpLoader::new(format!("http://127.0.0.1:{port}"));
        let result = loader.resolve("index").await;
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
