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

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs::read_to_string;

use crate::loader::ConfigError;
use crate::loader::ConfigLoader;
use crate::loader::parse_json;
use crate::loader::parse_toml;
use crate::loader::validate_name;
use crate::types::config::CardConfiguration;

/// Resolves configurations from `<name>.config.toml` or `<name>.config.json`
/// files in a card directory. TOML wins if both exist.
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ConfigLoader for DirectoryLoader {
    async fn resolve(&self, name: &str) -> Result<CardConfiguration, ConfigError> {
        validate_name(name)?;
        let toml_path = self.root.join(format!("{name}.config.toml"));
        match read_to_string(&toml_path).await {
            Ok(source) => {
                log::debug!("Read {}", toml_path.display());
                return parse_toml(&source);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::Load(format!(
                    "Failed to load {name}.config.toml: {e}"
                )));
            }
        }
        let json_path = self.root.join(format!("{name}.config.json"));
        match read_to_string(&json_path).await {
            Ok(source) => {
                log::debug!("Read {}", json_path.display());
                parse_json(&source)
            }
            Err(e) => Err(ConfigError::Load(format!(
                "Failed to load {name}.config.json: {e}"
            ))),
        }
    }
}
