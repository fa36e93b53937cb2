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

/// The configuration used when neither the query nor the page name picks one.
pub const FALLBACK_NAME: &str = "index";

/// Picks the configuration for a request: the `cfg` override if present,
/// otherwise the page's file name without its extension.
pub fn config_name(page: Option<&str>, cfg: Option<&str>) -> String {
    if let Some(cfg) = cfg.map(str::trim).filter(|cfg| !cfg.is_empty()) {
        return cfg.to_string();
    }
    let file_name = page
        .and_then(|page| page.rsplit('/').next())
        .unwrap_or_default();
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    if stem.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        stem.to_string()
    }
}
