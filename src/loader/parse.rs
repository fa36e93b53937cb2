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

use serde::Deserialize;

use crate::loader::ConfigError;
use crate::types::config::CardConfiguration;
use crate::types::config::DEFAULT_TITLE;
use crate::types::config::DEFAULT_VOLUME;
use crate::types::orientation::Orientation;

#[derive(Deserialize)]
struct RawConfig {
    orientation: Option<String>,
    images: Option<RawImages>,
    audio: Option<String>,
    title: Option<String>,
    volume: Option<f32>,
}

/// Images are either an ordered list, or named slots.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawImages {
    List(Vec<String>),
    Slots(ImageSlots),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageSlots {
    front: Option<String>,
    inside_top: Option<String>,
    inside_bottom: Option<String>,
    back: Option<String>,
}

impl RawImages {
    fn into_pages(self) -> Vec<String> {
        match self {
            RawImages::List(images) => images,
            RawImages::Slots(slots) => [
                slots.front,
                slots.inside_top,
                slots.inside_bottom,
                slots.back,
            ]
            .into_iter()
            .flatten()
            .collect(),
        }
    }
}

pub fn parse_toml(source: &str) -> Result<CardConfiguration, ConfigError> {
    let raw: RawConfig =
        toml::from_str(source).map_err(|e| ConfigError::Invalid(e.message().to_string()))?;
    build(raw)
}

pub fn parse_json(source: &str) -> Result<CardConfiguration, ConfigError> {
    let raw: RawConfig =
        serde_json::from_str(source).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    build(raw)
}

fn build(raw: RawConfig) -> Result<CardConfiguration, ConfigError> {
    let images: Vec<String> = match raw.images {
        Some(images) => images
            .into_pages()
            .into_iter()
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty())
            .collect(),
        None => return Err(ConfigError::Invalid("missing images".to_string())),
    };
    if images.is_empty() {
        return Err(ConfigError::Invalid("images is empty".to_string()));
    }
    let orientation = raw
        .orientation
        .as_deref()
        .map(Orientation::parse)
        .unwrap_or_default();
    let audio = raw.audio.filter(|audio| !audio.trim().is_empty());
    let title = raw
        .title
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let volume = raw.volume.unwrap_or(DEFAULT_VOLUME).clamp(0.0, 1.0);
    Ok(CardConfiguration {
        orientation,
        images,
        audio,
        title,
        volume,
    })
}
