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

use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::Fallible;
use crate::error::fail;
use crate::loader::ConfigLoader;
use crate::loader::DirectoryLoader;
use crate::media::MediaLoader;
use crate::media::is_remote;
use crate::types::config::CardConfiguration;

const SUFFIXES: [&str; 2] = [".config.toml", ".config.json"];

/// Resolves every configuration in a card directory.
pub async fn check_cards(directory: PathBuf) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let names = config_names(&directory)?;
    if names.is_empty() {
        return fail("no configurations found.");
    }
    let loader = DirectoryLoader::new(directory.clone());
    let media = MediaLoader::new(directory);
    let mut invalid = 0;
    for name in &names {
        match loader.resolve(name).await {
            Ok(config) => {
                println!("{name}: {} pages", config.page_count());
                for source in missing_media(&media, &config) {
                    println!("{name}: warning: {source} not found");
                }
            }
            Err(e) => {
                println!("{name}: {e}");
                invalid += 1;
            }
        }
    }
    if invalid > 0 {
        return fail(format!("{invalid} invalid configuration(s)."));
    }
    println!("ok");
    Ok(())
}

/// The names of the configurations in a directory, sorted and deduplicated.
/// Only the top level is searched, since that's where the server looks.
fn config_names(directory: &Path) -> Fallible<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        for suffix in SUFFIXES {
            if let Some(name) = file_name.strip_suffix(suffix) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Local images and audio that aren't in the card directory.
fn missing_media(media: &MediaLoader, config: &CardConfiguration) -> Vec<String> {
    config
        .images
        .iter()
        .chain(config.audio.iter())
        .filter(|source| !is_remote(source))
        .filter(|source| media.validate(source.trim_start_matches("./")).is_err())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs::remove_file;
    use std::fs::write;

    use super::*;
    use crate::helper::create_card_directory;
    use crate::helper::create_tmp_directory;
    use crate::types::orientation::Orientation;

    #[tokio::test]
    async fn test_non_existent_directory() {
        assert!(check_cards(PathBuf::from("./derpherp")).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let err = check_cards(dir).await.err().unwrap();
        assert_eq!(err.to_string(), "error: no configurations found.");
        Ok(())
    }

    #[tokio::test]
    async fn test_broken_configuration_fails() -> Fallible<()> {
        let dir = create_card_directory()?;
        let err = check_cards(dir).await.err().unwrap();
        assert_eq!(err.to_string(), "error: 1 invalid configuration(s).");
        Ok(())
    }

    #[tokio::test]
    async fn test_valid_directory() -> Fallible<()> {
        let dir = create_card_directory()?;
        remove_file(dir.join("broken.config.json"))?;
        write(
            dir.join("birthday.config.json"),
            r#"{"images": ["images/front.png"]}"#,
        )?;
        assert_eq!(config_names(&dir)?, vec!["birthday".to_string()]);
        assert!(check_cards(dir).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_example_directory() {
        assert!(check_cards(PathBuf::from("./test")).await.is_ok());
    }

    #[test]
    fn test_missing_media() -> Fallible<()> {
        let dir = create_card_directory()?;
        let media = MediaLoader::new(dir);
        let config = CardConfiguration {
            orientation: Orientation::Portrait,
            images: vec![
                "./images/front.png".to_string(),
                "images/gone.png".to_string(),
                "https://example.com/back.png".to_string(),
            ],
            audio: Some("song.mp3".to_string()),
            title: "Card".to_string(),
            volume: 0.35,
        };
        assert_eq!(
            missing_media(&media, &config),
            vec!["images/gone.png".to_string()]
        );
        Ok(())
    }
}
