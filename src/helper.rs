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

use std::fs::create_dir_all;
use std::fs::write;
use std::path::PathBuf;

use tempfile::tempdir;

use crate::error::Fallible;

/// Creates a fresh directory that outlives the test that made it.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir: PathBuf = tempdir()?.keep().canonicalize()?;
    create_dir_all(&dir)?;
    Ok(dir)
}

/// Creates a card directory holding a four-page `birthday` card, and a
/// `broken` card whose configuration has no images.
pub fn create_card_directory() -> Fallible<PathBuf> {
    let dir = create_tmp_directory()?;
    create_dir_all(dir.join("images"))?;
    for name in ["front", "inside-top", "inside-bottom", "back"] {
        write(dir.join("images").join(format!("{name}.png")), name)?;
    }
    write(dir.join("song.mp3"), b"mp3")?;
    write(
        dir.join("birthday.config.toml"),
        r#"title = "Happy Birthday"
orientation = "portrait"
audio = "song.mp3"
images = [
    "images/front.png",
    "images/inside-top.png",
    "images/inside-bottom.png",
    "images/back.png",
]
"#,
    )?;
    write(dir.join("broken.config.json"), r#"{"images": []}"#)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_card_directory() -> Fallible<()> {
        let dir = create_card_directory()?;
        assert!(dir.join("birthday.config.toml").exists());
        assert!(dir.join("images/front.png").exists());
        Ok(())
    }
}
