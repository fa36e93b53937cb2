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

use chrono::DateTime;
use chrono::Local;

/// A line in the on-screen diagnostic overlay.
#[derive(Clone, Debug)]
pub struct Entry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl Entry {
    pub fn render(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Diagnostics for one card, shown when the page is opened in debug mode.
#[derive(Default)]
pub struct DiagnosticLog {
    entries: Vec<Entry>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&mut self, name: &str) {
        log::info!("Loaded config: {name}");
        self.push(format!("Loaded config: {name}"));
    }

    pub fn fallback(&mut self, reason: &str) {
        log::warn!("Fallback activated: {reason}");
        self.push(format!("Fallback activated: {reason}"));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn push(&mut self, message: String) {
        self.entries.push(Entry {
            at: Local::now(),
            message,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries() {
        let mut log = DiagnosticLog::new();
        log.loaded("birthday");
        log.fallback("load error: Failed to load x.config.toml");
        let lines: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "Loaded config: birthday",
                "Fallback activated: load error: Failed to load x.config.toml"
            ]
        );
        assert!(log.entries()[0].render().ends_with("Loaded config: birthday"));
    }
}
