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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_cards;
use crate::cmd::serve::server::ServeOptions;
use crate::cmd::serve::server::start_server;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Serve a card directory in the browser.
    Serve {
        /// Optional path to the card directory.
        directory: Option<String>,
        /// The address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to listen on.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Fetch configurations from this base URL instead of the directory.
        #[arg(long)]
        config_url: Option<String>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Check that every configuration in a card directory is valid.
    Check {
        /// Optional path to the card directory.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            directory,
            host,
            port,
            config_url,
            no_open,
        } => {
            let directory = card_directory(directory)?;
            log::debug!("Serving {}.", directory.display());
            start_server(ServeOptions {
                directory,
                config_url,
                host,
                port,
                open_browser: !no_open,
            })
            .await
        }
        Command::Check { directory } => {
            let directory = card_directory(directory)?;
            check_cards(directory).await
        }
    }
}

fn card_directory(directory: Option<String>) -> Fallible<PathBuf> {
    match directory {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(std::env::current_dir()?),
    }
}
