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


mod api;
mod cli;
mod config;
mod error;
mod forms;
#[cfg(test)]
mod helper;
mod i18n;
mod materials;
mod notice;
mod permissions;
mod session;
mod storage;
mod types;
mod web;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use crate::cli::Cli;
use crate::cli::entrypoint;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = cli.log_level {
        logger.filter_level(level);
    }
    logger.init();
    match entrypoint(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cardfront: {e}");
            ExitCode::FAILURE
        }
    }
}
