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


use std::fs::read;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use clap::Subcommand;
use log::LevelFilter;
use walkdir::WalkDir;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::forms::LoginForm;
use crate::forms::validate_image;
use crate::i18n::Language;
use crate::materials::MaterialList;
use crate::materials::PageOutcome;
use crate::materials::ScrollPosition;
use crate::materials::reset_and_load;
use crate::materials::scroll;
use crate::session::Session;
use crate::storage::LocalStorage;
use crate::types::image::is_image_file;
use crate::types::material::format_file_size;
use crate::web::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long, global = true)]
    pub log_level: Option<LevelFilter>,
    /// Path to the configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web front end.
    Serve {
        /// Base URL of the backend.
        #[arg(long)]
        backend: Option<String>,
        /// Local port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
        /// UI language.
        #[arg(long)]
        language: Option<Language>,
    },
    /// Sign in. The password is read from standard input.
    Login {
        #[arg(long)]
        username: String,
    },
    /// Sign out and clear local storage.
    Logout,
    /// Show the signed-in user, their permissions and products.
    Whoami,
    /// List learning materials.
    Materials {
        /// Search term.
        #[arg(long)]
        search: Option<String>,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List learning cards with their answers.
    Cards,
    /// Upload every image in a directory.
    UploadImages {
        /// Directory to scan.
        directory: PathBuf,
    },
}

pub async fn entrypoint(cli: Cli) -> Fallible<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Serve {
            backend,
            port,
            no_open,
            language,
        } => {
            if let Some(backend) = backend {
                config.backend_url = backend;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(language) = language {
                config.language = language;
            }
            if no_open {
                config.open_browser = false;
            }
            config.validate()?;
            let storage = LocalStorage::open(&config.storage)?;
            start_server(config, storage).await
        }
        Command::Login { username } => {
            let storage = LocalStorage::open(&config.storage)?;
            let mut password = String::new();
            std::io::stdin().read_line(&mut password)?;
            let form = LoginForm {
                username,
                password: password.trim_end_matches(['\r', '\n']).to_string(),
            };
            let credentials = match form.validate() {
                Ok(credentials) => credentials,
                Err(e) => return fail(e.message(config.language)),
            };
            let client = ApiClient::new(config.backend_base());
            let auth = client.login(&credentials).await?;
            let token = auth.token.unwrap_or_default();
            Session::store(&storage, &token, &credentials.username)?;
            println!("Signed in as {}.", credentials.username);
            Ok(())
        }
        Command::Logout => {
            let storage = LocalStorage::open(&config.storage)?;
            Session::clear(&storage)?;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            let client = session_client(&config)?;
            let user = client.me().await?;
            println!("{}", user.username);
            if let Some(email) = &user.email {
                println!("Email: {email}");
            }
            println!("Permissions: {}", user.permissions.join(", "));
            let products = client.my_products().await?;
            let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
            println!("Products: {}", names.join(", "));
            Ok(())
        }
        Command::Materials { search, pages } => {
            let client = session_client(&config)?;
            let list = Mutex::new(MaterialList::new(config.page_size));
            let search = search.as_deref().map(str::trim).filter(|s| !s.is_empty());
            let mut outcome = reset_and_load(&list, &client, search).await?;
            // A position at the very bottom always asks for the next page.
            let bottom = ScrollPosition {
                scroll_y: 0.0,
                viewport_height: 0.0,
                document_height: 0.0,
            };
            for _ in 1..pages {
                if !matches!(outcome, PageOutcome::Loaded(_)) {
                    break;
                }
                match scroll(&list, &client, bottom).await? {
                    Some(next) => outcome = next,
                    None => break,
                }
            }
            print_materials(&list)
        }
        Command::Cards => {
            let client = session_client(&config)?;
            for card in client.cards().await? {
                println!("{} {}", card.title, card.difficulty_stars());
                println!("  {}", card.question);
                for answer in card.answers().answers() {
                    let mark = if answer.is_correct { "x" } else { " " };
                    println!("  [{mark}] {}", answer.text);
                }
            }
            Ok(())
        }
        Command::UploadImages { directory } => {
            if !directory.exists() {
                return fail("directory does not exist.");
            }
            let client = session_client(&config)?;
            let mut uploaded = 0;
            for entry in WalkDir::new(&directory) {
                let entry = entry?;
                let path = entry.path();
                let file_name = match path.file_name().and_then(|n| n.to_str()) {
                    Some(name) => name,
                    None => continue,
                };
                if !path.is_file() || !is_image_file(file_name) {
                    continue;
                }
                let bytes = read(path)?;
                let upload = match validate_image(None, file_name, bytes.len()) {
                    Ok(upload) => upload,
                    Err(e) => {
                        log::warn!("Skipping {}: {e}", path.display());
                        continue;
                    }
                };
                let image = client
                    .upload_image(&upload.name, &upload.file_name, bytes)
                    .await?;
                println!("{} -> {}", path.display(), image.location);
                uploaded += 1;
            }
            println!("Uploaded {uploaded} images.");
            Ok(())
        }
    }
}

/// A client for the stored session.
fn session_client(config: &Config) -> Fallible<ApiClient> {
    let storage = LocalStorage::open(&config.storage)?;
    match Session::current(&storage)? {
        Some(session) => Ok(ApiClient::new(config.backend_base()).with_token(session.token)),
        None => fail("not signed in. Run `cardfront login` first."),
    }
}

fn print_materials(list: &Mutex<MaterialList>) -> Fallible<()> {
    let list = match list.lock() {
        Ok(list) => list,
        Err(_) => return fail("material list lock poisoned."),
    };
    if let Some(e) = list.error() {
        return Err(e.clone().into());
    }
    for item in list.items() {
        println!("{} / {}", item.paket_name, item.name);
        for file in &item.material {
            println!("  {} ({})", file.name, format_file_size(file.size_byte));
        }
    }
    match list.total() {
        Some(total) => println!("{} of {total} loaded.", list.loaded_count()),
        None => println!("{} loaded.", list.loaded_count()),
    }
    Ok(())
}
