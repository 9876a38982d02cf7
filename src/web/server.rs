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


use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use maud::html;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::Fallible;
use crate::i18n::Text;
use crate::storage::LocalStorage;
use crate::web::assessments;
use crate::web::attempts;
use crate::web::auth;
use crate::web::cards;
use crate::web::exams;
use crate::web::home;
use crate::web::images;
use crate::web::materials;
use crate::web::state::ServerState;
use crate::web::template::page_template;
use crate::web::topics;

/// Largest accepted image upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn router(state: ServerState) -> Router {
    let app = Router::new();
    let app = app.route("/", get(home::root));
    let app = app.route("/login", post(auth::login));
    let app = app.route("/register", post(auth::register));
    let app = app.route("/logout", post(auth::logout));
    // Cards.
    let app = app.route("/cards", get(cards::learn).post(cards::create));
    let app = app.route("/cards/manage", get(cards::manage));
    let app = app.route("/cards/new", get(cards::new_card));
    let app = app.route("/cards/{id}", post(cards::update));
    let app = app.route("/cards/{id}/edit", get(cards::edit));
    let app = app.route("/cards/{id}/delete", post(cards::delete));
    let app = app.route("/cards/{id}/stroke", post(cards::record_stroke));
    let app = app.route("/cards/{id}/check", post(cards::check));
    // Topics.
    let app = app.route("/topics", get(topics::list).post(topics::create));
    let app = app.route("/topics/{id}", post(topics::update));
    let app = app.route("/topics/{id}/delete", post(topics::delete));
    // Exams.
    let app = app.route("/exams", get(exams::list).post(exams::create));
    let app = app.route("/exams/{id}", post(exams::update));
    let app = app.route("/exams/{id}/edit", get(exams::edit));
    let app = app.route("/exams/{id}/delete", post(exams::delete));
    let app = app.route("/exams/{id}/cards", get(exams::cards));
    let app = app.route("/exams/{id}/cards/{card_id}", post(exams::add_card));
    let app = app.route("/exams/{id}/cards/{card_id}/delete", post(exams::remove_card));
    // Assessments.
    let app = app.route("/assessments", get(assessments::list).post(assessments::create));
    let app = app.route("/assessments/new", get(assessments::new_assessment));
    let app = app.route("/assessments/{id}", post(assessments::update));
    let app = app.route("/assessments/{id}/edit", get(assessments::edit));
    let app = app.route("/assessments/{id}/delete", post(assessments::delete));
    let app = app.route("/assessments/{id}/users", get(assessments::users));
    let app = app.route("/assessments/{id}/users/{user_id}", post(assessments::add_user));
    let app = app.route(
        "/assessments/{id}/users/{user_id}/delete",
        post(assessments::remove_user),
    );
    // Images.
    let app = app.route("/my-exams", get(attempts::list));
    let app = app.route("/my-exams/{id}", get(attempts::take));
    let app = app.route("/my-exams/{id}/start", post(attempts::start));
    let app = app.route("/my-exams/{id}/pause", post(attempts::pause));
    let app = app.route("/my-exams/{id}/submit", post(attempts::submit));
    let app = app.route("/my-exams/{id}/result", get(attempts::result));

    let app = app.route("/images", get(images::list).post(images::upload));
    let app = app.route("/images/{id}/delete", post(images::delete));
    let app = app.route("/media/thumbnails/{location}", get(images::thumbnail));
    let app = app.route("/media/resize/{location}", get(images::resized));
    let app = app.route("/media/content/{file_name}", get(images::content));
    // Materials.
    let app = app.route("/materials", get(materials::page));
    let app = app.route("/materials/more", get(materials::more));
    let app = app.route("/materials/list", get(materials::list_fragment));
    let app = app.route("/materials/content/{location}", get(materials::content));
    // Static files.
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));
    app.with_state(state)
}

pub async fn start_server(config: Config, storage: LocalStorage) -> Fallible<()> {
    let state = ServerState::new(
        config.language,
        config.backend_base(),
        config.page_size,
        storage,
    );
    let app = router(state);
    let bind = SocketAddr::from((Ipv4Addr::LOCALHOST, config.port));

    if config.open_browser {
        // Open the browser once the port accepts connections.
        let url = format!("http://{bind}/");
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(bind).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            if let Err(e) = open::that(&url) {
                log::warn!("Could not open {url}: {e}");
            }
        });
    }

    log::debug!("Starting server on {bind}, backend {}", config.backend_base());
    let listener = TcpListener::bind(bind).await?;
    println!("Serving on http://{bind}/");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let body = html! {
        main.not-found {
            h1 { (state.t(Text::PageNotFound)) }
            a href="/" { (state.t(Text::Home)) }
        }
    };
    let html = page_template(state.language, None, body);
    (StatusCode::NOT_FOUND, Html(html.into_string()))
}
