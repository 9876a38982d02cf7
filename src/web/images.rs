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


use axum::extract::Multipart;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::html;

use crate::api::ApiError;
use crate::api::ApiResult;
use crate::api::Download;
use crate::api::encode;
use crate::forms::validate_image;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;

pub async fn list(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let content = match client.images().await {
        Ok(images) => html! {
            form.upload action="/images" method="post" enctype="multipart/form-data" {
                label { (tr(Text::Name)) input type="text" name="name"; }
                input type="file" name="file" accept="image/*";
                input type="submit" value=(tr(Text::Upload));
            }
            @if images.is_empty() {
                p.empty { (tr(Text::NoImages)) }
            } @else {
                div.image-grid {
                    @for image in &images {
                        figure.image {
                            @let location = encode(&image.location);
                            a href=(format!("/media/resize/{location}")) target="_blank" {
                                img src=(format!("/media/thumbnails/{location}")) alt=(image.name) loading="lazy";
                            }
                            figcaption {
                                span { (image.file_name()) }
                                @if let Some(id) = image.id {
                                    (action_button(&format!("/images/{id}/delete"), tr(Text::Delete), Some(tr(Text::ConfirmDelete))))
                                }
                            }
                        }
                    }
                }
            }
        },
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, tr(Text::Images), content).await)
}

/// Accepts the `name` and `file` fields of the upload form, stores the file,
/// then registers the image.
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Malformed upload: {e}");
                state.notify(Notice::error(state.t(Text::PleaseChooseFile)));
                return Ok(Redirect::to("/images"));
            }
        };
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = field.text().await.ok(),
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, bytes.to_vec())),
                    Err(e) => log::warn!("Could not read the uploaded file: {e}"),
                }
            }
            _ => {}
        }
    }
    let (file_name, bytes) = file.unwrap_or_default();
    match validate_image(name.as_deref(), &file_name, bytes.len()) {
        Ok(upload) => match client.upload_image(&upload.name, &upload.file_name, bytes).await {
            Ok(image) => {
                log::debug!("Uploaded image {} to {}", image.file_name(), image.location);
                state.notify(Notice::success(state.t(Text::Saved)));
            }
            Err(e) => state.notify(Notice::error(e.message(state.language))),
        },
        Err(e) => state.notify(Notice::warning(e.message(state.language))),
    }
    Ok(Redirect::to("/images"))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.delete_image(id).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::Deleted))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/images"))
}

pub fn proxy_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::NotAuthorized | ApiError::MissingToken => StatusCode::UNAUTHORIZED,
        ApiError::NotFound => StatusCode::NOT_FOUND,
        ApiError::InvalidParameters => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Passes a backend download through to the browser.
fn media_response(endpoint: &str, result: ApiResult<Download>) -> Response {
    match result {
        Ok(download) => {
            let content_type = download
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, content_type),
                    (CACHE_CONTROL, "private, max-age=3600".to_string()),
                ],
                download.bytes,
            )
                .into_response()
        }
        Err(e) => {
            log::warn!("Could not fetch {endpoint}: {e}");
            proxy_status(&e).into_response()
        }
    }
}

pub async fn thumbnail(
    State(state): State<ServerState>,
    Path(location): Path<String>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    Ok(media_response(&location, client.thumbnail(&location).await))
}

pub async fn resized(
    State(state): State<ServerState>,
    Path(location): Path<String>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    Ok(media_response(&location, client.resized(&location).await))
}

pub async fn content(
    State(state): State<ServerState>,
    Path(file_name): Path<String>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    Ok(media_response(&file_name, client.content(&file_name).await))
}
