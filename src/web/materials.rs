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


use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_DISPOSITION;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::Markup;
use maud::html;
use serde::Deserialize;

use crate::api::encode;
use crate::i18n::Text;
use crate::materials::ScrollPosition;
use crate::materials::reset_and_load;
use crate::materials::scroll;
use crate::types::material::FileKind;
use crate::types::material::MaterialInfo;
use crate::types::material::format_file_size;
use crate::web::images::proxy_status;
use crate::web::state::ServerState;
use crate::web::template::app_page;
use crate::web::template::error_box;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
}

#[derive(Deserialize)]
pub struct PackageQuery {
    #[serde(default)]
    package: Option<String>,
}

/// Scroll metrics sent by the script, plus the active package filter.
#[derive(Deserialize)]
pub struct ScrollQuery {
    y: f64,
    viewport: f64,
    height: f64,
    #[serde(default)]
    package: Option<String>,
}

#[derive(Deserialize)]
pub struct ContentQuery {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

fn content_link(file: &MaterialInfo) -> String {
    format!(
        "/materials/content/{}?name={}&type={}",
        encode(&file.location),
        encode(&file.name),
        encode(&file.kind)
    )
}

/// The list body swapped in by the script: package filter, items, counter,
/// and the end or error indicator. The filter is rebuilt on every render so
/// packages that arrive with later pages become selectable.
fn render_list(state: &ServerState, package: Option<&str>) -> Markup {
    let tr = |text| state.t(text);
    let list = match state.materials.lock() {
        Ok(list) => list,
        Err(_) => {
            log::error!("material list lock poisoned.");
            return html! {};
        }
    };
    let items = list.filtered(package);
    let selected = package.unwrap_or_default();
    html! {
        label.package-filter {
            select #package-filter name="package" {
                option value="" { (tr(Text::AllPackages)) }
                @for name in list.packages() {
                    option value=(name) selected[name == selected] { (name) }
                }
            }
        }
        p.counter {
            (list.loaded_count())
            @if let Some(total) = list.total() {
                " " (tr(Text::Of)) " " (total)
            }
            " " (tr(Text::ElementsLoaded))
        }
        @if items.is_empty() && !list.is_loading() && list.error().is_none() {
            p.empty { (tr(Text::NoMaterialsFound)) }
        }
        ul.materials {
            @for item in &items {
                li.material {
                    div.material-head {
                        span.package { (item.paket_name) }
                        strong { (item.name) }
                    }
                    ul.files {
                        @for file in &item.material {
                            @let kind = FileKind::detect(None, &file.name, &file.kind);
                            li {
                                a href=(content_link(file)) target=[kind.is_inline().then_some("_blank")] {
                                    (file.name)
                                }
                                " "
                                span.size { "(" (format_file_size(file.size_byte)) ")" }
                            }
                        }
                    }
                }
            }
        }
        @if let Some(e) = list.error() {
            (error_box(state.language, e))
            button #load-more type="button" { (tr(Text::LoadMore)) }
        } @else if list.is_loading() {
            p.loading { (tr(Text::LoadingMore)) }
        } @else if list.no_more_data() && list.loaded_count() > 0 {
            p.end { (tr(Text::NoMoreMaterials)) }
        }
    }
}

/// Entering the view, or submitting a search, resets the list and loads the
/// first page.
pub async fn page(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let search = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    if let Err(e) = reset_and_load(&state.materials, &client, search.as_deref()).await {
        log::error!("Could not load materials: {e}");
    }
    let content = html! {
        form.search action="/materials" method="get" {
            input type="search" name="q" value=[search.as_deref()] placeholder=(tr(Text::SearchPlaceholder));
            input type="submit" value=(tr(Text::Search));
            @if search.is_some() {
                a href="/materials" { (tr(Text::Clear)) }
            }
        }
        div #material-list {
            (render_list(&state, None))
        }
    };
    Ok(app_page(&state, &session, &client, tr(Text::Materials), content).await)
}

/// Scroll hook. Loads the next page when the reported position is near the
/// bottom; answers 204 when no request was due.
pub async fn more(
    State(state): State<ServerState>,
    Query(query): Query<ScrollQuery>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    let position = ScrollPosition {
        scroll_y: query.y,
        viewport_height: query.viewport,
        document_height: query.height,
    };
    match scroll(&state.materials, &client, position).await {
        Ok(Some(outcome)) => {
            log::debug!("Scroll load: {outcome:?}");
            let fragment = render_list(&state, query.package.as_deref());
            Ok(Html(fragment.into_string()).into_response())
        }
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            log::error!("Could not load more materials: {e}");
            Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

/// The list fragment filtered to one package, without loading anything.
pub async fn list_fragment(
    State(state): State<ServerState>,
    Query(query): Query<PackageQuery>,
) -> Result<Html<String>, Redirect> {
    state.signed_in()?;
    Ok(Html(render_list(&state, query.package.as_deref()).into_string()))
}

fn disposition(kind: FileKind, file_name: &str) -> String {
    let mode = if kind.is_inline() { "inline" } else { "attachment" };
    format!("{mode}; filename*=UTF-8''{}", encode(file_name))
}

/// Proxies a material file. PDFs and audio are shown in the browser,
/// everything else is downloaded.
pub async fn content(
    State(state): State<ServerState>,
    Path(location): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    let file_name = query.name.unwrap_or_else(|| location.clone());
    match client.material_content(&location).await {
        Ok(download) => {
            let kind = FileKind::detect(
                download.content_type.as_deref(),
                &file_name,
                query.kind.as_deref().unwrap_or_default(),
            );
            let content_type = download
                .content_type
                .unwrap_or_else(|| kind.default_content_type().to_string());
            let headers = [
                (CONTENT_TYPE, content_type),
                (CONTENT_DISPOSITION, disposition(kind, &file_name)),
            ];
            Ok((StatusCode::OK, headers, download.bytes).into_response())
        }
        Err(e) => {
            log::warn!("Could not fetch material {location}: {e}");
            Ok(proxy_status(&e).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition() {
        assert_eq!(
            disposition(FileKind::Pdf, "Skript 1.pdf"),
            "inline; filename*=UTF-8''Skript%201.pdf"
        );
        assert_eq!(
            disposition(FileKind::Archive, "all.zip"),
            "attachment; filename*=UTF-8''all.zip"
        );
    }
}
