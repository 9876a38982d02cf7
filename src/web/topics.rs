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


use axum::Form;
use axum::extract::Path;
use axum::extract::State;
use axum::response::Html;
use axum::response::Redirect;
use maud::html;

use crate::forms::TopicForm;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;

pub async fn list(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let content = match client.topics().await {
        Ok(topics) => html! {
            form.inline action="/topics" method="post" {
                input type="text" name="name" placeholder=(tr(Text::Name));
                input type="submit" value=(tr(Text::NewTopic));
            }
            @if topics.is_empty() {
                p.empty { (tr(Text::NoTopics)) }
            } @else {
                table.list {
                    thead {
                        tr {
                            th { (tr(Text::Name)) }
                            th { (tr(Text::Actions)) }
                        }
                    }
                    tbody {
                        @for topic in &topics {
                            @if let Some(id) = topic.id {
                                tr {
                                    td {
                                        form.inline action=(format!("/topics/{id}")) method="post" {
                                            input type="text" name="name" value=(topic.name);
                                            input type="submit" value=(tr(Text::Save));
                                        }
                                    }
                                    td.actions {
                                        (action_button(&format!("/topics/{id}/delete"), tr(Text::Delete), Some(tr(Text::ConfirmDelete))))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, tr(Text::Topics), content).await)
}

pub async fn create(
    State(state): State<ServerState>,
    Form(form): Form<TopicForm>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match form.validate(None) {
        Ok(topic) => match client.create_topic(&topic).await {
            Ok(()) => state.notify(Notice::success(state.t(Text::Saved))),
            Err(e) => state.notify(Notice::error(e.message(state.language))),
        },
        Err(e) => state.notify(Notice::warning(e.message(state.language))),
    }
    Ok(Redirect::to("/topics"))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(form): Form<TopicForm>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match form.validate(Some(id)) {
        Ok(topic) => match client.update_topic(id, &topic).await {
            Ok(()) => state.notify(Notice::success(state.t(Text::Saved))),
            Err(e) => state.notify(Notice::error(e.message(state.language))),
        },
        Err(e) => state.notify(Notice::warning(e.message(state.language))),
    }
    Ok(Redirect::to("/topics"))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.delete_topic(id).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::Deleted))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/topics"))
}
