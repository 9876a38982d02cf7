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
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::Markup;
use maud::html;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::forms::ExamForm;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::types::exam::Exam;
use crate::types::exam::ExamSummary;
use crate::types::exam::format_duration;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;

fn exam_editor(state: &ServerState, action: &str, form: &ExamForm, error: Option<&str>) -> Markup {
    let tr = |text| state.t(text);
    html! {
        @if let Some(error) = error {
            div.error-message { (error) }
        }
        form.editor action=(action) method="post" {
            label { (tr(Text::Name)) input type="text" name="name" value=(form.name); }
            div.duration {
                label { (tr(Text::Minutes)) input type="number" min="0" name="minutes" value=(form.minutes); }
                label { (tr(Text::Seconds)) input type="number" min="0" max="59" name="seconds" value=(form.seconds); }
            }
            input type="submit" value=(tr(Text::Save));
        }
    }
}

fn form_from_exam(exam: &Exam) -> ExamForm {
    ExamForm {
        name: exam.name.clone(),
        minutes: exam.minutes().to_string(),
        seconds: exam.seconds().to_string(),
    }
}

/// Exams with their card counts. A failed count shows as unknown.
async fn summaries(client: &ApiClient) -> Result<Vec<ExamSummary>, ApiError> {
    let exams = client.exams().await?;
    let mut summaries = Vec::with_capacity(exams.len());
    for exam in exams {
        let card_count = match exam.id {
            Some(id) => match client.exam_cards(id).await {
                Ok(cards) => Some(cards.len()),
                Err(e) => {
                    log::warn!("Could not count the cards of exam {id}: {e}");
                    None
                }
            },
            None => None,
        };
        summaries.push(ExamSummary { exam, card_count });
    }
    Ok(summaries)
}

async fn render_list(state: &ServerState, form: &ExamForm, error: Option<&str>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let list = match summaries(&client).await {
        Ok(summaries) => html! {
            @if summaries.is_empty() {
                p.empty { (tr(Text::NoExams)) }
            } @else {
                table.list {
                    thead {
                        tr {
                            th { (tr(Text::Name)) }
                            th { (tr(Text::Duration)) }
                            th { (tr(Text::CardCount)) }
                            th { (tr(Text::Actions)) }
                        }
                    }
                    tbody {
                        @for summary in &summaries {
                            tr {
                                td { (summary.exam.name) }
                                td { (format_duration(summary.exam.duration_in_seconds)) }
                                td {
                                    @match summary.card_count {
                                        Some(n) => { (n) }
                                        None => { "?" }
                                    }
                                }
                                td.actions {
                                    @if let Some(id) = summary.exam.id {
                                        a href=(format!("/exams/{id}/edit")) { (tr(Text::Edit)) }
                                        a href=(format!("/exams/{id}/cards")) { (tr(Text::AssignedCards)) }
                                        (action_button(&format!("/exams/{id}/delete"), tr(Text::Delete), Some(tr(Text::ConfirmDelete))))
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
    let content = html! {
        section.new-exam {
            h2 { (tr(Text::NewExam)) }
            (exam_editor(state, "/exams", form, error))
        }
        section { (list) }
    };
    Ok(app_page(state, &session, &client, tr(Text::Exams), content).await)
}

pub async fn list(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    render_list(&state, &ExamForm::default(), None).await
}

pub async fn create(
    State(state): State<ServerState>,
    Form(form): Form<ExamForm>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    let result = match form.validate(None) {
        Ok(exam) => client
            .create_exam(&exam)
            .await
            .map_err(|e| e.message(state.language)),
        Err(e) => Err(e.message(state.language).to_string()),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/exams").into_response())
        }
        Err(message) => Ok(render_list(&state, &form, Some(message.as_str()))
            .await?
            .into_response()),
    }
}

async fn find_exam(client: &ApiClient, id: i64) -> Result<Exam, ApiError> {
    let exams = client.exams().await?;
    exams
        .into_iter()
        .find(|exam| exam.id == Some(id))
        .ok_or(ApiError::NotFound)
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let content = match find_exam(&client, id).await {
        Ok(exam) => exam_editor(&state, &format!("/exams/{id}"), &form_from_exam(&exam), None),
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, state.t(Text::Edit), content).await)
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(form): Form<ExamForm>,
) -> Result<Response, Redirect> {
    let (session, client) = state.signed_in()?;
    let result = match find_exam(&client, id).await {
        Ok(existing) => match form.validate(Some(&existing)) {
            Ok(exam) => client
                .update_exam(id, &exam)
                .await
                .map_err(|e| e.message(state.language)),
            Err(e) => Err(e.message(state.language).to_string()),
        },
        Err(e) => Err(e.message(state.language)),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/exams").into_response())
        }
        Err(message) => {
            let content = exam_editor(&state, &format!("/exams/{id}"), &form, Some(message.as_str()));
            let page = app_page(&state, &session, &client, state.t(Text::Edit), content).await;
            Ok(page.into_response())
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.delete_exam(id).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::Deleted))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/exams"))
}

/// Cards assigned to an exam, and the remaining cards that can be added.
pub async fn cards(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let loaded = async {
        let exam = find_exam(&client, id).await?;
        let assigned = client.exam_cards(id).await?;
        let all = client.cards().await?;
        Ok::<_, ApiError>((exam, assigned, all))
    };
    let (heading, content) = match loaded.await {
        Ok((exam, assigned, all)) => {
            let available: Vec<_> = all
                .iter()
                .filter(|card| !assigned.iter().any(|a| a.id == card.id))
                .collect();
            let content = html! {
                p { (format_duration(exam.duration_in_seconds)) }
                section {
                    h2 { (tr(Text::AssignedCards)) " (" (assigned.len()) ")" }
                    ul.assignments {
                        @for card in &assigned {
                            @if let Some(card_id) = card.id {
                                li {
                                    span { (card.title) }
                                    (action_button(&format!("/exams/{id}/cards/{card_id}/delete"), tr(Text::Remove), None))
                                }
                            }
                        }
                    }
                }
                section {
                    h2 { (tr(Text::AvailableCards)) }
                    ul.assignments {
                        @for card in &available {
                            @if let Some(card_id) = card.id {
                                li {
                                    span { (card.title) }
                                    (action_button(&format!("/exams/{id}/cards/{card_id}"), tr(Text::Add), None))
                                }
                            }
                        }
                    }
                }
            };
            (exam.name, content)
        }
        Err(e) => (tr(Text::Exams).to_string(), error_box(state.language, &e)),
    };
    Ok(app_page(&state, &session, &client, &heading, content).await)
}

pub async fn add_card(
    State(state): State<ServerState>,
    Path((id, card_id)): Path<(i64, i64)>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    if let Err(e) = client.add_exam_card(id, card_id).await {
        state.notify(Notice::error(e.message(state.language)));
    }
    Ok(Redirect::to(&format!("/exams/{id}/cards")))
}

pub async fn remove_card(
    State(state): State<ServerState>,
    Path((id, card_id)): Path<(i64, i64)>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    if let Err(e) = client.remove_exam_card(id, card_id).await {
        state.notify(Notice::error(e.message(state.language)));
    }
    Ok(Redirect::to(&format!("/exams/{id}/cards")))
}
