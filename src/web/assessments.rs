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

use crate::api::ApiError;
use crate::forms::AssessmentForm;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::types::assessment::Assessment;
use crate::types::exam::Exam;
use crate::types::timestamp::LocalDateTime;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;
use crate::web::template::show_time;

fn exam_name(exams: &[Exam], id: i64) -> Option<&str> {
    exams
        .iter()
        .find(|exam| exam.id == Some(id))
        .map(|exam| exam.name.as_str())
}

pub async fn list(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let content = match client.assessments().await {
        Ok(assessments) => {
            let exams = client.exams().await.unwrap_or_else(|e| {
                log::warn!("Could not load exams: {e}");
                Vec::new()
            });
            html! {
                p { a.button href="/assessments/new" { (tr(Text::NewAssessment)) } }
                @if assessments.is_empty() {
                    p.empty { (tr(Text::NoAssessments)) }
                } @else {
                    table.list {
                        thead {
                            tr {
                                th { (tr(Text::Name)) }
                                th { (tr(Text::Exam)) }
                                th { (tr(Text::StartTime)) }
                                th { (tr(Text::EndTime)) }
                                th { (tr(Text::Actions)) }
                            }
                        }
                        tbody {
                            @for assessment in &assessments {
                                tr {
                                    td { (assessment.name) }
                                    td { (exam_name(&exams, assessment.exam_id).unwrap_or(tr(Text::Unknown))) }
                                    td { (show_time(state.language, assessment.start_time)) }
                                    td { (show_time(state.language, assessment.end_time)) }
                                    td.actions {
                                        @if let Some(id) = assessment.id {
                                            a href=(format!("/assessments/{id}/edit")) { (tr(Text::Edit)) }
                                            a href=(format!("/assessments/{id}/users")) { (tr(Text::Participants)) }
                                            (action_button(&format!("/assessments/{id}/delete"), tr(Text::Delete), Some(tr(Text::ConfirmDelete))))
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, tr(Text::Assessments), content).await)
}

fn assessment_editor(
    state: &ServerState,
    action: &str,
    form: &AssessmentForm,
    exams: &[Exam],
    error: Option<&str>,
) -> Markup {
    let tr = |text| state.t(text);
    html! {
        @if let Some(error) = error {
            div.error-message { (error) }
        }
        form.editor action=(action) method="post" {
            label { (tr(Text::Name)) input type="text" name="name" value=(form.name); }
            label {
                (tr(Text::Exam))
                select name="exam_id" {
                    option value="" { "" }
                    @for exam in exams {
                        @if let Some(id) = exam.id {
                            option value=(id) selected[id.to_string() == form.exam_id] { (exam.name) }
                        }
                    }
                }
            }
            label { (tr(Text::StartTime)) input type="datetime-local" name="start_time" value=(form.start_time); }
            label { (tr(Text::EndTime)) input type="datetime-local" name="end_time" value=(form.end_time); }
            div.buttons {
                input type="submit" value=(tr(Text::Save));
                a href="/assessments" { (tr(Text::Cancel)) }
            }
        }
    }
}

fn form_from_assessment(assessment: &Assessment) -> AssessmentForm {
    AssessmentForm {
        name: assessment.name.clone(),
        exam_id: assessment.exam_id.to_string(),
        start_time: assessment.start_time.map(LocalDateTime::to_input).unwrap_or_default(),
        end_time: assessment.end_time.map(LocalDateTime::to_input).unwrap_or_default(),
    }
}

async fn render_editor(
    state: &ServerState,
    heading: &str,
    action: &str,
    form: &AssessmentForm,
    error: Option<&str>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let exams = client.exams().await.unwrap_or_else(|e| {
        log::warn!("Could not load exams: {e}");
        Vec::new()
    });
    let content = assessment_editor(state, action, form, &exams, error);
    Ok(app_page(state, &session, &client, heading, content).await)
}

pub async fn new_assessment(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let heading = state.t(Text::NewAssessment);
    render_editor(&state, heading, "/assessments", &AssessmentForm::default(), None).await
}

/// Validation happens before any backend call; an invalid time frame never
/// reaches the network.
pub async fn create(
    State(state): State<ServerState>,
    Form(form): Form<AssessmentForm>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    let heading = state.t(Text::NewAssessment);
    let result = match form.validate(None) {
        Ok(assessment) => client
            .create_assessment(&assessment)
            .await
            .map_err(|e| e.message(state.language)),
        Err(e) => Err(e.message(state.language).to_string()),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/assessments").into_response())
        }
        Err(message) => {
            let page =
                render_editor(&state, heading, "/assessments", &form, Some(message.as_str())).await?;
            Ok(page.into_response())
        }
    }
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let heading = state.t(Text::Edit);
    match client.assessment(id).await {
        Ok(assessment) => {
            let form = form_from_assessment(&assessment);
            render_editor(&state, heading, &format!("/assessments/{id}"), &form, None).await
        }
        Err(e) => {
            let content = error_box(state.language, &e);
            Ok(app_page(&state, &session, &client, heading, content).await)
        }
    }
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(form): Form<AssessmentForm>,
) -> Result<Response, Redirect> {
    let (_, client) = state.signed_in()?;
    let heading = state.t(Text::Edit);
    let action = format!("/assessments/{id}");
    // Checked once up front so invalid input never reaches the backend.
    let result = match form.validate(None) {
        Ok(_) => match client.assessment(id).await {
            Ok(existing) => match form.validate(Some(&existing)) {
                Ok(assessment) => client
                    .update_assessment(id, &assessment)
                    .await
                    .map_err(|e| e.message(state.language)),
                Err(e) => Err(e.message(state.language).to_string()),
            },
            Err(e) => Err(e.message(state.language)),
        },
        Err(e) => Err(e.message(state.language).to_string()),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/assessments").into_response())
        }
        Err(message) => {
            let page = render_editor(&state, heading, &action, &form, Some(message.as_str())).await?;
            Ok(page.into_response())
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.delete_assessment(id).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::Deleted))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/assessments"))
}

/// Participants of an assessment, and the users that can be added.
pub async fn users(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let loaded = async {
        let assessment = client.assessment(id).await?;
        let assigned = client.assessment_users(id).await?;
        let all = client.users().await?;
        Ok::<_, ApiError>((assessment, assigned, all))
    };
    let (heading, content) = match loaded.await {
        Ok((assessment, assigned, all)) => {
            let available: Vec<_> = all
                .iter()
                .filter(|user| !assigned.iter().any(|a| a.id == user.id))
                .collect();
            let content = html! {
                p {
                    (show_time(state.language, assessment.start_time))
                    " – "
                    (show_time(state.language, assessment.end_time))
                }
                section {
                    h2 { (tr(Text::AssignedUsers)) " (" (assigned.len()) ")" }
                    ul.assignments {
                        @for user in &assigned {
                            li {
                                span { (user.username) }
                                (action_button(&format!("/assessments/{id}/users/{}/delete", user.id), tr(Text::Remove), None))
                            }
                        }
                    }
                }
                section {
                    h2 { (tr(Text::AvailableUsers)) }
                    ul.assignments {
                        @for user in &available {
                            li {
                                span { (user.username) }
                                (action_button(&format!("/assessments/{id}/users/{}", user.id), tr(Text::Add), None))
                            }
                        }
                    }
                }
            };
            (assessment.name, content)
        }
        Err(e) => (tr(Text::Participants).to_string(), error_box(state.language, &e)),
    };
    Ok(app_page(&state, &session, &client, &heading, content).await)
}

pub async fn add_user(
    State(state): State<ServerState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    if let Err(e) = client.add_assessment_user(id, user_id).await {
        state.notify(Notice::error(e.message(state.language)));
    }
    Ok(Redirect::to(&format!("/assessments/{id}/users")))
}

pub async fn remove_user(
    State(state): State<ServerState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    if let Err(e) = client.remove_assessment_user(id, user_id).await {
        state.notify(Notice::error(e.message(state.language)));
    }
    Ok(Redirect::to(&format!("/assessments/{id}/users")))
}
