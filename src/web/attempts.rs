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

//! Taking an assessment: the participant's list, the question sheet with
//! its countdown, pausing, submitting and the result.

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
use crate::api::ApiResult;
use crate::forms::verdicts_from_pairs;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::types::assessment::AssessmentResult;
use crate::types::assessment::AttemptStatus;
use crate::types::assessment::PauseRequest;
use crate::types::assessment::Submission;
use crate::types::assessment::UserAssessment;
use crate::types::assessment::format_clock;
use crate::types::card::LearningCard;
use crate::types::timestamp::LocalDateTime;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;
use crate::web::template::show_time;
use crate::web::template::verdict_choices;

fn status_text(status: AttemptStatus) -> Text {
    match status {
        AttemptStatus::Assigned => Text::StatusAssigned,
        AttemptStatus::Started => Text::StatusStarted,
        AttemptStatus::Paused => Text::StatusPaused,
        AttemptStatus::Completed => Text::StatusCompleted,
        AttemptStatus::Cancelled => Text::StatusCancelled,
        AttemptStatus::Unknown => Text::Unknown,
    }
}

/// Form field prefix of the answers to one card.
fn field_prefix(card_id: i64) -> String {
    format!("q{card_id}_")
}

async fn find_offered(client: &ApiClient, id: i64) -> ApiResult<UserAssessment> {
    client
        .available_assessments()
        .await?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or(ApiError::NotFound)
}

fn offered_card(state: &ServerState, assessment: &UserAssessment, now: LocalDateTime) -> Markup {
    let tr = |text| state.t(text);
    let id = assessment.id;
    html! {
        div.exam-card {
            div.exam-card-header {
                div {
                    h2 { (assessment.name) }
                    div.exam-name { (assessment.exam_name) }
                    div.timeframe {
                        (show_time(state.language, assessment.start_time))
                        " – "
                        (show_time(state.language, assessment.end_time))
                    }
                }
                span.status { (tr(status_text(assessment.status))) }
            }
            div.exam-info {
                span { (assessment.card_count) " " (tr(Text::Questions)) }
                span { (format_clock(assessment.duration)) }
            }
            div.exam-actions {
                @if assessment.can_start(now) {
                    (action_button(&format!("/my-exams/{id}/start"), tr(Text::StartExam), Some(tr(Text::ConfirmStartExam))))
                }
                @if assessment.can_continue(now) {
                    a.button href=(format!("/my-exams/{id}")) { (tr(Text::ContinueExam)) }
                }
                @if assessment.has_result() {
                    a.button href=(format!("/my-exams/{id}/result")) { (tr(Text::ShowResult)) }
                }
            }
        }
    }
}

/// The assessments the user takes part in, with the action each one allows.
pub async fn list(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let content = match client.available_assessments().await {
        Ok(assessments) if assessments.is_empty() => html! {
            div.empty {
                p { (tr(Text::NoExamsAvailable)) }
                p { (tr(Text::ContactInstructor)) }
            }
        },
        Ok(assessments) => {
            let now = LocalDateTime::now();
            html! {
                div.exam-list {
                    @for assessment in &assessments {
                        (offered_card(&state, assessment, now))
                    }
                }
            }
        }
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, tr(Text::TakeExams), content).await)
}

pub async fn start(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.start_assessment(id).await {
        Ok(()) => {
            log::info!("Started assessment {id}.");
            Ok(Redirect::to(&format!("/my-exams/{id}")))
        }
        Err(e) => {
            state.notify(Notice::error(e.message(state.language)));
            Ok(Redirect::to("/my-exams"))
        }
    }
}

fn question_sheet(state: &ServerState, id: i64, questions: &[LearningCard]) -> Markup {
    let tr = |text| state.t(text);
    html! {
        form #exam-form action=(format!("/my-exams/{id}/submit")) method="post" data-confirm=(tr(Text::ConfirmSubmitExam)) {
            @for (n, card) in questions.iter().enumerate() {
                @if let Some(card_id) = card.id {
                    @let prefix = field_prefix(card_id);
                    div.question-card {
                        h3 { (tr(Text::Question)) " " (n + 1) ": " (card.title) }
                        div.question { (card.question) }
                        p.hint { (tr(Text::RateYourKnowledge)) }
                        ol.answers {
                            @for (i, answer) in card.answers().answers().iter().enumerate() {
                                li {
                                    span.answer-text { (answer.text) }
                                    (verdict_choices(&format!("{prefix}{i}"), Default::default()))
                                }
                            }
                        }
                    }
                }
            }
            input type="submit" value=(tr(Text::SubmitExam));
        }
    }
}

/// The question sheet of a started or paused assessment. Opening it starts
/// the session clock; the countdown shows what is left of the duration.
pub async fn take(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Response, Redirect> {
    let (session, client) = state.signed_in()?;
    let loaded = async {
        let assessment = find_offered(&client, id).await?;
        if !matches!(assessment.status, AttemptStatus::Started | AttemptStatus::Paused) {
            return Ok::<_, ApiError>((assessment, Vec::new()));
        }
        let questions = client.assessment_questions(id).await?;
        Ok::<_, ApiError>((assessment, questions))
    };
    let (assessment, questions) = match loaded.await {
        Ok(loaded) => loaded,
        Err(e) => {
            let content = error_box(state.language, &e);
            let page = app_page(&state, &session, &client, state.t(Text::TakeExams), content).await;
            return Ok(page.into_response());
        }
    };
    match assessment.status {
        AttemptStatus::Started | AttemptStatus::Paused => {}
        AttemptStatus::Completed => {
            return Ok(Redirect::to(&format!("/my-exams/{id}/result")).into_response());
        }
        _ => return Ok(Redirect::to("/my-exams").into_response()),
    }
    let tr = |text| state.t(text);
    let remaining = assessment.remaining_seconds(LocalDateTime::now(), state.attempt_seconds(id));
    let content = html! {
        div.exam-bar {
            span { (tr(Text::Exam)) ": " (assessment.exam_name) " | " (questions.len()) " " (tr(Text::Questions)) }
            span.timer data-remaining=(remaining) {
                (tr(Text::TimeLeft)) ": "
                span.clock { (format_clock(remaining)) }
            }
            (action_button(&format!("/my-exams/{id}/pause"), tr(Text::PauseExam), None))
        }
        (question_sheet(&state, id, &questions))
    };
    let page = app_page(&state, &session, &client, &assessment.name, content).await;
    Ok(page.into_response())
}

/// Stops the clock and reports the session's time to the backend.
pub async fn pause(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    let pause = PauseRequest {
        time_spent_seconds: state.end_attempt(id),
    };
    match client.pause_assessment(id, &pause).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::ExamPaused))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/my-exams"))
}

/// The answers marked ✓ for every question, keyed by card id.
fn submission(questions: &[LearningCard], pairs: &[(String, String)]) -> Submission {
    questions
        .iter()
        .filter_map(|card| {
            let card_id = card.id?;
            let answers = card.answers();
            let verdicts = verdicts_from_pairs(pairs, &field_prefix(card_id), answers.len());
            Some((card_id.to_string(), answers.submission(&verdicts)))
        })
        .collect()
}

fn result_view(state: &ServerState, result: &AssessmentResult) -> Markup {
    let tr = |text| state.t(text);
    html! {
        div.exam-result {
            div.score { (format!("{:.0}%", result.score_percentage)) }
            table.list {
                tbody {
                    tr { th { (tr(Text::CorrectAnswers)) } td { (result.correct_answers) } }
                    tr { th { (tr(Text::IncorrectAnswers)) } td { (result.incorrect_answers) } }
                    tr { th { (tr(Text::TotalQuestions)) } td { (result.total_questions) } }
                    tr { th { (tr(Text::TimeRequired)) } td { (format_clock(result.time_spent_seconds)) } }
                }
            }
            p { a.button href="/my-exams" { (tr(Text::TakeExams)) } }
        }
    }
}

pub async fn submit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, Redirect> {
    let (session, client) = state.signed_in()?;
    let submitted = async {
        let questions = client.assessment_questions(id).await?;
        let answers = submission(&questions, &pairs);
        client.submit_assessment(id, &answers).await
    };
    match submitted.await {
        Ok(result) => {
            let spent = state.end_attempt(id);
            log::info!("Submitted assessment {id} after {spent}s in this session.");
            state.notify(Notice::success(state.t(Text::ExamSubmitted)));
            let content = result_view(&state, &result);
            let page = app_page(&state, &session, &client, state.t(Text::ExamResult), content).await;
            Ok(page.into_response())
        }
        Err(e) => {
            state.notify(Notice::error(e.message(state.language)));
            Ok(Redirect::to(&format!("/my-exams/{id}")).into_response())
        }
    }
}

pub async fn result(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let content = match client.assessment_result(id).await {
        Ok(result) => result_view(&state, &result),
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, state.t(Text::ExamResult), content).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Fallible;

    #[test]
    fn test_submission_uses_numbered_lines() -> Fallible<()> {
        let questions = vec![
            LearningCard {
                id: Some(1),
                answer: r#"[{"text":"Paris","isCorrect":true},{"text":"Lyon","isCorrect":false}]"#
                    .to_string(),
                ..LearningCard::default()
            },
            LearningCard {
                id: Some(2),
                answer: "1. Seven (✓)\n2. Eight".to_string(),
                ..LearningCard::default()
            },
        ];
        let pairs: Vec<(String, String)> = [("q1_0", "yes"), ("q1_1", "no"), ("q2_1", "yes")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let answers = submission(&questions, &pairs);
        assert_eq!(answers["1"], vec!["1. Paris"]);
        assert_eq!(answers["2"], vec!["2. Eight"]);
        Ok(())
    }
}
