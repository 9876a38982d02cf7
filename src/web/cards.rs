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
use axum::extract::Query;
use axum::extract::State;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use maud::Markup;
use maud::html;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::api::encode;
use crate::forms::CardForm;
use crate::forms::verdicts_from_pairs;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::session::Session;
use crate::types::answer::Verdict;
use crate::types::card::LearningCard;
use crate::types::card::MAX_DIFFICULTY;
use crate::types::card::MIN_DIFFICULTY;
use crate::types::card::StrokePost;
use crate::types::card::Topic;
use crate::types::card::stars;
use crate::types::image::Image;
use crate::types::timestamp::now_rfc3339;
use crate::web::state::ServerState;
use crate::web::template::action_button;
use crate::web::template::app_page;
use crate::web::template::error_box;
use crate::web::template::verdict_choices;

/// Blank answer rows shown below the filled ones.
const SPARE_ANSWER_ROWS: usize = 2;
const MIN_ANSWER_ROWS: usize = 4;

#[derive(Deserialize)]
pub struct LearnQuery {
    #[serde(default)]
    topic: Option<String>,
}

/// Distinct card topics in first-seen order.
fn card_topics(cards: &[LearningCard]) -> Vec<&str> {
    let mut topics: Vec<&str> = Vec::new();
    for category in cards.iter().filter_map(|card| card.category.as_deref()) {
        if !topics.contains(&category) {
            topics.push(category);
        }
    }
    topics
}

enum CardImage {
    Absent,
    Found(String),
    Failed,
}

struct LearnRow {
    card: LearningCard,
    rate: Option<i64>,
    image: CardImage,
}

/// A self-check the learner just submitted for one card.
struct Checked {
    card_id: i64,
    verdicts: Vec<Verdict>,
    passed: bool,
}

async fn load_row(client: &ApiClient, card: LearningCard) -> LearnRow {
    let rate = match card.id {
        Some(id) => match client.stroke_count(id).await {
            Ok(n) => Some(n),
            Err(e) => {
                log::warn!("Could not load the stroke count of card {id}: {e}");
                None
            }
        },
        None => None,
    };
    let image = match card.image_id.filter(|id| *id > 0) {
        Some(image_id) => match client.image(image_id).await {
            Ok(image) => CardImage::Found(format!("/media/resize/{}", encode(&image.location))),
            Err(e) => {
                log::warn!("Could not load image {image_id}: {e}");
                CardImage::Failed
            }
        },
        None => CardImage::Absent,
    };
    LearnRow { card, rate, image }
}

fn learn_card(state: &ServerState, row: &LearnRow, topic: Option<&str>, checked: Option<&Checked>) -> Markup {
    let tr = |text| state.t(text);
    let card = &row.card;
    let checked = checked.filter(|c| card.id == Some(c.card_id));
    html! {
        div.card {
            div.card-header {
                h2 { (card.title) }
                span.stars title=(format!("{}: {}/5", tr(Text::Difficulty), card.difficulty())) {
                    (card.difficulty_stars())
                }
            }
            div.topic {
                @if let Some(id) = card.id {
                    span.card-id { "#" (id) } " - "
                }
                (card.category.as_deref().unwrap_or(tr(Text::Unknown)))
            }
            @match &row.image {
                CardImage::Found(src) => {
                    div.card-image { img.question-image src=(src) alt=(tr(Text::QuestionImage)); }
                }
                CardImage::Failed => {
                    div.card-image { p.error { (tr(Text::ImageError)) } }
                }
                CardImage::Absent => {}
            }
            div.question { (card.question) }
            @if let Some(id) = card.id {
                form.self-check action=(format!("/cards/{id}/check")) method="post" {
                    input type="hidden" name="topic" value=(topic.unwrap_or_default());
                    ol.answers {
                        @for (i, answer) in card.answers().answers().iter().enumerate() {
                            @let chosen = checked
                                .and_then(|c| c.verdicts.get(i).copied())
                                .unwrap_or_default();
                            li {
                                span.answer-text { (answer.text) }
                                (verdict_choices(&format!("answer_{i}"), chosen))
                            }
                        }
                    }
                    input type="submit" value=(tr(Text::CheckAnswers));
                }
                @if let Some(checked) = checked {
                    @if checked.passed {
                        div.check-result.passed { (tr(Text::AnswersCorrect)) }
                    } @else {
                        div.check-result.failed { (tr(Text::AnswersIncorrect)) }
                    }
                }
                div.card-footer {
                    span.rate {
                        (tr(Text::Rate)) ": "
                        @match row.rate {
                            Some(n) => { (n) }
                            None => { "N/A" }
                        }
                    }
                    form.inline action=(format!("/cards/{id}/stroke")) method="post" {
                        input type="text" name="comment" placeholder=(tr(Text::Comment));
                        input type="submit" value=(tr(Text::RecordStroke));
                    }
                }
            }
        }
    }
}

/// The learning view: the cards of the chosen topic, each with a self-check
/// and its stroke rate. Answers are never marked correct before a check.
async fn render_learn(
    state: &ServerState,
    topic: Option<&str>,
    check: Option<(i64, &[(String, String)])>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let tr = |text| state.t(text);
    let heading = tr(Text::Learn);
    let cards = match client.cards().await {
        Ok(cards) => cards,
        Err(e) => {
            let content = error_box(state.language, &e);
            return Ok(app_page(state, &session, &client, heading, content).await);
        }
    };
    let topic = topic.filter(|topic| !topic.is_empty());
    let topics: Vec<String> = card_topics(&cards).into_iter().map(str::to_string).collect();
    let checked = check.and_then(|(card_id, pairs)| {
        let card = cards.iter().find(|card| card.id == Some(card_id))?;
        let answers = card.answers();
        let verdicts = verdicts_from_pairs(pairs, "answer_", answers.len());
        let passed = answers.check(&verdicts);
        log::debug!("Self-check of card {card_id}: {passed}");
        Some(Checked {
            card_id,
            verdicts,
            passed,
        })
    });
    let mut rows = Vec::with_capacity(cards.len());
    for card in cards {
        if topic.is_none_or(|topic| card.category.as_deref() == Some(topic)) {
            rows.push(load_row(&client, card).await);
        }
    }
    let content = html! {
        form.topic-filter action="/cards" method="get" {
            select name="topic" data-autosubmit {
                option value="" { (tr(Text::AllTopics)) }
                @for name in &topics {
                    option value=(name) selected[Some(name.as_str()) == topic] { (name) }
                }
            }
            input type="submit" value=(tr(Text::Filter));
        }
        @if rows.is_empty() {
            p.empty { (tr(Text::NoCards)) }
        }
        div.cards {
            @for row in &rows {
                (learn_card(state, row, topic, checked.as_ref()))
            }
        }
    };
    Ok(app_page(state, &session, &client, heading, content).await)
}

pub async fn learn(
    State(state): State<ServerState>,
    Query(query): Query<LearnQuery>,
) -> Result<Html<String>, Redirect> {
    render_learn(&state, query.topic.as_deref(), None).await
}

/// Compares the learner's marks with the card's answers and shows the result
/// on the card, keeping the marks and the topic filter.
pub async fn check(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Html<String>, Redirect> {
    let topic = pairs
        .iter()
        .find(|(key, _)| key == "topic")
        .map(|(_, value)| value.as_str());
    render_learn(&state, topic, Some((id, pairs.as_slice()))).await
}

#[derive(Deserialize)]
pub struct StrokeForm {
    #[serde(default)]
    comment: String,
}

pub async fn record_stroke(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Form(form): Form<StrokeForm>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    let stroke = StrokePost {
        tstamp: now_rfc3339(),
        comment: form.comment.trim().to_string(),
        memorycard_id: id,
    };
    match client.post_stroke(&stroke).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::StrokeSaved))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/cards"))
}

/// The card management table.
pub async fn manage(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let heading = state.t(Text::ManageCards);
    let content = match client.cards().await {
        Ok(cards) => card_table(&state, &cards),
        Err(e) => error_box(state.language, &e),
    };
    Ok(app_page(&state, &session, &client, heading, content).await)
}

fn card_table(state: &ServerState, cards: &[LearningCard]) -> Markup {
    let tr = |text| state.t(text);
    html! {
        p { a.button href="/cards/new" { (tr(Text::NewCard)) } }
        @if cards.is_empty() {
            p.empty { (tr(Text::NoCards)) }
        } @else {
            table.list {
                thead {
                    tr {
                        th { (tr(Text::Title)) }
                        th { (tr(Text::Topic)) }
                        th { (tr(Text::Difficulty)) }
                        th { (tr(Text::Answers)) }
                        th { (tr(Text::Actions)) }
                    }
                }
                tbody {
                    @for card in cards {
                        tr {
                            td { (card.title) }
                            td { (card.category.as_deref().unwrap_or("")) }
                            td.stars { (card.difficulty_stars()) }
                            td { (card.answers().summary()) }
                            td.actions {
                                @if let Some(id) = card.id {
                                    a href=(format!("/cards/{id}/edit")) { (tr(Text::Edit)) }
                                    (action_button(&format!("/cards/{id}/delete"), tr(Text::Delete), Some(tr(Text::ConfirmDelete))))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Topics and images offered by the card editor. Failures leave the lists
/// empty.
async fn editor_choices(client: &ApiClient) -> (Vec<Topic>, Vec<Image>) {
    let topics = client.topics().await.unwrap_or_else(|e| {
        log::warn!("Could not load topics: {e}");
        Vec::new()
    });
    let images = client.images().await.unwrap_or_else(|e| {
        log::warn!("Could not load images: {e}");
        Vec::new()
    });
    (topics, images)
}

fn form_from_card(card: &LearningCard) -> CardForm {
    CardForm {
        title: card.title.clone(),
        question: card.question.clone(),
        topic: card.category.clone(),
        difficulty: Some(card.difficulty().to_string()),
        image_id: card.image_id.map(|id| id.to_string()),
        answers: card
            .answers()
            .answers()
            .iter()
            .map(|a| (a.text.clone(), a.is_correct))
            .collect(),
    }
}

fn card_editor(
    state: &ServerState,
    action: &str,
    form: &CardForm,
    topics: &[Topic],
    images: &[Image],
    error: Option<&str>,
) -> Markup {
    let tr = |text| state.t(text);
    let selected_topic = form.topic.as_deref().unwrap_or("");
    let selected_image = form.image_id.as_deref().unwrap_or("");
    let difficulty = form
        .difficulty
        .as_deref()
        .and_then(|d| d.parse::<u8>().ok())
        .unwrap_or(MIN_DIFFICULTY);
    let rows = (form.answers.len() + SPARE_ANSWER_ROWS).max(MIN_ANSWER_ROWS);
    html! {
        @if let Some(error) = error {
            div.error-message { (error) }
        }
        form.editor action=(action) method="post" {
            label { (tr(Text::Title)) input type="text" name="title" value=(form.title); }
            label { (tr(Text::Question)) textarea name="question" rows="3" { (form.question) } }
            label {
                (tr(Text::Topic))
                select name="topic" {
                    option value="" { "" }
                    @for topic in topics {
                        option value=(topic.name) selected[topic.name == selected_topic] { (topic.name) }
                    }
                }
            }
            label {
                (tr(Text::Difficulty))
                select name="difficulty" {
                    @for d in MIN_DIFFICULTY..=MAX_DIFFICULTY {
                        option value=(d) selected[d == difficulty] { (stars(d)) }
                    }
                }
            }
            label {
                (tr(Text::Image))
                select name="image_id" {
                    option value="" { (tr(Text::NoImage)) }
                    @for image in images {
                        @if let Some(id) = image.id {
                            option value=(id) selected[id.to_string() == selected_image] { (image.name) }
                        }
                    }
                }
            }
            fieldset.answers {
                legend { (tr(Text::Answers)) }
                @for i in 0..rows {
                    @let (text, correct) = form.answers.get(i).cloned().unwrap_or_default();
                    div.answer-row {
                        input type="text" name=(format!("answer_{i}")) value=(text);
                        label.checkbox {
                            input type="checkbox" name=(format!("correct_{i}")) checked[correct];
                            (tr(Text::Correct))
                        }
                    }
                }
            }
            div.buttons {
                input type="submit" value=(tr(Text::Save));
                a href="/cards/manage" { (tr(Text::Cancel)) }
            }
        }
    }
}

async fn render_editor(
    state: &ServerState,
    session: &Session,
    client: &ApiClient,
    heading: &str,
    action: &str,
    form: &CardForm,
    error: Option<&str>,
) -> Html<String> {
    let (topics, images) = editor_choices(client).await;
    let content = card_editor(state, action, form, &topics, &images, error);
    app_page(state, session, client, heading, content).await
}

pub async fn new_card(State(state): State<ServerState>) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let form = CardForm::default();
    let heading = state.t(Text::NewCard);
    Ok(render_editor(&state, &session, &client, heading, "/cards", &form, None).await)
}

pub async fn create(
    State(state): State<ServerState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, Redirect> {
    let (session, client) = state.signed_in()?;
    let form = CardForm::from_pairs(&pairs);
    let heading = state.t(Text::NewCard);
    let result = match form.validate(None) {
        Ok(card) => client
            .create_card(&card)
            .await
            .map_err(|e| e.message(state.language)),
        Err(e) => Err(e.message(state.language).to_string()),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/cards/manage").into_response())
        }
        Err(message) => {
            let page =
                render_editor(&state, &session, &client, heading, "/cards", &form, Some(message.as_str()))
                    .await;
            Ok(page.into_response())
        }
    }
}

async fn find_card(client: &ApiClient, id: i64) -> Result<LearningCard, ApiError> {
    let cards = client.cards().await?;
    cards
        .into_iter()
        .find(|card| card.id == Some(id))
        .ok_or(ApiError::NotFound)
}

pub async fn edit(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let (session, client) = state.signed_in()?;
    let heading = state.t(Text::Edit);
    match find_card(&client, id).await {
        Ok(card) => {
            let form = form_from_card(&card);
            let action = format!("/cards/{id}");
            Ok(render_editor(&state, &session, &client, heading, &action, &form, None).await)
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
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, Redirect> {
    let (session, client) = state.signed_in()?;
    let heading = state.t(Text::Edit);
    let action = format!("/cards/{id}");
    let form = CardForm::from_pairs(&pairs);
    let existing = match find_card(&client, id).await {
        Ok(card) => card,
        Err(e) => {
            let content = error_box(state.language, &e);
            let page = app_page(&state, &session, &client, heading, content).await;
            return Ok(page.into_response());
        }
    };
    let result = match form.validate(Some(&existing)) {
        Ok(card) => client
            .update_card(id, &card)
            .await
            .map_err(|e| e.message(state.language)),
        Err(e) => Err(e.message(state.language).to_string()),
    };
    match result {
        Ok(()) => {
            state.notify(Notice::success(state.t(Text::Saved)));
            Ok(Redirect::to("/cards/manage").into_response())
        }
        Err(message) => {
            let page =
                render_editor(&state, &session, &client, heading, &action, &form, Some(message.as_str()))
                    .await;
            Ok(page.into_response())
        }
    }
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let (_, client) = state.signed_in()?;
    match client.delete_card(id).await {
        Ok(()) => state.notify(Notice::success(state.t(Text::Deleted))),
        Err(e) => state.notify(Notice::error(e.message(state.language))),
    }
    Ok(Redirect::to("/cards/manage"))
}
