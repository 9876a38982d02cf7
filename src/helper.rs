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


//! Test fixtures: temporary directories and an in-memory stand-in for the
//! REST backend.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use tempfile::tempdir;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::config::Config;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::i18n::Language;
use crate::storage::LocalStorage;
use crate::web::server::start_server;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
const TOKEN: &str = "token-alice";

pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let target: PathBuf = tempdir()?.keep().canonicalize()?;
    Ok(target)
}

pub async fn wait_for_port(port: u16) {
    loop {
        if let Ok(stream) = TcpStream::connect(("127.0.0.1", port)).await {
            drop(stream);
            break;
        }
        sleep(Duration::from_millis(1)).await;
    }
}

fn pick_port() -> Fallible<u16> {
    portpicker::pick_unused_port().ok_or_else(|| ErrorReport::new("no free port."))
}

#[derive(Default)]
pub struct FakeData {
    /// Answer every request except `/login` with 401.
    pub unauthorized: bool,
    /// Number of requests per `METHOD /path`.
    pub requests: HashMap<String, usize>,
    pub materials: Vec<Value>,
    pub assessments: Vec<Value>,
    /// Status of the participant in assessment 7.
    pub attempt: String,
    /// Seconds reported by each pause.
    pub pauses: Vec<u64>,
    pub result: Option<Value>,
}

type Shared = Arc<Mutex<FakeData>>;

/// An in-memory backend serving the endpoints the front end calls.
pub struct FakeBackend {
    pub url: String,
    data: Shared,
}

impl FakeBackend {
    pub async fn start() -> Fallible<Self> {
        let data: Shared = Arc::new(Mutex::new(FakeData {
            materials: (1..=120).map(material).collect(),
            attempt: "assigned".to_string(),
            ..FakeData::default()
        }));
        let app = Router::new()
            .route("/login", post(login))
            .route("/me", get(me))
            .route("/me/products", get(products))
            .route("/learning-cards", get(cards))
            .route("/learning-topics", get(topics))
            .route("/stroke/anz/{id}", get(stroke_count))
            .route("/exams", get(exams))
            .route("/assessments", get(assessments).post(create_assessment))
            .route("/assessments/available", get(available))
            .route("/assessments/{id}/start", post(start_attempt))
            .route("/assessments/{id}/questions", get(questions))
            .route("/assessments/{id}/pause", post(pause_attempt))
            .route("/assessments/{id}/submit", post(submit_attempt))
            .route("/assessments/{id}/result", get(attempt_result))
            .route("/users", get(users))
            .route("/images", get(images))
            .route("/images/{id}", get(image))
            .route("/unterlagen", get(materials))
            .route("/unterlagen/anz", get(materials_count))
            .route("/unterlagen/search", get(search))
            .route("/unterlagen/search/anz", get(search_count))
            .with_state(data.clone());
        let port = pick_port()?;
        let listener = TcpListener::bind(("127.0.0.1", port)).await?;
        tokio::spawn(async move { axum::serve(listener, app).await });
        Ok(Self {
            url: format!("http://127.0.0.1:{port}"),
            data,
        })
    }

    pub fn set_unauthorized(&self, value: bool) {
        if let Ok(mut data) = self.data.lock() {
            data.unauthorized = value;
        }
    }

    /// Adds a raw assessment record to the list the backend returns.
    pub fn add_assessment(&self, assessment: Value) {
        if let Ok(mut data) = self.data.lock() {
            data.assessments.push(assessment);
        }
    }

    pub fn attempt(&self) -> String {
        match self.data.lock() {
            Ok(data) => data.attempt.clone(),
            Err(_) => String::new(),
        }
    }

    pub fn pauses(&self) -> Vec<u64> {
        match self.data.lock() {
            Ok(data) => data.pauses.clone(),
            Err(_) => Vec::new(),
        }
    }

    /// How often `endpoint` (`METHOD /path`) was called.
    pub fn count(&self, endpoint: &str) -> usize {
        match self.data.lock() {
            Ok(data) => data.requests.get(endpoint).copied().unwrap_or(0),
            Err(_) => 0,
        }
    }
}

/// Starts the front end against `backend` on a free port and returns its
/// base URL.
pub async fn start_front_end(backend: &FakeBackend) -> Fallible<String> {
    let directory = create_tmp_directory()?;
    let storage = LocalStorage::open(&directory.join("storage.db"))?;
    let port = pick_port()?;
    let config = Config {
        backend_url: backend.url.clone(),
        port,
        language: Language::En,
        open_browser: false,
        ..Config::default()
    };
    tokio::spawn(async move { start_server(config, storage).await });
    wait_for_port(port).await;
    Ok(format!("http://127.0.0.1:{port}"))
}

fn material(id: i64) -> Value {
    // Physics only shows up on the last page.
    let package = if id % 2 == 0 {
        "Biology"
    } else if id > 110 {
        "Physics"
    } else {
        "Chemistry"
    };
    json!({
        "id": id,
        "paketName": package,
        "name": format!("{package} {id}"),
        "material": [{
            "id": id,
            "name": format!("notes-{id}.pdf"),
            "type": "pdf",
            "sizeByte": 1024,
            "location": format!("loc{id}"),
        }],
    })
}

/// Records the call and enforces the unauthorized mode.
fn hit(data: &Shared, endpoint: &str) -> Result<(), StatusCode> {
    let mut data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    *data.requests.entry(endpoint.to_string()).or_default() += 1;
    if data.unauthorized {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

async fn login(
    State(data): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if let Ok(mut data) = data.lock() {
        *data.requests.entry("POST /login".to_string()).or_default() += 1;
    }
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Ok(Json(json!({ "token": TOKEN })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn me(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /me")?;
    Ok(Json(json!({
        "id": 1,
        "username": USERNAME,
        "permissions": ["user.manage"],
    })))
}

async fn products(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /me/products")?;
    Ok(Json(json!([
        { "id": 1, "name": "Lernkarten" },
        { "id": 2, "name": "Bilderverwaltung" },
        { "id": 3, "name": "Lernmaterial" },
    ])))
}

fn card_list() -> Value {
    json!([
        {
            "id": 1,
            "title": "Capitals",
            "question": "Capital of France?",
            "answer": "[{\"text\":\"Paris\",\"isCorrect\":true},{\"text\":\"Lyon\",\"isCorrect\":false}]",
            "category": "Geography",
            "difficulty": 2,
            "imageId": 9,
        },
        {
            "id": 2,
            "title": "Legacy",
            "question": "Pick the prime.",
            "answer": "1. Seven (✓)\n2. Eight",
            "category": "Math",
        },
    ])
}

async fn cards(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /learning-cards")?;
    Ok(Json(card_list()))
}

async fn topics(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /learning-topics")?;
    Ok(Json(json!([{ "id": 1, "name": "Geography" }])))
}

async fn stroke_count(
    State(data): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /stroke/anz")?;
    if id == 1 {
        Ok(Json(json!({ "number": 3 })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn exams(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /exams")?;
    Ok(Json(json!([{ "id": 4, "name": "Final", "durationInSeconds": 600 }])))
}

async fn assessments(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /assessments")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(Value::Array(data.assessments.clone())))
}

async fn create_assessment(
    State(data): State<Shared>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "POST /assessments")?;
    let mut data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    data.assessments.push(body.clone());
    Ok(Json(body))
}

async fn users(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /users")?;
    Ok(Json(json!([{ "id": 1, "username": USERNAME }, { "id": 2, "username": "bob" }])))
}

async fn images(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /images")?;
    Ok(Json(json!([])))
}

async fn image(
    State(data): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /images/{id}")?;
    if id == 9 {
        Ok(Json(json!({ "id": 9, "name": "Eiffel", "extension": "png", "location": "eiffel 1.png" })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// Assessment 7 is the only one offered; its times carry a zone id.
async fn available(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /assessments/available")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(json!([{
        "id": 7,
        "name": "Spring exam",
        "examId": 4,
        "examName": "Final",
        "startTime": "2000-01-01T00:00:00+01:00[Europe/Vienna]",
        "endTime": "2999-12-31T23:59:00+01:00[Europe/Vienna]",
        "status": data.attempt,
        "duration": 600,
        "cardCount": 2,
        "timeSpentSeconds": data.pauses.iter().sum::<u64>(),
    }])))
}

fn attempt_guard(data: &FakeData, id: i64, allowed: &[&str]) -> Result<(), StatusCode> {
    if id != 7 {
        return Err(StatusCode::NOT_FOUND);
    }
    if allowed.contains(&data.attempt.as_str()) {
        Ok(())
    } else {
        Err(StatusCode::BAD_REQUEST)
    }
}

async fn start_attempt(
    State(data): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "POST /assessments/{id}/start")?;
    let mut data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    attempt_guard(&data, id, &["assigned"])?;
    data.attempt = "started".to_string();
    Ok(Json(json!({ "message": "Assessment started successfully" })))
}

async fn questions(
    State(data): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /assessments/{id}/questions")?;
    if id != 7 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(card_list()))
}

async fn pause_attempt(
    State(data): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "POST /assessments/{id}/pause")?;
    let mut data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    attempt_guard(&data, id, &["started", "paused"])?;
    let seconds = body["timeSpentSeconds"].as_u64().ok_or(StatusCode::BAD_REQUEST)?;
    data.pauses.push(seconds);
    data.attempt = "paused".to_string();
    Ok(Json(json!({ "message": "Assessment paused successfully" })))
}

/// Scores like the real backend: a question counts when exactly its
/// correct numbered lines were submitted.
async fn submit_attempt(
    State(data): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<HashMap<String, Vec<String>>>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "POST /assessments/{id}/submit")?;
    let mut data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    attempt_guard(&data, id, &["started", "paused"])?;
    let expected = [("1", vec!["1. Paris"]), ("2", vec!["1. Seven"])];
    let correct = expected
        .iter()
        .filter(|(card, lines)| body.get(*card).is_some_and(|given| given == lines))
        .count() as u64;
    let incorrect = 2 - correct;
    let score = correct as f64 * 50.0;
    let result = json!({
        "id": 1,
        "assessmentId": id,
        "userId": 1,
        "startedAt": "2025-03-01T09:00:00+01:00[Europe/Vienna]",
        "completedAt": "2025-03-01T09:05:00.123456+01:00[Europe/Vienna]",
        "totalQuestions": 2,
        "correctAnswers": correct,
        "incorrectAnswers": incorrect,
        "scorePercentage": score,
        "timeSpentSeconds": 309,
    });
    data.attempt = "completed".to_string();
    data.result = Some(result.clone());
    Ok(Json(result))
}

async fn attempt_result(
    State(data): State<Shared>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /assessments/{id}/result")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    match (&data.result, id) {
        (Some(result), 7) => Ok(Json(result.clone())),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

fn page_of(items: &[Value], params: &HashMap<String, String>) -> Vec<Value> {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: usize = params.get("pageSize").and_then(|p| p.parse().ok()).unwrap_or(50);
    items
        .iter()
        .skip((page.max(1) - 1) * size)
        .take(size)
        .cloned()
        .collect()
}

fn matching(items: &[Value], q: &str) -> Vec<Value> {
    items
        .iter()
        .filter(|item| item["name"].as_str().is_some_and(|name| name.contains(q)))
        .cloned()
        .collect()
}

async fn materials(
    State(data): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /unterlagen")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(Value::Array(page_of(&data.materials, &params))))
}

async fn materials_count(State(data): State<Shared>) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /unterlagen/anz")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(json!({ "count": data.materials.len() })))
}

async fn search(
    State(data): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /unterlagen/search")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let q = params.get("q").cloned().unwrap_or_default();
    let found = matching(&data.materials, &q);
    Ok(Json(Value::Array(page_of(&found, &params))))
}

async fn search_count(
    State(data): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    hit(&data, "GET /unterlagen/search/anz")?;
    let data = data.lock().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let q = params.get("q").cloned().unwrap_or_default();
    Ok(Json(json!({ "count": matching(&data.materials, &q).len() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_directory() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        assert!(directory.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_fake_backend_counts_requests() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let response = reqwest::get(format!("{}/unterlagen/anz", backend.url)).await?;
        assert!(response.status().is_success());
        assert_eq!(backend.count("GET /unterlagen/anz"), 1);
        backend.set_unauthorized(true);
        let response = reqwest::get(format!("{}/exams", backend.url)).await?;
        assert_eq!(response.status().as_u16(), 401);
        Ok(())
    }
}
