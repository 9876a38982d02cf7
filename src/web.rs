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


mod assessments;
mod attempts;
mod auth;
mod cards;
mod exams;
mod home;
mod images;
mod materials;
pub mod server;
mod state;
mod template;
mod topics;

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::error::Fallible;
    use crate::helper::FakeBackend;
    use crate::helper::PASSWORD;
    use crate::helper::USERNAME;
    use crate::helper::start_front_end;

    async fn sign_in(client: &Client, base: &str) -> Fallible<String> {
        let response = client
            .post(format!("{base}/login"))
            .form(&[("username", USERNAME), ("password", PASSWORD)])
            .send()
            .await?;
        assert!(response.status().is_success());
        Ok(response.text().await?)
    }

    /// Reports a scroll position at the very bottom of a long page.
    async fn scroll_to_bottom(client: &Client, base: &str) -> Fallible<(StatusCode, String)> {
        let response = client
            .get(format!("{base}/materials/more?y=9200&viewport=800&height=10000"))
            .send()
            .await?;
        let status = response.status();
        Ok((status, response.text().await?))
    }

    #[tokio::test]
    async fn test_static_files() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;

        // Hit the `style.css` endpoint.
        let response = reqwest::get(format!("{base}/style.css")).await?;
        assert!(response.status().is_success());
        assert_eq!(response.headers().get("content-type").unwrap(), "text/css");

        // Hit the `script.js` endpoint.
        let response = reqwest::get(format!("{base}/script.js")).await?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/javascript"
        );

        // The script only asks for more materials near the bottom.
        let script = reqwest::get(format!("{base}/script.js")).await?.text().await?;
        assert!(script.contains("const SCROLL_THRESHOLD = 200;"));
        assert!(script.contains("if (inFlight || (!force && !nearBottom()))"));

        // Hit the not found endpoint.
        let response = reqwest::get(format!("{base}/herp-derp")).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_page_without_session() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;

        let response = reqwest::get(format!("{base}/")).await?;
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
        let html = response.text().await?;
        assert!(html.contains("id=\"login-form\""));
        assert!(html.contains("id=\"register-form\""));

        // App views send visitors without a session back to the login page.
        let html = reqwest::get(format!("{base}/cards")).await?.text().await?;
        assert!(html.contains("id=\"login-form\""));
        assert_eq!(backend.count("GET /learning-cards"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_login_flow() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();

        // Wrong password.
        let html = client
            .post(format!("{base}/login"))
            .form(&[("username", USERNAME), ("password", "wrong")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Sign-in failed. Please check your credentials."));
        assert!(html.contains("id=\"login-form\""));

        let html = sign_in(&client, &base).await?;
        assert!(html.contains("Signed in successfully"));
        assert!(html.contains("Welcome, alice!"));
        assert!(html.contains("href=\"/cards\""));
        assert!(html.contains("href=\"/materials\""));
        assert_eq!(backend.count("POST /login"), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_learn_view() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        let html = client.get(format!("{base}/cards")).send().await?.text().await?;
        assert!(html.contains("Capital of France?"));
        assert!(html.contains("★★☆☆☆"));
        // The legacy answer format still renders.
        assert!(html.contains("Seven"));
        assert!(html.contains("Eight"));
        assert_eq!(backend.count("GET /stroke/anz"), 2);

        // Answers start unmarked; nothing reveals which one is right.
        assert!(!html.contains("class=\"correct\""));
        assert!(html.contains("name=\"answer_0\" value=\"unknown\" checked>"));
        assert!(html.contains("Is it correct?"));

        // Topic filter built from the card categories.
        assert!(html.contains("<option value=\"Geography\">Geography</option>"));
        assert!(html.contains("<option value=\"Math\">Math</option>"));

        // The card image goes through the resize proxy.
        assert!(html.contains("src=\"/media/resize/eiffel%201.png\""));
        assert_eq!(backend.count("GET /images/{id}"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_learn_topic_filter_and_check() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        let html = client.get(format!("{base}/cards?topic=Math")).send().await?.text().await?;
        assert!(html.contains("Pick the prime."));
        assert!(!html.contains("Capital of France?"));
        assert!(html.contains("<option value=\"Math\" selected>Math</option>"));
        assert_eq!(backend.count("GET /images/{id}"), 0);

        let html = client
            .post(format!("{base}/cards/2/check"))
            .form(&[("topic", "Math"), ("answer_0", "yes"), ("answer_1", "yes")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Unfortunately wrong. Check your selection again."));
        // The marks and the filter survive the check.
        assert!(html.contains("name=\"answer_1\" value=\"yes\" checked>"));
        assert!(!html.contains("Capital of France?"));

        let html = client
            .post(format!("{base}/cards/2/check"))
            .form(&[("topic", "Math"), ("answer_0", "yes"), ("answer_1", "no")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Correct! All answers are correctly chosen."));

        // An unanswered mark is never right.
        let html = client
            .post(format!("{base}/cards/2/check"))
            .form(&[("topic", ""), ("answer_0", "yes")])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Unfortunately wrong."));
        assert!(html.contains("Capital of France?"));
        Ok(())
    }

    #[tokio::test]
    async fn test_take_exam() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        let html = client.get(format!("{base}/my-exams")).send().await?.text().await?;
        assert!(html.contains("Spring exam"));
        assert!(html.contains("Assigned"));
        assert!(html.contains("01.01.2000 00:00"));
        assert!(html.contains("action=\"/my-exams/7/start\""));

        // Starting leads to the question sheet.
        let html = client
            .post(format!("{base}/my-exams/7/start"))
            .send()
            .await?
            .text()
            .await?;
        assert_eq!(backend.attempt(), "started");
        assert!(html.contains("id=\"exam-form\""));
        assert!(html.contains("Capital of France?"));
        assert!(html.contains("name=\"q2_1\" value=\"unknown\" checked>"));
        assert!(html.contains("data-remaining="));

        // Pausing reports the session time and returns to the list.
        let html = client
            .post(format!("{base}/my-exams/7/pause"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("The exam was paused."));
        assert_eq!(backend.attempt(), "paused");
        assert_eq!(backend.pauses().len(), 1);
        assert!(html.contains("href=\"/my-exams/7\""));

        let html = client.get(format!("{base}/my-exams/7")).send().await?.text().await?;
        assert!(html.contains("Pick the prime."));

        let html = client
            .post(format!("{base}/my-exams/7/submit"))
            .form(&[("q1_0", "yes"), ("q1_1", "no"), ("q2_0", "yes"), ("q2_1", "unknown")])
            .send()
            .await?
            .text()
            .await?;
        assert_eq!(backend.attempt(), "completed");
        assert!(html.contains("Exam submitted"));
        assert!(html.contains("100%"));
        assert!(html.contains("5:09"));

        // Completed assessments link to their result.
        let html = client.get(format!("{base}/my-exams")).send().await?.text().await?;
        assert!(html.contains("href=\"/my-exams/7/result\""));
        let html = client
            .get(format!("{base}/my-exams/7/result"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("100%"));
        assert_eq!(backend.count("GET /assessments/{id}/result"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_assessments_with_zoned_and_empty_times() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        backend.add_assessment(json!({
            "id": 1,
            "name": "Zoned",
            "examId": 4,
            "startTime": "2025-03-01T09:00:00+01:00[Europe/Vienna]",
            "endTime": "2025-03-01T11:00:00+01:00[Europe/Vienna]",
        }));
        backend.add_assessment(json!({
            "id": 2,
            "name": "Blank",
            "examId": 4,
            "startTime": "",
            "endTime": "",
        }));
        let html = client.get(format!("{base}/assessments")).send().await?.text().await?;
        assert!(!html.contains("Invalid response from server"));
        assert!(html.contains("Zoned"));
        assert!(html.contains("01.03.2025 09:00"));
        assert!(html.contains("01.03.2025 11:00"));
        assert!(html.contains("Blank"));
        assert!(html.contains("<td>Unknown</td>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unauthorized_list_renders_inline() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        backend.set_unauthorized(true);
        let response = client.get(format!("{base}/cards")).send().await?;
        assert!(response.status().is_success());
        let html = response.text().await?;
        assert!(html.contains("Not authorized"));
        // The menu is hidden when the permission lookup fails.
        assert!(!html.contains("href=\"/materials\""));

        // The session survives: the server is still usable.
        backend.set_unauthorized(false);
        let html = client.get(format!("{base}/topics")).send().await?.text().await?;
        assert!(html.contains("Geography"));
        Ok(())
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;
        client.get(format!("{base}/materials")).send().await?;

        let html = client
            .post(format!("{base}/logout"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("Signed out successfully"));
        assert!(html.contains("id=\"login-form\""));

        let html = client.get(format!("{base}/materials")).send().await?.text().await?;
        assert!(html.contains("id=\"login-form\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_assessment_with_end_before_start_is_not_sent() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        let html = client
            .post(format!("{base}/assessments"))
            .form(&[
                ("name", "Spring"),
                ("exam_id", "4"),
                ("start_time", "2025-03-01T11:00"),
                ("end_time", "2025-03-01T09:00"),
            ])
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("The end must be after the start"));
        assert_eq!(backend.count("POST /assessments"), 0);

        let html = client
            .post(format!("{base}/assessments"))
            .form(&[
                ("name", "Spring"),
                ("exam_id", "4"),
                ("start_time", "2025-03-01T09:00"),
                ("end_time", "2025-03-01T11:00"),
            ])
            .send()
            .await?
            .text()
            .await?;
        assert_eq!(backend.count("POST /assessments"), 1);
        assert!(html.contains("Spring"));
        assert!(html.contains("01.03.2025 09:00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_materials_scroll() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        let html = client.get(format!("{base}/materials")).send().await?.text().await?;
        assert!(html.contains("50 of 120 loaded"));
        assert!(html.contains("<option value=\"Biology\">Biology</option>"));
        assert!(!html.contains("Physics"));
        assert!(html.contains(">Biology 50<"));
        assert!(!html.contains(">Chemistry 51<"));

        // Far from the bottom: nothing is loaded.
        let response = client
            .get(format!("{base}/materials/more?y=0&viewport=800&height=10000"))
            .send()
            .await?;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, html) = scroll_to_bottom(&client, &base).await?;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("100 of 120 loaded"));
        assert!(html.contains(">Biology 100<"));

        let (_, html) = scroll_to_bottom(&client, &base).await?;
        assert!(html.contains("120 of 120 loaded"));

        // The next page is empty, which ends the list.
        let (_, html) = scroll_to_bottom(&client, &base).await?;
        assert!(html.contains("No more materials"));
        assert_eq!(backend.count("GET /unterlagen"), 4);

        let (status, _) = scroll_to_bottom(&client, &base).await?;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(backend.count("GET /unterlagen"), 4);

        // Packages from later pages are offered by the filter.
        assert!(html.contains("<option value=\"Physics\">Physics</option>"));

        // Client-side package filter.
        let html = client
            .get(format!("{base}/materials/list?package=Biology"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains(">Biology 2<"));
        assert!(!html.contains(">Chemistry 1<"));
        assert!(html.contains("<option value=\"Biology\" selected>Biology</option>"));
        assert!(html.contains("<option value=\"Physics\">Physics</option>"));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_resets_the_list() -> Fallible<()> {
        let backend = FakeBackend::start().await?;
        let base = start_front_end(&backend).await?;
        let client = Client::new();
        sign_in(&client, &base).await?;

        client.get(format!("{base}/materials")).send().await?;
        scroll_to_bottom(&client, &base).await?;

        let html = client
            .get(format!("{base}/materials?q=Biology"))
            .send()
            .await?
            .text()
            .await?;
        assert!(html.contains("50 of 60 loaded"));
        assert!(!html.contains("Chemistry"));
        assert_eq!(backend.count("GET /unterlagen/search"), 1);
        assert_eq!(backend.count("GET /unterlagen/search/anz"), 1);

        let (_, html) = scroll_to_bottom(&client, &base).await?;
        assert!(html.contains("60 of 60 loaded"));
        Ok(())
    }
}
