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

use crate::api::ApiClient;
use crate::api::ApiResult;
use crate::types::assessment::Assessment;
use crate::types::assessment::AssessmentResult;
use crate::types::assessment::PauseRequest;
use crate::types::assessment::Submission;
use crate::types::assessment::UserAssessment;
use crate::types::card::LearningCard;
use crate::types::user::User;

impl ApiClient {
    pub async fn assessments(&self) -> ApiResult<Vec<Assessment>> {
        self.get_json("/assessments").await
    }

    pub async fn assessment(&self, id: i64) -> ApiResult<Assessment> {
        self.get_json(&format!("/assessments/{id}")).await
    }

    pub async fn create_assessment(&self, assessment: &Assessment) -> ApiResult<()> {
        self.post_json("/assessments", assessment).await?;
        Ok(())
    }

    pub async fn update_assessment(&self, id: i64, assessment: &Assessment) -> ApiResult<()> {
        self.put_json(&format!("/assessments/{id}"), assessment).await
    }

    pub async fn delete_assessment(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/assessments/{id}")).await
    }

    pub async fn assessment_users(&self, id: i64) -> ApiResult<Vec<User>> {
        self.get_json(&format!("/assessments/{id}/users")).await
    }

    pub async fn add_assessment_user(&self, id: i64, user_id: i64) -> ApiResult<()> {
        self.post_empty(&format!("/assessments/{id}/users/{user_id}")).await
    }

    pub async fn remove_assessment_user(&self, id: i64, user_id: i64) -> ApiResult<()> {
        self.delete(&format!("/assessments/{id}/users/{user_id}")).await
    }

    pub async fn users(&self) -> ApiResult<Vec<User>> {
        self.get_json("/users").await
    }

    // Taking an assessment.

    /// Assessments the signed-in user is a participant of.
    pub async fn available_assessments(&self) -> ApiResult<Vec<UserAssessment>> {
        self.get_json("/assessments/available").await
    }

    pub async fn start_assessment(&self, id: i64) -> ApiResult<()> {
        self.post_empty(&format!("/assessments/{id}/start")).await
    }

    /// The exam's cards. Answers still carry their correctness flags.
    pub async fn assessment_questions(&self, id: i64) -> ApiResult<Vec<LearningCard>> {
        self.get_json(&format!("/assessments/{id}/questions")).await
    }

    pub async fn pause_assessment(&self, id: i64, pause: &PauseRequest) -> ApiResult<()> {
        self.post_json(&format!("/assessments/{id}/pause"), pause).await?;
        Ok(())
    }

    pub async fn submit_assessment(
        &self,
        id: i64,
        submission: &Submission,
    ) -> ApiResult<AssessmentResult> {
        let path = format!("/assessments/{id}/submit");
        let response = self.post_json(&path, submission).await?;
        Self::decode(response, &path).await
    }

    pub async fn assessment_result(&self, id: i64) -> ApiResult<AssessmentResult> {
        self.get_json(&format!("/assessments/{id}/result")).await
    }
}
