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
use crate::types::card::LearningCard;
use crate::types::exam::Exam;

impl ApiClient {
    pub async fn exams(&self) -> ApiResult<Vec<Exam>> {
        self.get_json("/exams").await
    }

    pub async fn create_exam(&self, exam: &Exam) -> ApiResult<()> {
        self.post_json("/exams", exam).await?;
        Ok(())
    }

    pub async fn update_exam(&self, id: i64, exam: &Exam) -> ApiResult<()> {
        self.put_json(&format!("/exams/{id}"), exam).await
    }

    pub async fn delete_exam(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/exams/{id}")).await
    }

    pub async fn exam_cards(&self, exam_id: i64) -> ApiResult<Vec<LearningCard>> {
        self.get_json(&format!("/exams/{exam_id}/cards")).await
    }

    pub async fn add_exam_card(&self, exam_id: i64, card_id: i64) -> ApiResult<()> {
        self.post_empty(&format!("/exams/{exam_id}/cards/{card_id}")).await
    }

    pub async fn remove_exam_card(&self, exam_id: i64, card_id: i64) -> ApiResult<()> {
        self.delete(&format!("/exams/{exam_id}/cards/{card_id}")).await
    }
}
