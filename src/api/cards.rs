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
use crate::api::ApiError;
use crate::api::ApiResult;
use crate::types::card::LearningCard;
use crate::types::card::StrokeCount;
use crate::types::card::StrokePost;
use crate::types::card::Topic;

impl ApiClient {
    pub async fn cards(&self) -> ApiResult<Vec<LearningCard>> {
        self.get_json("/learning-cards").await
    }

    pub async fn create_card(&self, card: &LearningCard) -> ApiResult<()> {
        self.post_json("/learning-cards", card).await?;
        Ok(())
    }

    pub async fn update_card(&self, id: i64, card: &LearningCard) -> ApiResult<()> {
        self.put_json(&format!("/learning-cards/{id}"), card).await
    }

    pub async fn delete_card(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/learning-cards/{id}")).await
    }

    pub async fn topics(&self) -> ApiResult<Vec<Topic>> {
        self.get_json("/learning-topics").await
    }

    /// Number of strokes recorded against a card. A card with no strokes
    /// yet is reported by the backend as not found.
    pub async fn stroke_count(&self, card_id: i64) -> ApiResult<i64> {
        let path = format!("/stroke/anz/{card_id}");
        match self.get_json::<StrokeCount>(&path).await {
            Ok(count) => Ok(count.number),
            Err(ApiError::NotFound) => Ok(0),
            Err(e) => Err(e),
        }
    }

    pub async fn post_stroke(&self, stroke: &StrokePost) -> ApiResult<()> {
        self.post_json("/stroke", stroke).await?;
        Ok(())
    }
}
