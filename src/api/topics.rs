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
use crate::types::card::Topic;

impl ApiClient {
    pub async fn create_topic(&self, topic: &Topic) -> ApiResult<()> {
        self.post_json("/learning-topics", topic).await?;
        Ok(())
    }

    pub async fn update_topic(&self, id: i64, topic: &Topic) -> ApiResult<()> {
        self.put_json(&format!("/learning-topics/{id}"), topic).await
    }

    pub async fn delete_topic(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/learning-topics/{id}")).await
    }
}
