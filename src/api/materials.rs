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
use crate::api::Download;
use crate::api::encode;
use crate::types::material::MaterialCount;
use crate::types::material::UnterlageInfo;

impl ApiClient {
    pub async fn materials_page(
        &self,
        page: u32,
        page_size: usize,
    ) -> ApiResult<Vec<UnterlageInfo>> {
        self.get_json(&format!("/unterlagen?page={page}&pageSize={page_size}"))
            .await
    }

    pub async fn search_page(
        &self,
        query: &str,
        page: u32,
        page_size: usize,
    ) -> ApiResult<Vec<UnterlageInfo>> {
        self.get_json(&format!(
            "/unterlagen/search?q={}&page={page}&pageSize={page_size}",
            encode(query)
        ))
        .await
    }

    /// Total number of materials, optionally restricted to a search.
    pub async fn materials_count(&self, query: Option<&str>) -> ApiResult<u64> {
        let path = match query {
            Some(q) => format!("/unterlagen/search/anz?q={}", encode(q)),
            None => "/unterlagen/anz".to_string(),
        };
        let count: MaterialCount = self.get_json(&path).await?;
        Ok(count.count)
    }

    pub async fn material_content(&self, location: &str) -> ApiResult<Download> {
        self.get_bytes(&format!("/material/content/{}", encode(location))).await
    }
}
