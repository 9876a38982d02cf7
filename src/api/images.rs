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


use reqwest::header::CONTENT_TYPE;

use crate::api::ApiClient;
use crate::api::ApiResult;
use crate::api::Download;
use crate::api::encode;
use crate::types::image::Image;
use crate::types::image::UploadResponse;
use crate::types::image::split_file_name;

impl ApiClient {
    pub async fn images(&self) -> ApiResult<Vec<Image>> {
        self.get_json("/images").await
    }

    pub async fn image(&self, id: i64) -> ApiResult<Image> {
        self.get_json(&format!("/images/{id}")).await
    }

    pub async fn create_image(&self, image: &Image) -> ApiResult<()> {
        self.post_json("/images", image).await?;
        Ok(())
    }

    pub async fn delete_image(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/images/{id}")).await
    }

    /// Uploads the raw file and returns its storage location.
    pub async fn upload_image_content(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<String> {
        let path = format!("/images/content/{}", encode(file_name));
        log::debug!("POST {path} ({} bytes)", bytes.len());
        let builder = self.authorize(self.http.post(self.url(&path)))?;
        let builder = builder
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes);
        let response = self.send(builder, &path).await?;
        let upload: UploadResponse = Self::decode(response, &path).await?;
        Ok(upload.id)
    }

    /// Uploads the file, then registers the image under `name`.
    pub async fn upload_image(
        &self,
        name: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<Image> {
        let location = self.upload_image_content(file_name, bytes).await?;
        let (_, extension) = split_file_name(file_name);
        let image = Image {
            id: None,
            name: name.to_string(),
            extension: extension.to_lowercase(),
            location,
        };
        self.create_image(&image).await?;
        Ok(image)
    }

    pub async fn thumbnail(&self, location: &str) -> ApiResult<Download> {
        self.get_bytes(&format!("/thumbnails/{}", encode(location))).await
    }

    pub async fn resized(&self, location: &str) -> ApiResult<Download> {
        self.get_bytes(&format!("/resize/{}", encode(location))).await
    }

    pub async fn content(&self, file_name: &str) -> ApiResult<Download> {
        self.get_bytes(&format!("/content/{}", encode(file_name))).await
    }
}
