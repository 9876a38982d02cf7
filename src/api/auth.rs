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
use crate::types::user::AuthResponse;
use crate::types::user::Credentials;
use crate::types::user::Product;
use crate::types::user::Registration;
use crate::types::user::UserInfo;

/// Result of a registration attempt that reached the backend.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RegisterOutcome {
    Created(AuthResponse),
    /// The backend refused the registration; `message` is its response body.
    Rejected { status: u16, message: String },
}

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        let path = "/login";
        log::debug!("POST {path}");
        let builder = Self::json_body(self.http.post(self.url(path)), credentials)?;
        let response = self.send(builder, path).await?;
        let auth: AuthResponse = Self::decode(response, path).await?;
        match &auth.token {
            Some(token) if !token.is_empty() => Ok(auth),
            _ => Err(ApiError::Decode("login response has no token".to_string())),
        }
    }

    /// Registers a new account. The backend answers with either a JSON object
    /// or a plain-text message.
    pub async fn register(&self, registration: &Registration) -> ApiResult<RegisterOutcome> {
        let path = "/register";
        log::debug!("POST {path}");
        let builder = Self::json_body(self.http.post(self.url(path)), registration)?;
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            log::warn!("{path}: status {status}: {text}");
            return Ok(RegisterOutcome::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }
        let auth = match serde_json::from_str::<AuthResponse>(&text) {
            Ok(auth) => auth,
            Err(_) => AuthResponse {
                token: None,
                message: Some(text),
                email_sent: None,
            },
        };
        Ok(RegisterOutcome::Created(auth))
    }

    pub async fn me(&self) -> ApiResult<UserInfo> {
        self.get_json("/me").await
    }

    pub async fn my_products(&self) -> ApiResult<Vec<Product>> {
        self.get_json("/me/products").await
    }
}
