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
mod auth;
mod cards;
mod exams;
mod images;
mod materials;
mod topics;

pub use auth::RegisterOutcome;

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::i18n::Language;
use crate::i18n::Text;
use crate::i18n::t;

/// Characters left as-is in path segments and query values.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Failure of a backend call, classified by HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("invalid parameters")]
    InvalidParameters,
    #[error("not authorized")]
    NotAuthorized,
    #[error("not found")]
    NotFound,
    #[error("request failed with status {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("not signed in")]
    MissingToken,
}

impl ApiError {
    /// Classifies a status code. Successful statuses yield `None`.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        if status.is_success() {
            return None;
        }
        let err = match status.as_u16() {
            400 => ApiError::InvalidParameters,
            401 | 403 => ApiError::NotAuthorized,
            404 => ApiError::NotFound,
            code => ApiError::Status {
                status: code,
                reason: status.canonical_reason().unwrap_or("").to_string(),
            },
        };
        Some(err)
    }

    /// The localized message shown to the user.
    pub fn message(&self, lang: Language) -> String {
        match self {
            ApiError::InvalidParameters => t(lang, Text::InvalidParameters).to_string(),
            ApiError::NotAuthorized => t(lang, Text::NotAuthorized).to_string(),
            ApiError::NotFound => t(lang, Text::ResourceNotFound).to_string(),
            ApiError::Status { status, reason } => {
                format!("{} ({status} {reason})", t(lang, Text::NetworkError))
            }
            ApiError::Transport(_) => t(lang, Text::NetworkError).to_string(),
            ApiError::Decode(_) => t(lang, Text::InvalidResponse).to_string(),
            ApiError::MissingToken => t(lang, Text::NotSignedIn).to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::Decode(value.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Raw bytes fetched from a content endpoint.
#[derive(Clone, Debug)]
pub struct Download {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Client for the REST backend. Authenticated calls carry the session token
/// as a bearer header.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> ApiResult<RequestBuilder> {
        match &self.token {
            Some(token) => Ok(builder.header(AUTHORIZATION, format!("Bearer {token}"))),
            None => Err(ApiError::MissingToken),
        }
    }

    /// Sends a request and classifies a non-2xx status.
    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> ApiResult<Response> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                log::warn!("{endpoint}: {err}");
                return Err(err);
            }
        };
        match ApiError::from_status(response.status()) {
            None => Ok(response),
            Some(err) => {
                log::warn!("{endpoint}: {err}");
                Err(err)
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> ApiResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let err = ApiError::from(e);
            log::warn!("{endpoint}: {err}");
            err
        })
    }

    fn json_body<B: Serialize>(builder: RequestBuilder, body: &B) -> ApiResult<RequestBuilder> {
        let bytes = serde_json::to_vec(body)?;
        Ok(builder.header(CONTENT_TYPE, "application/json").body(bytes))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        log::debug!("GET {path}");
        let builder = self.authorize(self.http.get(self.url(path)))?;
        let response = self.send(builder, path).await?;
        Self::decode(response, path).await
    }

    async fn get_bytes(&self, path: &str) -> ApiResult<Download> {
        log::debug!("GET {path}");
        let builder = self.authorize(self.http.get(self.url(path)))?;
        let response = self.send(builder, path).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            content_type,
            bytes,
        })
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<Response> {
        log::debug!("POST {path}");
        let builder = self.authorize(self.http.post(self.url(path)))?;
        let builder = Self::json_body(builder, body)?;
        self.send(builder, path).await
    }

    async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        log::debug!("PUT {path}");
        let builder = self.authorize(self.http.put(self.url(path)))?;
        let builder = Self::json_body(builder, body)?;
        self.send(builder, path).await?;
        Ok(())
    }

    async fn post_empty(&self, path: &str) -> ApiResult<()> {
        log::debug!("POST {path}");
        let builder = self.authorize(self.http.post(self.url(path)))?;
        self.send(builder, path).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        log::debug!("DELETE {path}");
        let builder = self.authorize(self.http.delete(self.url(path)))?;
        self.send(builder, path).await?;
        Ok(())
    }
}

/// Percent-encodes a path segment or query value.
pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(ApiError::from_status(StatusCode::OK), None);
        assert_eq!(ApiError::from_status(StatusCode::NO_CONTENT), None);
        assert_eq!(
            ApiError::from_status(StatusCode::BAD_REQUEST),
            Some(ApiError::InvalidParameters)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            Some(ApiError::NotAuthorized)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::FORBIDDEN),
            Some(ApiError::NotAuthorized)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND),
            Some(ApiError::NotFound)
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            Some(ApiError::Status {
                status: 500,
                reason: "Internal Server Error".to_string()
            })
        );
    }

    #[test]
    fn test_message() {
        let err = ApiError::Status {
            status: 502,
            reason: "Bad Gateway".to_string(),
        };
        assert_eq!(err.message(Language::En), "Network error (502 Bad Gateway)");
        assert_eq!(
            ApiError::NotAuthorized.message(Language::De),
            "Nicht autorisiert"
        );
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("a b/c"), "a%20b%2Fc");
        assert_eq!(encode("photo-1.png"), "photo-1.png");
        assert_eq!(encode("Prüfung"), "Pr%C3%BCfung");
    }

    #[test]
    fn test_missing_token() {
        let client = ApiClient::new("http://localhost:1/");
        assert_eq!(client.base_url, "http://localhost:1");
        let builder = client.http.get(client.url("/me"));
        assert!(matches!(
            client.authorize(builder),
            Err(ApiError::MissingToken)
        ));
    }
}
