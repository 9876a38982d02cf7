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

use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of the login and register responses. Every field is optional:
/// a failed login has no token, older backends send no `emailSent`.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub email_sent: Option<bool>,
}

/// The signed-in user as returned by `/me`.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct UserInfo {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A user as listed for assessment assignment.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_partial() {
        let r: AuthResponse = serde_json::from_str(r#"{"emailSent":true}"#).unwrap();
        assert_eq!(r.token, None);
        assert_eq!(r.email_sent, Some(true));
    }

    #[test]
    fn test_user_info_without_permissions() {
        let u: UserInfo = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert!(u.permissions.is_empty());
    }
}
