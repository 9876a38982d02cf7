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

use crate::error::Fallible;
use crate::storage::LocalStorage;

const TOKEN_KEY: &str = "authToken";
const USERNAME_KEY: &str = "username";

/// The signed-in user: a bearer token plus the name it was issued for.
#[derive(Clone, PartialEq, Debug)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    /// The current session, if both the token and the username are stored.
    pub fn current(storage: &LocalStorage) -> Fallible<Option<Session>> {
        let token = storage.get_item(TOKEN_KEY)?;
        let username = storage.get_item(USERNAME_KEY)?;
        match (token, username) {
            (Some(token), Some(username)) if !token.is_empty() => {
                Ok(Some(Session { token, username }))
            }
            _ => Ok(None),
        }
    }

    pub fn store(storage: &LocalStorage, token: &str, username: &str) -> Fallible<Session> {
        storage.set_item(TOKEN_KEY, token)?;
        storage.set_item(USERNAME_KEY, username)?;
        log::debug!("Stored session for {username}");
        Ok(Session {
            token: token.to_string(),
            username: username.to_string(),
        })
    }

    /// Sign out: wipes all of local storage.
    pub fn clear(storage: &LocalStorage) -> Fallible<()> {
        log::debug!("Clearing session");
        storage.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_session() -> Fallible<()> {
        let storage = LocalStorage::in_memory()?;
        assert_eq!(Session::current(&storage)?, None);
        Ok(())
    }

    #[test]
    fn test_token_without_username() -> Fallible<()> {
        let storage = LocalStorage::in_memory()?;
        storage.set_item("authToken", "abc")?;
        assert_eq!(Session::current(&storage)?, None);
        Ok(())
    }

    #[test]
    fn test_store_and_clear() -> Fallible<()> {
        let storage = LocalStorage::in_memory()?;
        Session::store(&storage, "abc", "alice")?;
        let session = Session::current(&storage)?.unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.username, "alice");
        storage.set_item("other", "x")?;
        Session::clear(&storage)?;
        assert_eq!(Session::current(&storage)?, None);
        assert_eq!(storage.get_item("other")?, None);
        Ok(())
    }
}
