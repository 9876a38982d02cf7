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


use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Instant;

use axum::response::Redirect;

use crate::api::ApiClient;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::i18n::Language;
use crate::i18n::Text;
use crate::i18n::t;
use crate::materials::MaterialList;
use crate::notice::Notice;
use crate::notice::NoticeSlot;
use crate::session::Session;
use crate::storage::LocalStorage;

#[derive(Clone)]
pub struct ServerState {
    pub language: Language,
    pub backend_url: String,
    pub page_size: usize,
    pub storage: LocalStorage,
    pub materials: Arc<Mutex<MaterialList>>,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    pub notices: NoticeSlot,
    /// When the running session of each open assessment began.
    pub attempts: HashMap<i64, Instant>,
}

impl ServerState {
    pub fn new(
        language: Language,
        backend_url: &str,
        page_size: usize,
        storage: LocalStorage,
    ) -> Self {
        Self {
            language,
            backend_url: backend_url.to_string(),
            page_size,
            storage,
            materials: Arc::new(Mutex::new(MaterialList::new(page_size))),
            mutable: Arc::new(Mutex::new(MutableState {
                notices: NoticeSlot::default(),
                attempts: HashMap::new(),
            })),
        }
    }

    pub fn t(&self, text: Text) -> &'static str {
        t(self.language, text)
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, MutableState>> {
        self.mutable
            .lock()
            .map_err(|_| ErrorReport::new("server state lock poisoned."))
    }

    pub fn notify(&self, notice: Notice) {
        match self.acquire() {
            Ok(mut mutable) => mutable.notices.push(notice),
            Err(e) => log::error!("{e}"),
        }
    }

    pub fn take_notice(&self) -> Option<Notice> {
        match self.acquire() {
            Ok(mut mutable) => mutable.notices.take(),
            Err(e) => {
                log::error!("{e}");
                None
            }
        }
    }

    /// Seconds the session of assessment `id` has been running, starting
    /// the clock on the first call.
    pub fn attempt_seconds(&self, id: i64) -> u64 {
        match self.acquire() {
            Ok(mut mutable) => mutable
                .attempts
                .entry(id)
                .or_insert_with(Instant::now)
                .elapsed()
                .as_secs(),
            Err(e) => {
                log::error!("{e}");
                0
            }
        }
    }

    /// Stops the clock of assessment `id` and returns the seconds spent.
    pub fn end_attempt(&self, id: i64) -> u64 {
        match self.acquire() {
            Ok(mut mutable) => mutable
                .attempts
                .remove(&id)
                .map(|start| start.elapsed().as_secs())
                .unwrap_or(0),
            Err(e) => {
                log::error!("{e}");
                0
            }
        }
    }

    pub fn session(&self) -> Option<Session> {
        match Session::current(&self.storage) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not read the session: {e}");
                None
            }
        }
    }

    /// The current session and a client authenticated with its token, or a
    /// redirect to the sign-in page.
    pub fn signed_in(&self) -> Result<(Session, ApiClient), Redirect> {
        match self.session() {
            Some(session) => {
                let client = ApiClient::new(&self.backend_url).with_token(session.token.clone());
                Ok((session, client))
            }
            None => Err(Redirect::to("/")),
        }
    }

    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(&self.backend_url)
    }

    /// Forgets the session and every piece of view state.
    pub fn sign_out(&self) -> Fallible<()> {
        Session::clear(&self.storage)?;
        self.acquire()?.attempts.clear();
        let mut materials = self
            .materials
            .lock()
            .map_err(|_| ErrorReport::new("material list lock poisoned."))?;
        *materials = MaterialList::new(self.page_size);
        Ok(())
    }
}
