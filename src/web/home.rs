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


use axum::extract::State;
use axum::response::Html;
use maud::html;

use crate::i18n::Text;
use crate::web::auth::login_page;
use crate::web::state::ServerState;
use crate::web::template::app_page;

/// The login page without a session, the welcome page with one.
pub async fn root(State(state): State<ServerState>) -> Html<String> {
    let (session, client) = match state.signed_in() {
        Ok(pair) => pair,
        Err(_) => return login_page(&state),
    };
    let content = html! {
        p.welcome {
            (state.t(Text::Welcome)) ", " (session.username) "!"
        }
    };
    app_page(&state, &session, &client, state.t(Text::Home), content).await
}
