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


use axum::Form;
use axum::extract::State;
use axum::response::Html;
use axum::response::Redirect;
use maud::html;

use crate::api::ApiError;
use crate::api::RegisterOutcome;
use crate::forms::LoginForm;
use crate::forms::RegistrationForm;
use crate::forms::classify_registration_error;
use crate::i18n::Text;
use crate::notice::Notice;
use crate::session::Session;
use crate::web::state::ServerState;
use crate::web::template::page_template;

pub fn login_page(state: &ServerState) -> Html<String> {
    let tr = |text| state.t(text);
    let body = html! {
        div.login {
            h1 { (tr(Text::AppTitle)) }
            div.login-forms {
                form #login-form action="/login" method="post" {
                    h2 { (tr(Text::Login)) }
                    label { (tr(Text::Username)) input type="text" name="username" autocomplete="username"; }
                    label { (tr(Text::Password)) input type="password" name="password" autocomplete="current-password"; }
                    input type="submit" value=(tr(Text::Login));
                }
                form #register-form action="/register" method="post" {
                    h2 { (tr(Text::Register)) }
                    label { (tr(Text::Username)) input type="text" name="username"; }
                    label { (tr(Text::Email)) input type="email" name="email"; }
                    label { (tr(Text::Password)) input type="password" name="password" autocomplete="new-password"; }
                    label { (tr(Text::ConfirmPassword)) input type="password" name="confirm_password" autocomplete="new-password"; }
                    input type="submit" value=(tr(Text::Register));
                }
            }
        }
    };
    Html(page_template(state.language, state.take_notice(), body).into_string())
}

pub async fn login(State(state): State<ServerState>, Form(form): Form<LoginForm>) -> Redirect {
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(e) => {
            state.notify(Notice::warning(e.message(state.language)));
            return Redirect::to("/");
        }
    };
    match state.anonymous_client().login(&credentials).await {
        Ok(auth) => {
            let token = auth.token.unwrap_or_default();
            match Session::store(&state.storage, &token, &credentials.username) {
                Ok(_) => state.notify(Notice::success(state.t(Text::LoginSuccessful))),
                Err(e) => {
                    log::error!("Could not store the session: {e}");
                    state.notify(Notice::error(state.t(Text::LoginFailedTryLater)));
                }
            }
        }
        Err(ApiError::NotAuthorized) | Err(ApiError::InvalidParameters) => {
            state.notify(Notice::error(state.t(Text::LoginFailedCheckCredentials)));
        }
        Err(e) => {
            log::warn!("Login failed: {e}");
            state.notify(Notice::error(state.t(Text::LoginFailedTryLater)));
        }
    }
    Redirect::to("/")
}

pub async fn register(
    State(state): State<ServerState>,
    Form(form): Form<RegistrationForm>,
) -> Redirect {
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(e) => {
            state.notify(Notice::warning(e.message(state.language)));
            return Redirect::to("/");
        }
    };
    match state.anonymous_client().register(&registration).await {
        Ok(RegisterOutcome::Created(auth)) => {
            if let Some(token) = auth.token.filter(|t| !t.is_empty()) {
                match Session::store(&state.storage, &token, &registration.username) {
                    Ok(_) => state.notify(Notice::success(state.t(Text::RegistrationSuccessful))),
                    Err(e) => {
                        log::error!("Could not store the session: {e}");
                        state.notify(Notice::error(state.t(Text::RegistrationFailedTryLater)));
                    }
                }
            } else {
                let text = match auth.email_sent {
                    Some(true) => Text::RegistrationEmailVerification,
                    Some(false) => Text::RegistrationEmailFailed,
                    None => Text::RegistrationSuccessful,
                };
                state.notify(Notice::success(state.t(text)));
            }
        }
        Ok(RegisterOutcome::Rejected { message, .. }) => {
            let err = classify_registration_error(&message);
            state.notify(Notice::error(err.message(state.language)));
        }
        Err(e) => {
            log::warn!("Registration failed: {e}");
            state.notify(Notice::error(state.t(Text::RegistrationFailedTryLater)));
        }
    }
    Redirect::to("/")
}

pub async fn logout(State(state): State<ServerState>) -> Redirect {
    match state.sign_out() {
        Ok(()) => state.notify(Notice::info(state.t(Text::LoggedOut))),
        Err(e) => log::error!("Could not clear the session: {e}"),
    }
    Redirect::to("/")
}
