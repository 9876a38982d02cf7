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


use axum::response::Html;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;

use crate::api::ApiClient;
use crate::api::ApiError;
use crate::i18n::Language;
use crate::i18n::Text;
use crate::i18n::t;
use crate::notice::Notice;
use crate::permissions::MenuVisibility;
use crate::permissions::Permissions;
use crate::permissions::Products;
use crate::session::Session;
use crate::types::answer::Verdict;
use crate::types::timestamp::LocalDateTime;
use crate::web::state::ServerState;

pub fn page_template(lang: Language, notice: Option<Notice>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang.code()) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (t(lang, Text::AppTitle)) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                div #notices {
                    @if let Some(notice) = notice {
                        (notice.render())
                    }
                }
                (body)
                script src="/script.js" {};
            }
        }
    }
}

/// Menu flags for the signed-in user. Any failed lookup hides everything.
pub async fn menu_visibility(client: &ApiClient) -> MenuVisibility {
    let user = match client.me().await {
        Ok(user) => user,
        Err(e) => {
            log::warn!("Could not load the current user: {e}");
            return MenuVisibility::hidden();
        }
    };
    let products = match client.my_products().await {
        Ok(products) => products,
        Err(e) => {
            log::warn!("Could not load the product list: {e}");
            return MenuVisibility::hidden();
        }
    };
    MenuVisibility::compute(&Permissions::new(user.permissions), &Products::new(&products))
}

fn menu(lang: Language, visible: &MenuVisibility) -> Markup {
    let tr = |text| t(lang, text);
    html! {
        nav.menu {
            ul {
                li { a href="/" { (tr(Text::Home)) } }
                @if visible.cards {
                    li.section { (tr(Text::CardsMenu)) }
                    li { a href="/cards" { (tr(Text::Learn)) } }
                    li { a href="/cards/manage" { (tr(Text::ManageCards)) } }
                    li { a href="/cards/new" { (tr(Text::NewCard)) } }
                    li { a href="/topics" { (tr(Text::Topics)) } }
                    li { a href="/exams" { (tr(Text::Exams)) } }
                    li { a href="/assessments" { (tr(Text::Assessments)) } }
                    li { a href="/my-exams" { (tr(Text::TakeExams)) } }
                }
                @if visible.images {
                    li { a href="/images" { (tr(Text::Images)) } }
                }
                @if visible.materials {
                    li { a href="/materials" { (tr(Text::Materials)) } }
                }
                @if visible.management {
                    li.section { (tr(Text::Management)) }
                    @if visible.user_management {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::UserManagement)) }
                    }
                    @if visible.group_management {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::GroupManagement)) }
                    }
                    @if visible.role_management {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::RoleManagement)) }
                    }
                    @if visible.product_management {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::ProductManagement)) }
                    }
                    @if visible.technical_info {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::TechnicalInfo)) }
                    }
                    @if visible.storage_migration {
                        li.external title=(tr(Text::ManagedElsewhere)) { (tr(Text::StorageMigration)) }
                    }
                }
            }
        }
    }
}

/// Renders a page of the signed-in application: header, menu, pending
/// notice and `content`.
pub async fn app_page(
    state: &ServerState,
    session: &Session,
    client: &ApiClient,
    heading: &str,
    content: Markup,
) -> Html<String> {
    let lang = state.language;
    let visible = menu_visibility(client).await;
    let body = html! {
        div.app {
            header.topbar {
                span.brand { (t(lang, Text::AppTitle)) }
                div.spacer {}
                span.user { (t(lang, Text::LoggedInAs)) " " strong { (session.username) } }
                form action="/logout" method="post" {
                    input type="submit" value=(t(lang, Text::Logout));
                }
            }
            div.layout {
                (menu(lang, &visible))
                main #content {
                    h1 { (heading) }
                    (content)
                }
            }
        }
    };
    Html(page_template(lang, state.take_notice(), body).into_string())
}

/// Inline error shown in place of a view's content.
pub fn error_box(lang: Language, err: &ApiError) -> Markup {
    html! {
        div.error-message {
            (err.message(lang))
        }
    }
}

/// A date and time for display; unknown when the backend sent none.
pub fn show_time(lang: Language, time: Option<LocalDateTime>) -> String {
    match time {
        Some(time) => time.to_string(),
        None => t(lang, Text::Unknown).to_string(),
    }
}

/// The three radio buttons (?, ✓, ✗) a learner marks one answer with.
pub fn verdict_choices(name: &str, chosen: Verdict) -> Markup {
    html! {
        span.verdicts {
            @for verdict in Verdict::ALL {
                label.verdict {
                    input type="radio" name=(name) value=(verdict.as_str()) checked[verdict == chosen];
                    (verdict.symbol())
                }
            }
        }
    }
}

/// A POST form with a single button. With `confirm`, the script asks before
/// submitting.
pub fn action_button(action: &str, label: &str, confirm: Option<&str>) -> Markup {
    html! {
        form.inline action=(action) method="post" data-confirm=[confirm] {
            input type="submit" value=(label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_choices() {
        let html = verdict_choices("answer_1", Verdict::No).into_string();
        assert!(html.contains("name=\"answer_1\" value=\"unknown\">"));
        assert!(html.contains("name=\"answer_1\" value=\"no\" checked>"));
    }

    #[test]
    fn test_show_time() -> crate::error::Fallible<()> {
        let time = LocalDateTime::parse("2025-03-01T09:00")?;
        assert_eq!(show_time(Language::En, Some(time)), "01.03.2025 09:00");
        assert_eq!(show_time(Language::De, None), "Unbekannt");
        Ok(())
    }

    #[test]
    fn test_menu_hidden() {
        let html = menu(Language::En, &MenuVisibility::hidden()).into_string();
        assert!(html.contains("href=\"/\""));
        assert!(!html.contains("/cards"));
        assert!(!html.contains("/materials"));
    }

    #[test]
    fn test_menu_admin_entries_have_no_links() {
        let visible = MenuVisibility {
            management: true,
            user_management: true,
            technical_info: true,
            ..MenuVisibility::hidden()
        };
        let html = menu(Language::En, &visible).into_string();
        assert!(html.contains("Users"));
        assert!(html.contains("Technical information"));
        assert!(!html.contains("Roles"));
    }

    #[test]
    fn test_action_button_confirm() {
        let html = action_button("/cards/1/delete", "Delete", Some("Sure?")).into_string();
        assert!(html.contains("data-confirm=\"Sure?\""));
        let html = action_button("/x", "Go", None).into_string();
        assert!(!html.contains("data-confirm"));
    }

    #[test]
    fn test_page_template_shows_notice() {
        let html = page_template(Language::De, Some(Notice::success("ok")), html! {}).into_string();
        assert!(html.contains("lang=\"de\""));
        assert!(html.contains("notice-success"));
    }
}
