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


use maud::Markup;
use maud::html;

/// Milliseconds before the script dismisses a notice.
pub const NOTICE_TIMEOUT_MS: u32 = 3000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NoticeKind {
    pub fn icon(self) -> &'static str {
        match self {
            NoticeKind::Success => "✓",
            NoticeKind::Error => "✗",
            NoticeKind::Warning => "⚠",
            NoticeKind::Info => "ℹ",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
            NoticeKind::Warning => "notice-warning",
            NoticeKind::Info => "notice-info",
        }
    }
}

/// A transient message shown once, on the next page render.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            div .notice .(self.kind.class()) data-timeout=(NOTICE_TIMEOUT_MS) role="status" {
                span.notice-icon { (self.kind.icon()) }
                span.notice-message { (self.message) }
            }
        }
    }
}

/// Holds at most one pending notice. A newer notice replaces an older one.
#[derive(Default, Debug)]
pub struct NoticeSlot {
    pending: Option<Notice>,
}

impl NoticeSlot {
    pub fn push(&mut self, notice: Notice) {
        self.pending = Some(notice);
    }

    pub fn take(&mut self) -> Option<Notice> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes() {
        let html = Notice::error("<b>bad</b>").render().into_string();
        assert!(html.contains("notice-error"));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("data-timeout=\"3000\""));
    }

    #[test]
    fn test_slot_keeps_latest() {
        let mut slot = NoticeSlot::default();
        slot.push(Notice::info("first"));
        slot.push(Notice::success("second"));
        assert_eq!(slot.take(), Some(Notice::success("second")));
        assert_eq!(slot.take(), None);
    }
}
