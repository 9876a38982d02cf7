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

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::types::timestamp::LocalDateTime;
use crate::types::timestamp::deserialize_lenient;

/// A scheduled sitting of an exam within a time window.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub exam_id: i64,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub start_time: Option<LocalDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub end_time: Option<LocalDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Where the signed-in participant stands in an assessment.
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    Assigned,
    Started,
    Paused,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// An assessment as offered to the participant, with their progress.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserAssessment {
    pub id: i64,
    pub name: String,
    pub exam_id: i64,
    #[serde(default)]
    pub exam_name: String,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub start_time: Option<LocalDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub end_time: Option<LocalDateTime>,
    pub status: AttemptStatus,
    /// Exam duration in seconds.
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub card_count: u64,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub actual_start_time: Option<LocalDateTime>,
    /// Time spent in earlier, paused sessions.
    #[serde(default)]
    pub time_spent_seconds: u64,
}

impl UserAssessment {
    /// Inside the time window. Unknown bounds do not restrict.
    pub fn is_open(&self, now: LocalDateTime) -> bool {
        self.start_time.is_none_or(|start| start <= now) && self.end_time.is_none_or(|end| now <= end)
    }

    pub fn can_start(&self, now: LocalDateTime) -> bool {
        self.status == AttemptStatus::Assigned && self.is_open(now)
    }

    pub fn can_continue(&self, now: LocalDateTime) -> bool {
        matches!(self.status, AttemptStatus::Started | AttemptStatus::Paused) && self.is_open(now)
    }

    pub fn has_result(&self) -> bool {
        self.status == AttemptStatus::Completed
    }

    /// Seconds left for a session that has been running for `session`
    /// seconds: the rest of the duration, capped by the end of the window.
    pub fn remaining_seconds(&self, now: LocalDateTime, session: u64) -> u64 {
        let spent = self.time_spent_seconds.saturating_add(session);
        let left = self.duration.saturating_sub(spent);
        match self.end_time {
            Some(end) => left.min(end.seconds_since(now).unwrap_or(0)),
            None => left,
        }
    }
}

/// The score of a submitted assessment.
#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    #[serde(default)]
    pub id: Option<i64>,
    pub assessment_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub started_at: Option<LocalDateTime>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub completed_at: Option<LocalDateTime>,
    pub total_questions: u64,
    pub correct_answers: u64,
    pub incorrect_answers: u64,
    pub score_percentage: f64,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

/// Body of the pause request: seconds spent in the session being paused.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PauseRequest {
    pub time_spent_seconds: u64,
}

/// Submitted answers: card id to the answers marked correct.
pub type Submission = BTreeMap<String, Vec<String>>;

/// `1:05:09` or `5:09`.
pub fn format_clock(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
