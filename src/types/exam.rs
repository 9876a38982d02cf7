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

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub duration_in_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Exam {
    pub fn minutes(&self) -> u64 {
        self.duration_in_seconds / 60
    }

    pub fn seconds(&self) -> u64 {
        self.duration_in_seconds % 60
    }
}

/// An exam together with the number of cards assigned to it. The backend
/// does not report the count; it is derived by listing the exam's cards.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ExamSummary {
    pub exam: Exam,
    pub card_count: Option<usize>,
}

/// `42s`, `3m 5s`, `1h 2m`.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(185), "3m 5s");
        assert_eq!(format_duration(3720), "1h 2m");
    }

    #[test]
    fn test_minutes_seconds() {
        let exam = Exam {
            duration_in_seconds: 125,
            ..Exam::default()
        };
        assert_eq!(exam.minutes(), 2);
        assert_eq!(exam.seconds(), 5);
    }

    #[test]
    fn test_wire_format() {
        let exam = Exam {
            name: "Final".to_string(),
            duration_in_seconds: 600,
            ..Exam::default()
        };
        let json = serde_json::to_string(&exam).unwrap();
        assert_eq!(json, r#"{"name":"Final","durationInSeconds":600}"#);
    }
}
