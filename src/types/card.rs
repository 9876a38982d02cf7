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

use crate::types::answer::AnswerSet;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LearningCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub question: String,
    /// Either a JSON answer array or the legacy line format.
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl LearningCard {
    pub fn answers(&self) -> AnswerSet {
        AnswerSet::parse(&self.answer)
    }

    /// Missing or out-of-range difficulties display as 1.
    pub fn difficulty(&self) -> u8 {
        match self.difficulty {
            Some(d) if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) => d,
            _ => MIN_DIFFICULTY,
        }
    }

    pub fn difficulty_stars(&self) -> String {
        stars(self.difficulty())
    }
}

/// `★★☆☆☆` for 2.
pub fn stars(difficulty: u8) -> String {
    let filled = difficulty.min(MAX_DIFFICULTY) as usize;
    let mut s = "★".repeat(filled);
    s.push_str(&"☆".repeat(MAX_DIFFICULTY as usize - filled));
    s
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Topic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct StrokeCount {
    pub number: i64,
}

/// A recorded review attempt against a card.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct StrokePost {
    /// RFC 3339 timestamp in UTC.
    pub tstamp: String,
    pub comment: String,
    pub memorycard_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(1), "★☆☆☆☆");
        assert_eq!(stars(5), "★★★★★");
    }

    #[test]
    fn test_difficulty_default() {
        let card = LearningCard::default();
        assert_eq!(card.difficulty(), 1);
        let card = LearningCard {
            difficulty: Some(9),
            ..LearningCard::default()
        };
        assert_eq!(card.difficulty(), 1);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"id":3,"title":"t","question":"q","answer":"1. a (✓)","imageId":7,"difficulty":4}"#;
        let card: LearningCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, Some(3));
        assert_eq!(card.image_id, Some(7));
        assert_eq!(card.difficulty_stars(), "★★★★☆");
        assert_eq!(card.answers().correct_count(), 1);
    }

    #[test]
    fn test_serialize_skips_missing() {
        let card = LearningCard {
            title: "t".to_string(),
            question: "q".to_string(),
            answer: "[]".to_string(),
            ..LearningCard::default()
        };
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, r#"{"title":"t","question":"q","answer":"[]"}"#);
    }
}
