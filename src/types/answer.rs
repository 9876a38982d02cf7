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

use crate::error::Fallible;

/// Marks a correct answer in the legacy format.
const CHECK_MARK: &str = "(✓)";

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A learner's mark on one answer: not sure yet, correct, or wrong.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Verdict {
    #[default]
    Unknown,
    Yes,
    No,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Unknown, Verdict::Yes, Verdict::No];

    /// Form value.
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Unknown => "unknown",
            Verdict::Yes => "yes",
            Verdict::No => "no",
        }
    }

    /// Unrecognized values are unknown.
    pub fn parse(value: &str) -> Self {
        match value {
            "yes" => Verdict::Yes,
            "no" => Verdict::No,
            _ => Verdict::Unknown,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Verdict::Unknown => "?",
            Verdict::Yes => "✓",
            Verdict::No => "✗",
        }
    }
}

/// How a card's `answer` field was encoded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnswerFormat {
    /// A JSON array of `{text, isCorrect}` objects.
    Json,
    /// One answer per line, `N. text (✓)`.
    Legacy,
}

/// The parsed answers of a learning card.
///
/// Every place that reads a card's `answer` field goes through
/// [`AnswerSet::parse`], which accepts both encodings and never fails.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AnswerSet {
    answers: Vec<Answer>,
    format: AnswerFormat,
}

impl AnswerSet {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers,
            format: AnswerFormat::Json,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Vec<Answer>>(raw) {
            Ok(answers) => Self {
                answers,
                format: AnswerFormat::Json,
            },
            Err(_) => Self {
                answers: parse_legacy(raw),
                format: AnswerFormat::Legacy,
            },
        }
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn format(&self) -> AnswerFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn to_json(&self) -> Fallible<String> {
        Ok(serde_json::to_string(&self.answers)?)
    }

    pub fn to_legacy(&self) -> String {
        self.answers
            .iter()
            .enumerate()
            .map(|(i, a)| {
                if a.is_correct {
                    format!("{}. {} {CHECK_MARK}", i + 1, a.text)
                } else {
                    format!("{}. {}", i + 1, a.text)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether every correct answer is marked yes and every other answer no.
    /// Missing verdicts count as unknown.
    pub fn check(&self, verdicts: &[Verdict]) -> bool {
        self.answers.iter().enumerate().all(|(i, answer)| {
            match verdicts.get(i).copied().unwrap_or_default() {
                Verdict::Yes => answer.is_correct,
                Verdict::No => !answer.is_correct,
                Verdict::Unknown => false,
            }
        })
    }

    /// Texts of the answers marked yes, in the numbered line form
    /// (`1. text`) the backend scores exam submissions against.
    pub fn submission(&self, verdicts: &[Verdict]) -> Vec<String> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(i, _)| verdicts.get(*i) == Some(&Verdict::Yes))
            .map(|(i, answer)| format!("{}. {}", i + 1, answer.text))
            .collect()
    }

    /// One-line summary for tables: `✓ a | • b`.
    pub fn summary(&self) -> String {
        self.answers
            .iter()
            .map(|a| {
                if a.is_correct {
                    format!("✓ {}", a.text)
                } else {
                    format!("• {}", a.text)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn parse_legacy(raw: &str) -> Vec<Answer> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = strip_numbering(line);
            let is_correct = line.contains(CHECK_MARK);
            let text = line.trim_end();
            let text = text.strip_suffix(CHECK_MARK).unwrap_or(text).trim();
            Answer::new(text, is_correct)
        })
        .filter(|answer| !answer.text.is_empty())
        .collect()
}

/// Strips a leading `N.` and the whitespace after it.
fn strip_numbering(line: &str) -> &str {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix('.') {
            return rest.trim_start();
        }
    }
    line
}
