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
use thiserror::Error;

use crate::i18n::Language;
use crate::i18n::Text;
use crate::i18n::t;
use crate::types::answer::Answer;
use crate::types::answer::AnswerSet;
use crate::types::answer::Verdict;
use crate::types::assessment::Assessment;
use crate::types::card::LearningCard;
use crate::types::card::MAX_DIFFICULTY;
use crate::types::card::MIN_DIFFICULTY;
use crate::types::card::Topic;
use crate::types::exam::Exam;
use crate::types::image::split_file_name;
use crate::types::timestamp::LocalDateTime;
use crate::types::user::Credentials;
use crate::types::user::Registration;

pub const MIN_ANSWERS: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A form that failed validation. Nothing is sent to the backend.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("name is required")]
    MissingName,
    #[error("title is required")]
    MissingTitle,
    #[error("question is required")]
    MissingQuestion,
    #[error("topic is required")]
    MissingTopic,
    #[error("at least two answers are required")]
    TooFewAnswers,
    #[error("at least one answer must be correct")]
    NoCorrectAnswer,
    #[error("difficulty must be between 1 and 5")]
    InvalidDifficulty,
    #[error("duration must be positive")]
    MissingDuration,
    #[error("duration is too long")]
    InvalidDuration,
    #[error("exam is required")]
    MissingExam,
    #[error("invalid time frame")]
    InvalidTimeframe,
    #[error("end must be after start")]
    EndNotAfterStart,
    #[error("no file chosen")]
    MissingFile,
    #[error("username and password are required")]
    MissingCredentials,
    #[error("all fields are required")]
    MissingFields,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password is too short")]
    PasswordTooShort,
    #[error("invalid email address")]
    InvalidEmail,
}

impl FormError {
    pub fn text(self) -> Text {
        match self {
            FormError::MissingName => Text::PleaseEnterName,
            FormError::MissingTitle => Text::PleaseEnterTitle,
            FormError::MissingQuestion => Text::PleaseEnterQuestion,
            FormError::MissingTopic => Text::PleaseSelectTopic,
            FormError::TooFewAnswers => Text::MinTwoAnswers,
            FormError::NoCorrectAnswer => Text::OneCorrectAnswer,
            FormError::InvalidDifficulty => Text::InvalidDifficulty,
            FormError::MissingDuration => Text::PleaseEnterDuration,
            FormError::InvalidDuration => Text::DurationTooLong,
            FormError::MissingExam => Text::PleaseSelectExam,
            FormError::InvalidTimeframe => Text::PleaseEnterValidTimeframe,
            FormError::EndNotAfterStart => Text::EndMustBeAfterStart,
            FormError::MissingFile => Text::PleaseChooseFile,
            FormError::MissingCredentials => Text::PleaseEnterCredentials,
            FormError::MissingFields => Text::PleaseFillAllFields,
            FormError::PasswordMismatch => Text::PasswordsDoNotMatch,
            FormError::PasswordTooShort => Text::PasswordMinLength,
            FormError::InvalidEmail => Text::PleaseEnterValidEmail,
        }
    }

    pub fn message(self, lang: Language) -> &'static str {
        t(lang, self.text())
    }
}

fn required(value: &str, err: FormError) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(err)
    } else {
        Ok(value.to_string())
    }
}

fn optional_id(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

// Cards.

/// The card editor. Answers arrive as indexed `answer_N` fields, with a
/// `correct_N` checkbox for each.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CardForm {
    pub title: String,
    pub question: String,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub image_id: Option<String>,
    pub answers: Vec<(String, bool)>,
}

impl CardForm {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut form = CardForm::default();
        let mut answers: Vec<(usize, String)> = Vec::new();
        let mut correct: Vec<usize> = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value.clone(),
                "question" => form.question = value.clone(),
                "topic" => form.topic = Some(value.clone()),
                "difficulty" => form.difficulty = Some(value.clone()),
                "image_id" => form.image_id = Some(value.clone()),
                _ => {
                    if let Some(index) = key.strip_prefix("answer_") {
                        if let Ok(index) = index.parse() {
                            answers.push((index, value.clone()));
                        }
                    } else if let Some(index) = key.strip_prefix("correct_") {
                        if let Ok(index) = index.parse() {
                            correct.push(index);
                        }
                    }
                }
            }
        }
        answers.sort_by_key(|(index, _)| *index);
        form.answers = answers
            .into_iter()
            .map(|(index, text)| (text, correct.contains(&index)))
            .collect();
        form
    }

    /// Builds the card. `existing` carries the fields the form does not edit.
    pub fn validate(&self, existing: Option<&LearningCard>) -> Result<LearningCard, FormError> {
        let title = required(&self.title, FormError::MissingTitle)?;
        let question = required(&self.question, FormError::MissingQuestion)?;
        let topic = self
            .topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if existing.is_none() && topic.is_none() {
            return Err(FormError::MissingTopic);
        }
        let answers: Vec<Answer> = self
            .answers
            .iter()
            .filter(|(text, _)| !text.trim().is_empty())
            .map(|(text, correct)| Answer::new(text.trim(), *correct))
            .collect();
        if answers.len() < MIN_ANSWERS {
            return Err(FormError::TooFewAnswers);
        }
        let answers = AnswerSet::new(answers);
        if answers.correct_count() == 0 {
            return Err(FormError::NoCorrectAnswer);
        }
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => MIN_DIFFICULTY,
            Some(d) => match d.parse::<u8>() {
                Ok(d) if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&d) => d,
                _ => return Err(FormError::InvalidDifficulty),
            },
        };
        let answer = answers.to_json().map_err(|_| FormError::TooFewAnswers)?;
        let mut card = existing.cloned().unwrap_or_default();
        card.title = title;
        card.question = question;
        card.answer = answer;
        card.difficulty = Some(difficulty);
        if topic.is_some() {
            card.category = topic;
        }
        card.image_id = optional_id(self.image_id.as_deref());
        Ok(card)
    }
}

// Self-check and exam answers.

/// Reads the verdicts posted as `{prefix}{index}` fields, one per answer.
/// Missing fields and indices past `count` are ignored.
pub fn verdicts_from_pairs(pairs: &[(String, String)], prefix: &str, count: usize) -> Vec<Verdict> {
    let mut verdicts = vec![Verdict::Unknown; count];
    for (key, value) in pairs {
        let index = key
            .strip_prefix(prefix)
            .and_then(|index| index.parse::<usize>().ok());
        if let Some(slot) = index.and_then(|index| verdicts.get_mut(index)) {
            *slot = Verdict::parse(value);
        }
    }
    verdicts
}

// Exams.

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct ExamForm {
    pub name: String,
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub seconds: String,
}

impl ExamForm {
    pub fn validate(&self, existing: Option<&Exam>) -> Result<Exam, FormError> {
        let name = required(&self.name, FormError::MissingName)?;
        let minutes = parse_count(&self.minutes)?;
        let seconds = parse_count(&self.seconds)?;
        let total = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or(FormError::InvalidDuration)?;
        if total == 0 {
            return Err(FormError::MissingDuration);
        }
        let exam = match existing {
            Some(exam) => Exam {
                name,
                duration_in_seconds: total,
                ..exam.clone()
            },
            None => Exam {
                id: None,
                name,
                duration_in_seconds: total,
                created_by: None,
                group_id: None,
                created_at: None,
                updated_at: None,
            },
        };
        Ok(exam)
    }
}

fn parse_count(value: &str) -> Result<u64, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse().map_err(|_| FormError::MissingDuration)
}

// Assessments.

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct AssessmentForm {
    pub name: String,
    #[serde(default)]
    pub exam_id: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
}

impl AssessmentForm {
    pub fn validate(&self, existing: Option<&Assessment>) -> Result<Assessment, FormError> {
        let name = required(&self.name, FormError::MissingName)?;
        let exam_id: i64 = self
            .exam_id
            .trim()
            .parse()
            .map_err(|_| FormError::MissingExam)?;
        let start_time =
            LocalDateTime::parse(&self.start_time).map_err(|_| FormError::InvalidTimeframe)?;
        let end_time =
            LocalDateTime::parse(&self.end_time).map_err(|_| FormError::InvalidTimeframe)?;
        if end_time <= start_time {
            return Err(FormError::EndNotAfterStart);
        }
        let assessment = match existing {
            Some(a) => Assessment {
                name,
                exam_id,
                start_time: Some(start_time),
                end_time: Some(end_time),
                ..a.clone()
            },
            None => Assessment {
                id: None,
                name,
                exam_id,
                start_time: Some(start_time),
                end_time: Some(end_time),
                created_by: None,
                group_id: None,
                created_at: None,
                updated_at: None,
            },
        };
        Ok(assessment)
    }
}

// Topics.

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct TopicForm {
    pub name: String,
}

impl TopicForm {
    pub fn validate(&self, id: Option<i64>) -> Result<Topic, FormError> {
        let name = required(&self.name, FormError::MissingName)?;
        Ok(Topic { id, name })
    }
}

// Images.

/// Metadata for an uploaded image file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ImageUpload {
    pub name: String,
    pub file_name: String,
}

/// Validates an upload. A blank name defaults to the file stem.
pub fn validate_image(
    name: Option<&str>,
    file_name: &str,
    size: usize,
) -> Result<ImageUpload, FormError> {
    let file_name = file_name.trim();
    if file_name.is_empty() || size == 0 {
        return Err(FormError::MissingFile);
    }
    let (stem, _) = split_file_name(file_name);
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => stem.to_string(),
    };
    if name.is_empty() {
        return Err(FormError::MissingName);
    }
    Ok(ImageUpload {
        name,
        file_name: file_name.to_string(),
    })
}

// Authentication.

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, FormError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok(Credentials {
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<Registration, FormError> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(FormError::PasswordTooShort);
        }
        if !is_email(email) {
            return Err(FormError::InvalidEmail);
        }
        Ok(Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// `local@domain.tld`, with no whitespace and exactly one `@`.
fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Why the backend rejected a registration.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RegistrationError {
    Known(Text),
    Server(String),
}

impl RegistrationError {
    pub fn message(&self, lang: Language) -> String {
        match self {
            RegistrationError::Known(text) => t(lang, *text).to_string(),
            RegistrationError::Server(message) => message.clone(),
        }
    }
}

/// Maps a backend rejection message onto a known cause. Anything not
/// recognised is passed through.
pub fn classify_registration_error(message: &str) -> RegistrationError {
    let lower = message.to_lowercase();
    if lower.contains("exists") || lower.contains("duplicate") || lower.contains("unique") {
        RegistrationError::Known(Text::UserAlreadyExists)
    } else if lower.contains("email") {
        RegistrationError::Known(Text::PleaseEnterValidEmail)
    } else if lower.contains("password") {
        RegistrationError::Known(Text::PasswordTooWeak)
    } else if lower.contains("username") {
        RegistrationError::Known(Text::UsernameInvalid)
    } else if message.trim().is_empty() {
        RegistrationError::Known(Text::RegistrationFailed)
    } else {
        RegistrationError::Server(message.trim().to_string())
    }
}
