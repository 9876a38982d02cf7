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

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::Local;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::Timelike;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Wire format for assessment times.
const BACKEND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Format of an HTML `datetime-local` input.
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// A wall-clock date and time with no timezone attached. Values are sent to
/// the backend exactly as entered, without conversion.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    /// Parses either the backend format or the `datetime-local` input format.
    /// Fractional seconds are accepted and dropped. A zoned value such as
    /// `2025-03-01T09:00:00+01:00[Europe/Vienna]` keeps its wall-clock part.
    pub fn parse(s: &str) -> Fallible<Self> {
        let s = strip_zone(s.trim());
        let dt = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, INPUT_FORMAT))
            .map_err(|_| ErrorReport::new(format!("invalid date and time: {s}")))?;
        Ok(Self(dt.with_nanosecond(0).unwrap_or(dt)))
    }

    /// The current local wall-clock time.
    pub fn now() -> Self {
        let dt = Local::now().naive_local();
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Whole seconds from `earlier` to `self`; `None` when `earlier` is later.
    pub fn seconds_since(self, earlier: Self) -> Option<u64> {
        u64::try_from((self.0 - earlier.0).num_seconds()).ok()
    }

    pub fn to_backend(self) -> String {
        self.0.format(BACKEND_FORMAT).to_string()
    }

    /// Value for a `datetime-local` input.
    pub fn to_input(self) -> String {
        self.0.format(INPUT_FORMAT).to_string()
    }
}

/// Drops a trailing `[Region/City]` zone id and a `Z` or `±hh:mm` offset.
fn strip_zone(s: &str) -> &str {
    let s = match s.find('[') {
        Some(i) => &s[..i],
        None => s,
    };
    let s = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    match s.find('T') {
        Some(t) => match s[t..].rfind(['+', '-']) {
            Some(i) => &s[..t + i],
            None => s,
        },
        None => s,
    }
}

/// Deserializes an optional time. The backend stores these as free text, so
/// null, an empty string and an unreadable value all become `None` instead of
/// failing the surrounding record.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<LocalDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    let value = match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };
    match LocalDateTime::parse(&value) {
        Ok(dt) => Ok(Some(dt)),
        Err(e) => {
            log::warn!("Ignoring {e}");
            Ok(None)
        }
    }
}

impl Display for LocalDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

impl Serialize for LocalDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_backend())
    }
}

impl<'de> Deserialize<'de> for LocalDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        LocalDateTime::parse(&s).map_err(D::Error::custom)
    }
}

/// The current instant as an RFC 3339 UTC string, as used for stroke
/// timestamps.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() -> Fallible<()> {
        let dt = LocalDateTime::parse("2025-03-01T09:30:00")?;
        assert_eq!(dt.to_backend(), "2025-03-01T09:30:00");
        assert_eq!(dt.to_input(), "2025-03-01T09:30");
        assert_eq!(dt.to_string(), "01.03.2025 09:30");
        Ok(())
    }

    #[test]
    fn test_parse_input() -> Fallible<()> {
        let dt = LocalDateTime::parse("2025-03-01T09:30")?;
        assert_eq!(dt.to_backend(), "2025-03-01T09:30:00");
        Ok(())
    }

    #[test]
    fn test_parse_fractional() -> Fallible<()> {
        let dt = LocalDateTime::parse("2025-03-01T09:30:15.123")?;
        assert_eq!(dt.to_backend(), "2025-03-01T09:30:15");
        Ok(())
    }

    #[test]
    fn test_parse_invalid() {
        assert!(LocalDateTime::parse("").is_err());
        assert!(LocalDateTime::parse("01.03.2025").is_err());
    }

    #[test]
    fn test_parse_zoned() -> Fallible<()> {
        let dt = LocalDateTime::parse("2025-03-01T09:00:00+01:00[Europe/Vienna]")?;
        assert_eq!(dt.to_backend(), "2025-03-01T09:00:00");
        let dt = LocalDateTime::parse("2025-03-01T09:00:00.123456789-05:00")?;
        assert_eq!(dt.to_backend(), "2025-03-01T09:00:00");
        let dt = LocalDateTime::parse("2025-03-01T09:00Z")?;
        assert_eq!(dt.to_input(), "2025-03-01T09:00");
        let dt = LocalDateTime::parse("2025-03-01T23:15:00+0100")?;
        assert_eq!(dt.to_string(), "01.03.2025 23:15");
        Ok(())
    }

    #[derive(Deserialize)]
    struct Window {
        #[serde(default, deserialize_with = "deserialize_lenient")]
        start: Option<LocalDateTime>,
    }

    #[test]
    fn test_deserialize_lenient() -> Fallible<()> {
        let window: Window = serde_json::from_str(r#"{"start":""}"#)?;
        assert_eq!(window.start, None);
        let window: Window = serde_json::from_str(r#"{"start":null}"#)?;
        assert_eq!(window.start, None);
        let window: Window = serde_json::from_str(r#"{}"#)?;
        assert_eq!(window.start, None);
        let window: Window = serde_json::from_str(r#"{"start":"soon"}"#)?;
        assert_eq!(window.start, None);
        let window: Window = serde_json::from_str(r#"{"start":"2025-03-01T09:00:00Z"}"#)?;
        assert_eq!(window.start, Some(LocalDateTime::parse("2025-03-01T09:00")?));
        Ok(())
    }

    #[test]
    fn test_ordering() -> Fallible<()> {
        let a = LocalDateTime::parse("2025-03-01T09:30")?;
        let b = LocalDateTime::parse("2025-03-01T10:00")?;
        assert!(a < b);
        Ok(())
    }

    #[test]
    fn test_seconds_since() -> Fallible<()> {
        let a = LocalDateTime::parse("2025-03-01T09:30")?;
        let b = LocalDateTime::parse("2025-03-01T10:00")?;
        assert_eq!(b.seconds_since(a), Some(1800));
        assert_eq!(a.seconds_since(b), None);
        Ok(())
    }

    #[test]
    fn test_now_is_utc() {
        assert!(now_rfc3339().ends_with('Z'));
    }
}
