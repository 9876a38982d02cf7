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

const AUDIO_EXTENSIONS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "m4a"];
const ARCHIVE_EXTENSIONS: [&str; 3] = ["zip", "rar", "7z"];

/// A learning document ("Unterlage") and the files attached to it.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UnterlageInfo {
    pub id: i64,
    pub paket_name: String,
    pub name: String,
    #[serde(default)]
    pub material: Vec<MaterialInfo>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size_byte: u64,
    /// Content-addressed storage location.
    pub location: String,
}

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct MaterialCount {
    pub count: u64,
}

/// How a downloaded material is presented.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FileKind {
    Pdf,
    Audio,
    Archive,
    Download,
}

impl FileKind {
    /// Decides by content type first, then file extension, then the
    /// material's declared type.
    pub fn detect(content_type: Option<&str>, file_name: &str, material_type: &str) -> Self {
        if let Some(ct) = content_type {
            let ct = ct.to_lowercase();
            if ct.contains("pdf") {
                return FileKind::Pdf;
            }
            if ct.contains("audio") {
                return FileKind::Audio;
            }
            if ct.contains("zip") {
                return FileKind::Archive;
            }
        }
        if let Some((_, ext)) = file_name.rsplit_once('.') {
            let ext = ext.to_lowercase();
            if ext == "pdf" {
                return FileKind::Pdf;
            }
            if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
                return FileKind::Audio;
            }
            if ARCHIVE_EXTENSIONS.contains(&ext.as_str()) {
                return FileKind::Archive;
            }
        }
        let material_type = material_type.to_lowercase();
        if material_type.contains("pdf") {
            FileKind::Pdf
        } else if material_type.contains("audio") {
            FileKind::Audio
        } else if material_type.contains("zip") {
            FileKind::Archive
        } else {
            FileKind::Download
        }
    }

    /// PDFs and audio open in the browser; everything else is saved.
    pub fn is_inline(self) -> bool {
        matches!(self, FileKind::Pdf | FileKind::Audio)
    }

    pub fn default_content_type(self) -> &'static str {
        match self {
            FileKind::Pdf => "application/pdf",
            FileKind::Audio => "audio/mpeg",
            FileKind::Archive => "application/zip",
            FileKind::Download => "application/octet-stream",
        }
    }
}

/// `0 B`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    let rounded = (size * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_content_type() {
        assert_eq!(
            FileKind::detect(Some("application/pdf"), "x.bin", ""),
            FileKind::Pdf
        );
        assert_eq!(
            FileKind::detect(Some("audio/mpeg"), "x.bin", ""),
            FileKind::Audio
        );
        assert_eq!(
            FileKind::detect(Some("application/zip"), "x.bin", ""),
            FileKind::Archive
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            FileKind::detect(Some("application/octet-stream"), "Script.PDF", ""),
            FileKind::Pdf
        );
        assert_eq!(FileKind::detect(None, "talk.m4a", ""), FileKind::Audio);
        assert_eq!(FileKind::detect(None, "all.7z", ""), FileKind::Archive);
    }

    #[test]
    fn test_detect_by_material_type() {
        assert_eq!(FileKind::detect(None, "noext", "PDF"), FileKind::Pdf);
        assert_eq!(FileKind::detect(None, "noext", "unknown"), FileKind::Download);
    }

    #[test]
    fn test_inline() {
        assert!(FileKind::Pdf.is_inline());
        assert!(!FileKind::Archive.is_inline());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{"id":1,"paketName":"Basics","name":"Intro","material":[{"id":2,"name":"intro.pdf","type":"pdf","sizeByte":10,"location":"ab12"}]}"#;
        let info: UnterlageInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.paket_name, "Basics");
        assert_eq!(info.material[0].kind, "pdf");
        assert_eq!(info.material[0].location, "ab12");
    }
}
