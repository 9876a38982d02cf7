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

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Image {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub extension: String,
    /// Content-addressed storage location returned by the upload.
    #[serde(default)]
    pub location: String,
}

impl Image {
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }
}

/// Response of the binary upload endpoint.
#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct UploadResponse {
    pub id: String,
}

/// Splits `photo.final.png` into (`photo.final`, `png`).
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, ext),
        _ => (file_name, ""),
    }
}

pub fn is_image_file(file_name: &str) -> bool {
    let (_, ext) = split_file_name(file_name);
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("photo.png"), ("photo", "png"));
        assert_eq!(split_file_name("photo.final.png"), ("photo.final", "png"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name(".hidden"), (".hidden", ""));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("a.PNG"));
        assert!(is_image_file("b.jpeg"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn test_file_name() {
        let image = Image {
            id: Some(1),
            name: "cat".to_string(),
            extension: "jpg".to_string(),
            location: "abc".to_string(),
        };
        assert_eq!(image.file_name(), "cat.jpg");
    }
}
