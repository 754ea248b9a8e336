//! Embed models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Color, Optional};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmbedModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub title: Optional<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Optional::is_absent")]
    pub kind: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub description: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub timestamp: Optional<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub color: Optional<Color>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub footer: Optional<EmbedFooterModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub image: Optional<EmbedImageModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub thumbnail: Optional<EmbedThumbnailModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub video: Optional<EmbedVideoModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub provider: Optional<EmbedProviderModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub author: Optional<EmbedAuthorModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub fields: Optional<Vec<EmbedFieldModel>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooterModel {
    pub text: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub icon_url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub proxy_icon_url: Optional<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedImageModel {
    pub url: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub proxy_url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub height: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub width: Optional<u32>,
}

/// Thumbnails share the image shape
pub type EmbedThumbnailModel = EmbedImageModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedVideoModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub proxy_url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub height: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub width: Optional<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedProviderModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub name: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub url: Optional<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthorModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub icon_url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub proxy_icon_url: Optional<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFieldModel {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub inline: Optional<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_model() {
        let author: EmbedAuthorModel = serde_json::from_str(
            r#"{"name": "nelly", "icon_url": "https://cdn.example/a.png",
                "proxy_icon_url": "https://media.example/a.png"}"#,
        )
        .unwrap();
        assert_eq!(author.name, "nelly");
        assert!(author.url.is_absent());
        assert!(author.proxy_icon_url.is_present());
    }

    #[test]
    fn test_embed_round_trip_keeps_absent_fields_out() {
        let embed = EmbedModel {
            title: Optional::Present("Hello".to_string()),
            color: Optional::Present(Color::from_rgb(0, 0x99, 0xFF)),
            ..EmbedModel::default()
        };
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Hello", "color": 39423}));
    }
}
