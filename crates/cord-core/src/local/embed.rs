//! Embed builder

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::error::ArgumentError;
use crate::models::{
    EmbedAuthorModel, EmbedFieldModel, EmbedFooterModel, EmbedImageModel, EmbedModel,
};
use crate::value_objects::{Color, Optional};

/// Combined character limit across every text field of one embed
pub const MAX_EMBED_TOTAL_LENGTH: usize = 6000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LocalEmbedAuthor {
    #[validate(length(min = 1, max = 256, message = "Author name must be 1-256 characters"))]
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LocalEmbedFooter {
    #[validate(length(min = 1, max = 2048, message = "Footer text must be 1-2048 characters"))]
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LocalEmbedField {
    #[validate(length(min = 1, max = 256, message = "Field name must be 1-256 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 1024, message = "Field value must be 1-1024 characters"))]
    pub value: String,
    pub is_inline: bool,
}

/// Embed to be sent with a message or followup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Validate)]
pub struct LocalEmbed {
    #[validate(length(max = 256, message = "Embed title must be at most 256 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 4096, message = "Embed description must be at most 4096 characters"))]
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<Color>,
    pub timestamp: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub author: Option<LocalEmbedAuthor>,
    #[validate(nested)]
    pub footer: Option<LocalEmbedFooter>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    #[validate(length(max = 25, message = "Embeds can have at most 25 fields"), nested)]
    pub fields: Vec<LocalEmbedField>,
}

impl LocalEmbed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(LocalEmbedAuthor {
            name: name.into(),
            url: None,
            icon_url,
        });
        self
    }

    pub fn with_footer(mut self, text: impl Into<String>, icon_url: Option<String>) -> Self {
        self.footer = Some(LocalEmbedFooter {
            text: text.into(),
            icon_url,
        });
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn add_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        is_inline: bool,
    ) -> Self {
        self.fields.push(LocalEmbedField {
            name: name.into(),
            value: value.into(),
            is_inline,
        });
        self
    }

    /// Characters counted against the combined limit
    pub fn total_length(&self) -> usize {
        let count = |s: &Option<String>| s.as_deref().map_or(0, |s| s.chars().count());

        count(&self.title)
            + count(&self.description)
            + self
                .author
                .as_ref()
                .map_or(0, |author| author.name.chars().count())
            + self
                .footer
                .as_ref()
                .map_or(0, |footer| footer.text.chars().count())
            + self
                .fields
                .iter()
                .map(|field| field.name.chars().count() + field.value.chars().count())
                .sum::<usize>()
    }

    /// Validate and convert into the request model
    pub fn to_model(&self) -> Result<EmbedModel, ArgumentError> {
        self.validate()?;

        let total = self.total_length();
        if total > MAX_EMBED_TOTAL_LENGTH {
            return Err(ArgumentError::TooLong {
                name: "embed",
                max: MAX_EMBED_TOTAL_LENGTH,
                actual: total,
            });
        }

        let image = |url: &Option<String>| {
            Optional::from_option(url.as_ref().map(|url| EmbedImageModel {
                url: url.clone(),
                proxy_url: Optional::Absent,
                height: Optional::Absent,
                width: Optional::Absent,
            }))
        };

        Ok(EmbedModel {
            title: Optional::from_option(self.title.clone()),
            kind: Optional::Absent,
            description: Optional::from_option(self.description.clone()),
            url: Optional::from_option(self.url.clone()),
            timestamp: Optional::from_option(self.timestamp),
            color: Optional::from_option(self.color),
            footer: Optional::from_option(self.footer.as_ref().map(|footer| EmbedFooterModel {
                text: footer.text.clone(),
                icon_url: Optional::from_option(footer.icon_url.clone()),
                proxy_icon_url: Optional::Absent,
            })),
            image: image(&self.image_url),
            thumbnail: image(&self.thumbnail_url),
            video: Optional::Absent,
            provider: Optional::Absent,
            author: Optional::from_option(self.author.as_ref().map(|author| EmbedAuthorModel {
                name: author.name.clone(),
                url: Optional::from_option(author.url.clone()),
                icon_url: Optional::from_option(author.icon_url.clone()),
                proxy_icon_url: Optional::Absent,
            })),
            fields: if self.fields.is_empty() {
                Optional::Absent
            } else {
                Optional::Present(
                    self.fields
                        .iter()
                        .map(|field| EmbedFieldModel {
                            name: field.name.clone(),
                            value: field.value.clone(),
                            inline: Optional::Present(field.is_inline),
                        })
                        .collect(),
                )
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_model() {
        let embed = LocalEmbed::new()
            .with_title("Release")
            .with_color(Color::from_rgb(0x58, 0x65, 0xF2))
            .with_footer("cord", None)
            .add_field("Version", "0.1.0", true);

        let model = embed.to_model().unwrap();

        assert_eq!(model.title.value().map(String::as_str), Some("Release"));
        assert!(model.description.is_absent());
        assert_eq!(model.footer.value().unwrap().text, "cord");
        let fields = model.fields.value().unwrap();
        assert_eq!(fields[0].inline, Optional::Present(true));
    }

    #[test]
    fn test_title_too_long() {
        let embed = LocalEmbed::new().with_title("x".repeat(257));
        assert!(matches!(embed.to_model(), Err(ArgumentError::Validation(_))));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let embed = LocalEmbed::new().add_field("", "value", false);
        assert!(embed.to_model().is_err());
    }

    #[test]
    fn test_field_count_limit() {
        let embed = (0..25).fold(LocalEmbed::new(), |embed, i| {
            embed.add_field(format!("f{i}"), "v", false)
        });
        assert!(embed.validate().is_ok());

        let embed = embed.add_field("f25", "v", false);
        match embed.to_model() {
            Err(ArgumentError::Validation(message)) => {
                assert_eq!(message, "fields: Embeds can have at most 25 fields");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_nested_author_checked() {
        let embed = LocalEmbed::new().with_author("", None);
        assert!(embed.validate().is_err());
    }

    #[test]
    fn test_total_length_limit() {
        let embed = LocalEmbed::new()
            .with_description("d".repeat(4096))
            .add_field("n", "v".repeat(1024), false)
            .add_field("n", "v".repeat(1024), false);
        assert_eq!(embed.total_length(), 4096 + 2 * 1025);
        assert!(matches!(
            embed.to_model(),
            Err(ArgumentError::TooLong { name: "embed", .. })
        ));
    }
}
