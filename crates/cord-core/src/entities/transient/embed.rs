use chrono::{DateTime, Utc};

use crate::models::{
    EmbedAuthorModel, EmbedFieldModel, EmbedFooterModel, EmbedImageModel, EmbedModel,
};
use crate::value_objects::Color;

/// Read-only view over a received embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    model: EmbedModel,
}

impl Embed {
    #[must_use]
    pub fn new(model: EmbedModel) -> Self {
        Self { model }
    }

    pub fn title(&self) -> Option<&str> {
        self.model.title.value().map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.model.description.value().map(String::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.model.url.value().map(String::as_str)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.model.timestamp.value().copied()
    }

    pub fn color(&self) -> Option<Color> {
        self.model.color.value().copied()
    }

    pub fn author(&self) -> Option<&EmbedAuthorModel> {
        self.model.author.value()
    }

    pub fn footer(&self) -> Option<&EmbedFooterModel> {
        self.model.footer.value()
    }

    pub fn image(&self) -> Option<&EmbedImageModel> {
        self.model.image.value()
    }

    pub fn thumbnail(&self) -> Option<&EmbedImageModel> {
        self.model.thumbnail.value()
    }

    pub fn fields(&self) -> &[EmbedFieldModel] {
        self.model.fields.value().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn model(&self) -> &EmbedModel {
        &self.model
    }
}

impl From<EmbedModel> for Embed {
    fn from(model: EmbedModel) -> Self {
        Self::new(model)
    }
}
