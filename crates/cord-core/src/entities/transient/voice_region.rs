use std::fmt;

use crate::entities::VoiceRegion;
use crate::models::VoiceRegionModel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientVoiceRegion {
    model: VoiceRegionModel,
}

impl TransientVoiceRegion {
    #[must_use]
    pub fn new(model: VoiceRegionModel) -> Self {
        Self { model }
    }

    pub fn is_custom(&self) -> bool {
        self.model.custom
    }
}

impl VoiceRegion for TransientVoiceRegion {
    fn id(&self) -> String {
        self.model.id.clone()
    }

    fn name(&self) -> String {
        self.model.name.clone()
    }

    fn is_optimal(&self) -> bool {
        self.model.optimal
    }

    fn is_deprecated(&self) -> bool {
        self.model.deprecated
    }
}

impl fmt::Display for TransientVoiceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.model.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_name() {
        let region = TransientVoiceRegion::new(VoiceRegionModel {
            id: "us-west".to_string(),
            name: "US West".to_string(),
            optimal: true,
            deprecated: false,
            custom: false,
        });
        assert_eq!(region.to_string(), "US West");
        assert_eq!(region.id(), "us-west");
        assert!(region.is_optimal());
    }
}
