//! Voice region model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRegionModel {
    /// Region id, such as `us-west`
    pub id: String,
    pub name: String,
    /// Closest region to the current user's client
    #[serde(default)]
    pub optimal: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub custom: bool,
}
