//! Ban model

use serde::{Deserialize, Serialize};

use super::UserModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanModel {
    #[serde(default)]
    pub reason: Option<String>,
    pub user: UserModel,
}
