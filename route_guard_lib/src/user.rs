use serde::{Deserialize, Serialize};

/// Session info from the auth endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub authenticated: bool,
    #[serde(default)]
    pub email: Option<String>,
}
