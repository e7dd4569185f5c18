use serde::{Deserialize, Serialize};

/// Principal performing an operation, as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_name: String,
    /// Every group the user belongs to, primary group first
    #[serde(default)]
    pub group_names: Vec<String>,
}

impl UserIdentity {
    pub fn new<I, S>(user_name: impl Into<String>, group_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_name: user_name.into(),
            group_names: group_names.into_iter().map(Into::into).collect(),
        }
    }

    /// First group, or empty when the user has none
    pub fn primary_group(&self) -> &str {
        self.group_names.first().map(String::as_str).unwrap_or("")
    }
}
