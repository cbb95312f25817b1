use serde::{Deserialize, Serialize};

/// Body of `POST /new`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub content: String,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Body of `PUT /edit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPost {
    pub post_id: i64,
    pub content: String,
}

/// Body of `PUT /like`, toggles the like of the logged user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikePost {
    pub post_id: i64,
}
