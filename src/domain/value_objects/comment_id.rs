use serde::{Deserialize, Serialize};
use std::fmt;

/// Comment エンティティの識別子。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// 既存の識別子文字列から `CommentId` を生成する。
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("CommentId cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// 新規 CommentId を生成する。
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CommentId> for String {
    fn from(value: CommentId) -> Self {
        value.0
    }
}
