use crate::domain::value_objects::UserId;
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// サインイン中のユーザー（閲覧者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl Viewer {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// コメント著者名: 表示名 → メールのローカル部 → "Anonymous"
    pub fn resolved_display_name(&self) -> String {
        non_blank(self.display_name.as_deref())
            .or_else(|| {
                non_blank(self.email.as_deref())
                    .and_then(|email| non_blank(email.split('@').next()))
            })
            .map(str::to_string)
            .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_string())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
