use super::viewer::Viewer;
use crate::domain::value_objects::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 投稿に付いたコメント。作成後に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// ストアへ渡すコメントの下書き
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub author_id: UserId,
    pub author_display_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
}

impl NewComment {
    /// 本文を trim し、著者名をこの時点で確定させる。
    /// 空文字（空白のみを含む）の場合は `None`。
    pub fn from_viewer(post_id: PostId, viewer: &Viewer, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            post_id,
            author_id: viewer.id.clone(),
            author_display_name: viewer.resolved_display_name(),
            author_photo_url: viewer.photo_url.clone(),
            text: text.to_string(),
        })
    }
}
