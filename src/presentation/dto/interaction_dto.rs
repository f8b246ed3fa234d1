use super::Validate;
use crate::domain::entities::{Comment, PostInteractions, TogglePhase};
use crate::domain::value_objects::PostId;
use serde::{Deserialize, Serialize};

/// 投稿 ID は CMS 由来の数値でも文字列でも受け付ける。
/// 文字列はそのまま `PostId` になる（trim しない）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPostId {
    Text(String),
    Number(u64),
}

impl RawPostId {
    pub fn is_empty(&self) -> bool {
        match self {
            RawPostId::Text(value) => value.is_empty(),
            RawPostId::Number(_) => false,
        }
    }
}

impl From<RawPostId> for PostId {
    fn from(raw: RawPostId) -> Self {
        match raw {
            RawPostId::Text(value) => PostId::from(value),
            RawPostId::Number(value) => PostId::from(value),
        }
    }
}

impl From<&RawPostId> for PostId {
    fn from(raw: &RawPostId) -> Self {
        PostId::from(raw.clone())
    }
}

// レスポンスDTO
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_photo_url: Option<String>,
    pub text: String,
    pub created_at: i64,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author_id: comment.author_id.to_string(),
            author_name: comment.author_display_name,
            author_photo_url: comment.author_photo_url,
            text: comment.text,
            created_at: comment.created_at.timestamp_millis(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostInteractionsResponse {
    pub post_id: String,
    pub is_liked: bool,
    pub likes_count: u64,
    pub is_saved: bool,
    pub comments: Vec<CommentResponse>,
    pub loading: bool,
    pub like_phase: TogglePhase,
    pub save_phase: TogglePhase,
}

impl PostInteractionsResponse {
    pub fn from_snapshot(post_id: &PostId, snapshot: PostInteractions) -> Self {
        Self {
            post_id: post_id.to_string(),
            is_liked: snapshot.like.is_liked,
            likes_count: snapshot.like.count,
            is_saved: snapshot.saved,
            comments: snapshot
                .comments
                .into_iter()
                .map(CommentResponse::from)
                .collect(),
            loading: snapshot.loading,
            like_phase: snapshot.like_phase,
            save_phase: snapshot.save_phase,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToggleResponse {
    pub post_id: String,
    pub active: bool,
    pub likes_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommentCreatedResponse {
    pub comment_id: String,
    pub post: PostInteractionsResponse,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PostListResponse {
    pub post_ids: Vec<String>,
}

// リクエストDTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub post_id: RawPostId,
}

impl Validate for PostRequest {
    fn validate(&self) -> Result<(), String> {
        if self.post_id.is_empty() {
            return Err("Post ID is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub post_id: RawPostId,
    pub text: String,
}

impl AddCommentRequest {
    /// 文字数（バイト数ではない）で上限を確認する
    pub fn validate_length(&self, max_length: usize) -> Result<(), String> {
        let length = self.text.trim().chars().count();
        if length > max_length {
            return Err(format!(
                "Comment is too long ({length} characters, max {max_length})"
            ));
        }
        Ok(())
    }
}

// 本文が空かどうかはサインイン確認の後にサービス側で見る
impl Validate for AddCommentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.post_id.is_empty() {
            return Err("Post ID is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentRequest {
    pub post_id: RawPostId,
    pub comment_id: String,
}

impl Validate for DeleteCommentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.post_id.is_empty() {
            return Err("Post ID is required".to_string());
        }
        if self.comment_id.trim().is_empty() {
            return Err("Comment ID is required".to_string());
        }
        Ok(())
    }
}
