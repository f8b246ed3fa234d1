use crate::domain::entities::{Comment, NewComment};
use crate::domain::value_objects::{CommentId, PostId, UserId};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// いいね・保存・コメントを保持するリモートストアのポート。
///
/// `flip_*` は `(post_id, user_id)` のレコードが存在すれば削除、
/// なければ作成し、反転後の状態を返す（存在ベースなので再送しても安全）。
/// `create_comment` は冪等ではない。
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn like_exists(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError>;
    async fn like_count(&self, post_id: &PostId) -> Result<u64, AppError>;
    async fn flip_like(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError>;

    async fn save_exists(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError>;
    async fn flip_save(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError>;

    /// 作成日時の昇順
    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, AppError>;
    async fn create_comment(&self, comment: NewComment) -> Result<CommentId, AppError>;
    /// 投稿に属さない・存在しなければ `NotFound`、著者本人以外は `Forbidden`
    async fn delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), AppError>;

    /// 新しい順
    async fn liked_post_ids(&self, user_id: &UserId) -> Result<Vec<PostId>, AppError>;
    /// 新しい順
    async fn saved_post_ids(&self, user_id: &UserId) -> Result<Vec<PostId>, AppError>;
}
