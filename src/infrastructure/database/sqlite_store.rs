use super::connection_pool::ConnectionPool;
use super::queries::{
    COUNT_LIKES_BY_POST, DELETE_COMMENT, FlagQueries, INSERT_COMMENT, LIKES, SAVES,
    SELECT_COMMENT_AUTHOR, SELECT_COMMENTS_BY_POST,
};
use crate::application::ports::InteractionStore;
use crate::domain::entities::{Comment, NewComment};
use crate::domain::value_objects::{CommentId, PostId, UserId};
use crate::shared::AppError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::FromRow;
use tracing::debug;

#[derive(Debug, FromRow)]
struct CommentRow {
    id: String,
    post_id: String,
    author_id: String,
    author_name: String,
    author_photo_url: Option<String>,
    text: String,
    created_at: i64,
}

impl CommentRow {
    fn into_domain(self) -> Result<Comment, AppError> {
        let id = CommentId::new(self.id)
            .map_err(|err| AppError::Serialization(format!("Invalid comment id: {err}")))?;
        let author_id = UserId::new(self.author_id)
            .map_err(|err| AppError::Serialization(format!("Invalid author id: {err}")))?;
        let created_at = Utc
            .timestamp_millis_opt(self.created_at)
            .single()
            .ok_or_else(|| AppError::Serialization("Invalid timestamp".to_string()))?;

        Ok(Comment {
            id,
            post_id: PostId::from(self.post_id),
            author_id,
            author_display_name: self.author_name,
            author_photo_url: self.author_photo_url,
            text: self.text,
            created_at,
        })
    }
}

/// SQLite 上のインタラクションストア
pub struct SqliteInteractionStore {
    pool: ConnectionPool,
}

impl SqliteInteractionStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    async fn flag_exists(
        &self,
        queries: &FlagQueries,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<bool, AppError> {
        let exists: i64 = sqlx::query_scalar(queries.exists)
            .bind(post_id.as_str())
            .bind(user_id.as_str())
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(exists != 0)
    }

    /// 1 トランザクションで「あれば削除、なければ作成」を行い、反転後の状態を返す
    async fn flip_flag(
        &self,
        queries: &FlagQueries,
        post_id: &PostId,
        user_id: &UserId,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.get_pool().begin().await?;

        let removed = sqlx::query(queries.delete)
            .bind(post_id.as_str())
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let active = if removed > 0 {
            false
        } else {
            sqlx::query(queries.insert)
                .bind(post_id.as_str())
                .bind(user_id.as_str())
                .bind(Utc::now().timestamp_millis())
                .execute(&mut *tx)
                .await?;
            true
        };

        tx.commit().await?;
        Ok(active)
    }

    async fn flagged_post_ids(
        &self,
        queries: &FlagQueries,
        user_id: &UserId,
    ) -> Result<Vec<PostId>, AppError> {
        let post_ids: Vec<String> = sqlx::query_scalar(queries.post_ids_by_user)
            .bind(user_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;
        Ok(post_ids.into_iter().map(PostId::from).collect())
    }
}

#[async_trait]
impl InteractionStore for SqliteInteractionStore {
    async fn like_exists(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError> {
        self.flag_exists(&LIKES, post_id, user_id).await
    }

    async fn like_count(&self, post_id: &PostId) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(COUNT_LIKES_BY_POST)
            .bind(post_id.as_str())
            .fetch_one(self.pool.get_pool())
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn flip_like(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError> {
        let liked = self.flip_flag(&LIKES, post_id, user_id).await?;
        debug!(post_id = %post_id, user_id = %user_id, liked, "flipped like");
        Ok(liked)
    }

    async fn save_exists(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError> {
        self.flag_exists(&SAVES, post_id, user_id).await
    }

    async fn flip_save(&self, post_id: &PostId, user_id: &UserId) -> Result<bool, AppError> {
        let saved = self.flip_flag(&SAVES, post_id, user_id).await?;
        debug!(post_id = %post_id, user_id = %user_id, saved, "flipped save");
        Ok(saved)
    }

    async fn list_comments(&self, post_id: &PostId) -> Result<Vec<Comment>, AppError> {
        let rows = sqlx::query_as::<_, CommentRow>(SELECT_COMMENTS_BY_POST)
            .bind(post_id.as_str())
            .fetch_all(self.pool.get_pool())
            .await?;
        rows.into_iter().map(CommentRow::into_domain).collect()
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentId, AppError> {
        let id = CommentId::random();

        sqlx::query(INSERT_COMMENT)
            .bind(id.as_str())
            .bind(comment.post_id.as_str())
            .bind(comment.author_id.as_str())
            .bind(&comment.author_display_name)
            .bind(comment.author_photo_url.as_deref())
            .bind(&comment.text)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        Ok(id)
    }

    async fn delete_comment(
        &self,
        post_id: &PostId,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), AppError> {
        let author: Option<String> = sqlx::query_scalar(SELECT_COMMENT_AUTHOR)
            .bind(comment_id.as_str())
            .bind(post_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await?;

        match author {
            None => Err(AppError::NotFound("Comment not found".to_string())),
            Some(author) if author != user_id.as_str() => Err(AppError::Forbidden(
                "You can only delete your own comments".to_string(),
            )),
            Some(_) => {
                sqlx::query(DELETE_COMMENT)
                    .bind(comment_id.as_str())
                    .bind(post_id.as_str())
                    .execute(self.pool.get_pool())
                    .await?;
                Ok(())
            }
        }
    }

    async fn liked_post_ids(&self, user_id: &UserId) -> Result<Vec<PostId>, AppError> {
        self.flagged_post_ids(&LIKES, user_id).await
    }

    async fn saved_post_ids(&self, user_id: &UserId) -> Result<Vec<PostId>, AppError> {
        self.flagged_post_ids(&SAVES, user_id).await
    }
}
