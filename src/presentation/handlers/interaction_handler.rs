use crate::{
    application::services::InteractionService,
    domain::value_objects::{CommentId, PostId},
    presentation::dto::{
        interaction_dto::{
            AddCommentRequest, CommentCreatedResponse, DeleteCommentRequest,
            PostInteractionsResponse, PostListResponse, PostRequest, ToggleResponse,
        },
        Validate,
    },
    shared::error::AppError,
};
use std::sync::Arc;

pub struct InteractionHandler {
    interaction_service: Arc<InteractionService>,
    comment_max_length: usize,
}

impl InteractionHandler {
    pub fn new(interaction_service: Arc<InteractionService>, comment_max_length: usize) -> Self {
        Self {
            interaction_service,
            comment_max_length,
        }
    }

    fn view(&self, post_id: &PostId) -> PostInteractionsResponse {
        PostInteractionsResponse::from_snapshot(post_id, self.interaction_service.snapshot(post_id))
    }

    /// 投稿を読み込み、キャッシュの内容を返す
    pub async fn get_interactions(
        &self,
        request: PostRequest,
    ) -> Result<PostInteractionsResponse, AppError> {
        request.validate().map_err(AppError::InvalidInput)?;

        let post_id = PostId::from(request.post_id);
        self.interaction_service.load(&post_id).await;
        Ok(self.view(&post_id))
    }

    pub async fn toggle_like(&self, request: PostRequest) -> Result<ToggleResponse, AppError> {
        request.validate().map_err(AppError::InvalidInput)?;

        let post_id = PostId::from(request.post_id);
        let active = self.interaction_service.toggle_like(&post_id).await?;
        Ok(ToggleResponse {
            likes_count: self.interaction_service.likes_count(&post_id),
            post_id: post_id.to_string(),
            active,
        })
    }

    pub async fn toggle_save(&self, request: PostRequest) -> Result<ToggleResponse, AppError> {
        request.validate().map_err(AppError::InvalidInput)?;

        let post_id = PostId::from(request.post_id);
        let active = self.interaction_service.toggle_save(&post_id).await?;
        Ok(ToggleResponse {
            likes_count: self.interaction_service.likes_count(&post_id),
            post_id: post_id.to_string(),
            active,
        })
    }

    pub async fn add_comment(
        &self,
        request: AddCommentRequest,
    ) -> Result<CommentCreatedResponse, AppError> {
        // 入力検証より先にサインインを確認する
        if !self.interaction_service.is_signed_in() {
            return Err(AppError::unauthenticated("comment"));
        }
        request.validate().map_err(AppError::InvalidInput)?;
        request
            .validate_length(self.comment_max_length)
            .map_err(AppError::InvalidInput)?;

        let post_id = PostId::from(&request.post_id);
        let comment_id = self
            .interaction_service
            .add_comment(&post_id, &request.text)
            .await?;

        Ok(CommentCreatedResponse {
            comment_id: comment_id.to_string(),
            post: self.view(&post_id),
        })
    }

    pub async fn delete_comment(
        &self,
        request: DeleteCommentRequest,
    ) -> Result<PostInteractionsResponse, AppError> {
        request.validate().map_err(AppError::InvalidInput)?;

        let comment_id =
            CommentId::new(request.comment_id.trim().to_string()).map_err(AppError::InvalidInput)?;
        let post_id = PostId::from(request.post_id);
        self.interaction_service
            .delete_comment(&post_id, &comment_id)
            .await?;
        Ok(self.view(&post_id))
    }

    pub async fn liked_posts(&self) -> Result<PostListResponse, AppError> {
        let post_ids = self.interaction_service.liked_posts().await?;
        Ok(PostListResponse {
            post_ids: post_ids.into_iter().map(String::from).collect(),
        })
    }

    pub async fn saved_posts(&self) -> Result<PostListResponse, AppError> {
        let post_ids = self.interaction_service.saved_posts().await?;
        Ok(PostListResponse {
            post_ids: post_ids.into_iter().map(String::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{IdentitySource, InteractionStore};
    use crate::domain::entities::Viewer;
    use crate::domain::value_objects::UserId;
    use crate::infrastructure::database::{ConnectionPool, SqliteInteractionStore};
    use crate::infrastructure::identity::SessionIdentity;
    use crate::presentation::dto::interaction_dto::RawPostId;

    async fn setup_handler(max_length: usize) -> (InteractionHandler, Arc<SessionIdentity>) {
        let pool = ConnectionPool::from_memory().await.unwrap();
        let store = SqliteInteractionStore::new(pool);
        store.initialize().await.unwrap();

        let viewer = Viewer::new(UserId::new("u1".to_string()).unwrap())
            .with_email("reader@example.com");
        let identity = Arc::new(SessionIdentity::signed_in(viewer));
        let service = Arc::new(InteractionService::new(
            Arc::new(store) as Arc<dyn InteractionStore>,
            Arc::clone(&identity) as Arc<dyn IdentitySource>,
        ));
        (InteractionHandler::new(service, max_length), identity)
    }

    fn post(id: u64) -> PostRequest {
        PostRequest {
            post_id: RawPostId::Number(id),
        }
    }

    #[tokio::test]
    async fn toggle_like_reports_confirmed_state() {
        let (handler, _) = setup_handler(100).await;

        let liked = handler.toggle_like(post(42)).await.unwrap();
        assert_eq!(liked.post_id, "42");
        assert!(liked.active);
        assert_eq!(liked.likes_count, 1);

        let view = handler
            .get_interactions(PostRequest {
                post_id: RawPostId::Text("42".to_string()),
            })
            .await
            .unwrap();
        assert!(view.is_liked);
        assert_eq!(view.likes_count, 1);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn comment_uses_email_local_part_as_author() {
        let (handler, _) = setup_handler(100).await;

        let created = handler
            .add_comment(AddCommentRequest {
                post_id: RawPostId::Number(7),
                text: " hello ".to_string(),
            })
            .await
            .unwrap();

        let comment = created.post.comments.last().unwrap();
        assert_eq!(comment.id, created.comment_id);
        assert_eq!(comment.author_name, "reader");
        assert_eq!(comment.text, "hello");
    }

    #[tokio::test]
    async fn overlong_comment_is_rejected() {
        let (handler, _) = setup_handler(5).await;

        let err = handler
            .add_comment(AddCommentRequest {
                post_id: RawPostId::Number(7),
                text: "too long".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn signed_out_requests_fail_or_return_empty_lists() {
        let (handler, identity) = setup_handler(100).await;
        identity.sign_out();

        let err = handler.toggle_save(post(1)).await.unwrap_err();
        assert_eq!(err.code(), "UNAUTHENTICATED");
        assert!(handler.saved_posts().await.unwrap().post_ids.is_empty());
    }

    #[tokio::test]
    async fn delete_comment_returns_refreshed_post() {
        let (handler, _) = setup_handler(100).await;
        let created = handler
            .add_comment(AddCommentRequest {
                post_id: RawPostId::Number(3),
                text: "bye".to_string(),
            })
            .await
            .unwrap();

        let view = handler
            .delete_comment(DeleteCommentRequest {
                post_id: RawPostId::Number(3),
                comment_id: created.comment_id,
            })
            .await
            .unwrap();
        assert!(view.comments.is_empty());
    }

    #[tokio::test]
    async fn signed_out_comment_is_unauthenticated_before_validation() {
        let (handler, identity) = setup_handler(3).await;
        identity.sign_out();

        for text in ["  ", "far too long"] {
            let err = handler
                .add_comment(AddCommentRequest {
                    post_id: RawPostId::Number(7),
                    text: text.to_string(),
                })
                .await
                .unwrap_err();
            assert_eq!(err.code(), "UNAUTHENTICATED");
        }
    }

    #[tokio::test]
    async fn blank_comment_is_invalid_when_signed_in() {
        let (handler, _) = setup_handler(100).await;

        let err = handler
            .add_comment(AddCommentRequest {
                post_id: RawPostId::Number(7),
                text: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn padded_post_id_is_a_different_key() {
        let (handler, _) = setup_handler(100).await;
        handler.toggle_like(post(42)).await.unwrap();

        let view = handler
            .get_interactions(PostRequest {
                post_id: RawPostId::Text(" 42".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(view.post_id, " 42");
        assert_eq!(view.likes_count, 0);
    }
}
