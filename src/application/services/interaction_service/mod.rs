mod cache;


use self::cache::{InteractionCache, ToggleGuard, ToggleStart};
use crate::application::ports::{IdentitySource, InteractionStore};
use crate::domain::entities::{
    Comment, LikeState, LoadedInteractions, NewComment, PostInteractions, ToggleKind,
    TogglePhase, Viewer,
};
use crate::domain::value_objects::{CommentId, PostId, UserId};
use crate::shared::AppError;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 投稿ごとのいいね・保存・コメントの状態を管理するサービス。
///
/// セッションにつき 1 つ生成し、`Arc` で UI 層へ渡す。キャッシュへ書き込むのは
/// このサービスだけで、読み出しは同期的に行える。
///
/// トグルは楽観的に表示を更新してからストアへ反映し、ストアの値で上書きする。
/// 失敗時は `load` で再同期してからエラーを返す。同じ投稿・同じ種類のトグルは
/// 同時に 1 つまでで、進行中に来た要求はキャッシュ値を返すだけになる。
///
/// `load` と同じ投稿へのトグルは排他しない。後に完了した方の書き込みが残る。
pub struct InteractionService {
    store: Arc<dyn InteractionStore>,
    identity: Arc<dyn IdentitySource>,
    cache: InteractionCache,
}

impl InteractionService {
    pub fn new(store: Arc<dyn InteractionStore>, identity: Arc<dyn IdentitySource>) -> Self {
        Self {
            store,
            identity,
            cache: InteractionCache::default(),
        }
    }

    fn require_viewer(&self, action: &str) -> Result<Viewer, AppError> {
        self.identity
            .current_user()
            .ok_or_else(|| AppError::unauthenticated(action))
    }

    fn require_post_id(post_id: &PostId) -> Result<(), AppError> {
        if post_id.is_empty() {
            return Err(AppError::InvalidInput("Post ID is required".to_string()));
        }
        Ok(())
    }

    /// 投稿のインタラクションをストアから読み込み、キャッシュへまとめて反映する。
    ///
    /// 失敗してもエラーは返さない（ログのみ）。キャッシュは直前の値か既定値のまま。
    pub async fn load(&self, post_id: impl Into<PostId>) {
        let post_id = post_id.into();
        if post_id.is_empty() {
            warn!("ignoring interaction load for empty post id");
            return;
        }
        self.reload(&post_id).await;
    }

    /// 読み込みに成功したかを返す
    async fn reload(&self, post_id: &PostId) -> bool {
        let generation = self.cache.begin_load(post_id);
        let viewer = self.identity.current_user();

        match self.fetch(post_id, viewer.as_ref().map(|v| &v.id)).await {
            Ok(loaded) => {
                debug!(
                    post_id = %post_id,
                    likes = loaded.like.count,
                    comments = loaded.comments.len(),
                    "loaded post interactions"
                );
                self.cache.finish_load(post_id, generation, Some(loaded));
                true
            }
            Err(err) => {
                error!(post_id = %post_id, error = %err, "failed to load post interactions");
                self.cache.finish_load(post_id, generation, None);
                false
            }
        }
    }

    async fn fetch(
        &self,
        post_id: &PostId,
        user_id: Option<&UserId>,
    ) -> Result<LoadedInteractions, AppError> {
        let liked = async {
            match user_id {
                Some(user_id) => self.store.like_exists(post_id, user_id).await,
                None => Ok(false),
            }
        };
        let saved = async {
            match user_id {
                Some(user_id) => self.store.save_exists(post_id, user_id).await,
                None => Ok(false),
            }
        };

        let (is_liked, saved, count, comments) = tokio::try_join!(
            liked,
            saved,
            self.store.like_count(post_id),
            self.store.list_comments(post_id),
        )?;

        Ok(LoadedInteractions {
            like: LikeState::new(is_liked, count),
            saved,
            comments,
        })
    }

    /// いいねを切り替え、確定後の `is_liked` を返す。
    pub async fn toggle_like(&self, post_id: impl Into<PostId>) -> Result<bool, AppError> {
        self.toggle(post_id.into(), ToggleKind::Like).await
    }

    /// 保存を切り替え、確定後の `is_saved` を返す。
    pub async fn toggle_save(&self, post_id: impl Into<PostId>) -> Result<bool, AppError> {
        self.toggle(post_id.into(), ToggleKind::Save).await
    }

    async fn toggle(&self, post_id: PostId, kind: ToggleKind) -> Result<bool, AppError> {
        let viewer = self.require_viewer(match kind {
            ToggleKind::Like => "like posts",
            ToggleKind::Save => "save posts",
        })?;
        Self::require_post_id(&post_id)?;

        let (generation, prior) = match self.cache.begin_toggle(&post_id, kind) {
            ToggleStart::Busy { current } => {
                debug!(post_id = %post_id, kind = %kind, "toggle already in flight");
                return Ok(current);
            }
            ToggleStart::Started {
                generation,
                optimistic,
                prior,
            } => {
                debug!(post_id = %post_id, kind = %kind, optimistic, "optimistic toggle");
                (generation, prior)
            }
        };
        let _guard = ToggleGuard::new(&self.cache, &post_id, kind, generation);

        match self.commit_toggle(&post_id, &viewer.id, kind, generation).await {
            Ok(active) => Ok(active),
            Err(err) => {
                error!(post_id = %post_id, kind = %kind, error = %err, "toggle failed, reloading");
                self.cache.mark_rolling_back(&post_id, kind, generation);
                if !self.reload(&post_id).await {
                    // 確定値が取れないので楽観値は残さない
                    warn!(post_id = %post_id, kind = %kind, "reload failed, restoring previous value");
                    self.cache.restore(&post_id, generation, prior);
                }
                Err(err)
            }
        }
    }

    async fn commit_toggle(
        &self,
        post_id: &PostId,
        user_id: &UserId,
        kind: ToggleKind,
        generation: u64,
    ) -> Result<bool, AppError> {
        match kind {
            ToggleKind::Like => {
                let liked = self.store.flip_like(post_id, user_id).await?;
                let count = self.store.like_count(post_id).await?;
                self.cache
                    .settle_like(post_id, generation, LikeState::new(liked, count));
                Ok(liked)
            }
            ToggleKind::Save => {
                let saved = self.store.flip_save(post_id, user_id).await?;
                self.cache.settle_save(post_id, generation, saved);
                Ok(saved)
            }
        }
    }

    /// コメントを投稿し、投稿全体を読み直す。楽観的な追加はしない。
    pub async fn add_comment(
        &self,
        post_id: impl Into<PostId>,
        text: &str,
    ) -> Result<CommentId, AppError> {
        let viewer = self.require_viewer("comment")?;
        let post_id = post_id.into();
        Self::require_post_id(&post_id)?;

        let draft = NewComment::from_viewer(post_id.clone(), &viewer, text)
            .ok_or_else(|| AppError::InvalidInput("Comment text cannot be empty".to_string()))?;

        let comment_id = self.store.create_comment(draft).await.map_err(|err| {
            error!(post_id = %post_id, error = %err, "failed to add comment");
            err
        })?;
        info!(post_id = %post_id, comment_id = %comment_id, "comment added");

        self.load(&post_id).await;
        Ok(comment_id)
    }

    /// 自分のコメントを削除し、投稿全体を読み直す。
    pub async fn delete_comment(
        &self,
        post_id: impl Into<PostId>,
        comment_id: &CommentId,
    ) -> Result<(), AppError> {
        let viewer = self.require_viewer("delete comments")?;
        let post_id = post_id.into();
        Self::require_post_id(&post_id)?;

        self.store
            .delete_comment(&post_id, comment_id, &viewer.id)
            .await
            .map_err(|err| {
                error!(post_id = %post_id, comment_id = %comment_id, error = %err, "failed to delete comment");
                err
            })?;
        info!(post_id = %post_id, comment_id = %comment_id, "comment deleted");

        self.load(&post_id).await;
        Ok(())
    }

    /// 閲覧者がいいねした投稿 ID（新しい順）。未サインインなら空。
    pub async fn liked_posts(&self) -> Result<Vec<PostId>, AppError> {
        match self.identity.current_user() {
            Some(viewer) => self.store.liked_post_ids(&viewer.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// 閲覧者が保存した投稿 ID（新しい順）。未サインインなら空。
    pub async fn saved_posts(&self) -> Result<Vec<PostId>, AppError> {
        match self.identity.current_user() {
            Some(viewer) => self.store.saved_post_ids(&viewer.id).await,
            None => Ok(Vec::new()),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.current_user().is_some()
    }

    pub fn is_liked(&self, post_id: impl Into<PostId>) -> bool {
        self.cache
            .read(&post_id.into(), |entry| entry.like.is_liked)
            .unwrap_or(false)
    }

    pub fn is_saved(&self, post_id: impl Into<PostId>) -> bool {
        self.cache
            .read(&post_id.into(), |entry| entry.saved)
            .unwrap_or(false)
    }

    pub fn likes_count(&self, post_id: impl Into<PostId>) -> u64 {
        self.cache
            .read(&post_id.into(), |entry| entry.like.count)
            .unwrap_or(0)
    }

    pub fn comments(&self, post_id: impl Into<PostId>) -> Vec<Comment> {
        self.cache
            .read(&post_id.into(), |entry| entry.comments.clone())
            .unwrap_or_default()
    }

    pub fn is_loading(&self, post_id: impl Into<PostId>) -> bool {
        self.cache
            .read(&post_id.into(), |entry| entry.loading)
            .unwrap_or(false)
    }

    pub fn toggle_phase(&self, post_id: impl Into<PostId>, kind: ToggleKind) -> TogglePhase {
        self.cache
            .read(&post_id.into(), |entry| entry.phase(kind))
            .unwrap_or_default()
    }

    /// 1 投稿分の表示用スナップショット。未読込なら既定値。
    pub fn snapshot(&self, post_id: impl Into<PostId>) -> PostInteractions {
        self.cache
            .read(&post_id.into(), |entry| entry.clone())
            .unwrap_or_default()
    }

    /// サインイン中のユーザーが変わったときに呼ぶ。進行中の操作の書き込みは捨てられる。
    pub fn clear_cache(&self) {
        let removed = self.cache.clear();
        info!(removed, "cleared interaction cache");
    }

    pub fn cached_posts(&self) -> usize {
        self.cache.len()
    }
}
