use crate::application::ports::{IdentitySource, InteractionStore};
use crate::application::services::InteractionService;
use crate::domain::entities::Viewer;
use crate::domain::value_objects::UserId;
use crate::infrastructure::database::{ConnectionPool, SqliteInteractionStore};
use crate::infrastructure::identity::SessionIdentity;
use crate::presentation::handlers::InteractionHandler;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db_pool: ConnectionPool,
    pub identity: Arc<SessionIdentity>,
    pub interaction_service: Arc<InteractionService>,
    pub interaction_handler: Arc<InteractionHandler>,
    identity_watcher: Arc<JoinHandle<()>>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().map_err(AppError::Configuration)?;

        let db_pool = ConnectionPool::from_config(&config.database)
            .await
            .with_context(|| format!("Failed to open database {}", config.database.url))?;
        Self::with_pool(config, db_pool).await
    }

    /// 既存のプールから組み立てる（テストではインメモリ DB を渡す）
    pub async fn with_pool(config: AppConfig, db_pool: ConnectionPool) -> anyhow::Result<Self> {
        let store = SqliteInteractionStore::new(db_pool.clone());
        store
            .initialize()
            .await
            .context("Failed to run database migrations")?;

        let identity = Arc::new(SessionIdentity::new());
        let interaction_service = Arc::new(InteractionService::new(
            Arc::new(store) as Arc<dyn InteractionStore>,
            Arc::clone(&identity) as Arc<dyn IdentitySource>,
        ));
        let interaction_handler = Arc::new(InteractionHandler::new(
            Arc::clone(&interaction_service),
            config.comments.max_length,
        ));

        let identity_watcher =
            spawn_identity_watcher(identity.subscribe(), Arc::clone(&interaction_service));

        info!("application state initialized");
        Ok(Self {
            config: Arc::new(config),
            db_pool,
            identity,
            interaction_service,
            interaction_handler,
            identity_watcher: Arc::new(identity_watcher),
        })
    }

    pub async fn shutdown(&self) {
        self.identity_watcher.abort();
        self.db_pool.close().await;
        debug!("application state shut down");
    }
}

fn user_id_of(viewer: &Option<Viewer>) -> Option<UserId> {
    viewer.as_ref().map(|v| v.id.clone())
}

/// サインイン中のユーザーが変わったらキャッシュを破棄する。
/// 表示名などの変更ではユーザー ID が同じなので何もしない。
fn spawn_identity_watcher(
    mut receiver: watch::Receiver<Option<Viewer>>,
    service: Arc<InteractionService>,
) -> JoinHandle<()> {
    let mut current = user_id_of(&receiver.borrow_and_update());

    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let next = user_id_of(&receiver.borrow_and_update());
            if next != current {
                info!(
                    previous = ?current.as_ref().map(UserId::as_str),
                    next = ?next.as_ref().map(UserId::as_str),
                    "signed-in user changed"
                );
                service.clear_cache();
                current = next;
            }
        }
        debug!("identity source closed, stopping watcher");
    })
}
