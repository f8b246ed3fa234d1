use std::sync::Arc;

use folio_lib::application::ports::{IdentitySource, InteractionStore};
use folio_lib::application::services::InteractionService;
use folio_lib::domain::entities::Viewer;
use folio_lib::domain::value_objects::UserId;
use folio_lib::infrastructure::database::{ConnectionPool, SqliteInteractionStore};
use folio_lib::infrastructure::identity::SessionIdentity;

pub struct InteractionTestContext {
    pub service: Arc<InteractionService>,
    pub identity: Arc<SessionIdentity>,
    pub pool: ConnectionPool,
}

pub fn viewer(id: &str) -> Viewer {
    Viewer::new(UserId::new(id.to_string()).expect("user id"))
}

pub async fn setup_with_pool(pool: ConnectionPool) -> InteractionTestContext {
    let store = SqliteInteractionStore::new(pool.clone());
    store.initialize().await.expect("migrations");

    let identity = Arc::new(SessionIdentity::new());
    let service = Arc::new(InteractionService::new(
        Arc::new(store) as Arc<dyn InteractionStore>,
        Arc::clone(&identity) as Arc<dyn IdentitySource>,
    ));

    InteractionTestContext {
        service,
        identity,
        pool,
    }
}

pub async fn setup_in_memory() -> InteractionTestContext {
    let pool = ConnectionPool::from_memory()
        .await
        .expect("in-memory sqlite");
    setup_with_pool(pool).await
}
