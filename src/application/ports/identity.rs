use crate::domain::entities::Viewer;
use tokio::sync::watch;

/// 現在の閲覧者を提供するポート。
///
/// サービス層は操作のたびに `current_user` を読むだけで、自分では購読しない。
/// サインイン・サインアウトへの反応はセッションの持ち主（`AppState`）が行う。
pub trait IdentitySource: Send + Sync {
    fn current_user(&self) -> Option<Viewer>;

    fn subscribe(&self) -> watch::Receiver<Option<Viewer>>;
}
