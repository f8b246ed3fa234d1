use crate::application::ports::IdentitySource;
use crate::domain::entities::Viewer;
use tokio::sync::watch;
use tracing::info;

/// プロセス内で保持するサインイン状態。
///
/// 実際の認証は外部のプロバイダが行い、その結果をここへ反映する。
pub struct SessionIdentity {
    current: watch::Sender<Option<Viewer>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn signed_in(viewer: Viewer) -> Self {
        let identity = Self::new();
        identity.sign_in(viewer);
        identity
    }

    pub fn sign_in(&self, viewer: Viewer) {
        info!(user_id = %viewer.id, "signed in");
        self.current.send_replace(Some(viewer));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.current.send_replace(None) {
            info!(user_id = %previous.id, "signed out");
        }
    }

    /// 表示名の変更。ユーザーは変わらないので購読側へは通知しない。
    pub fn update_display_name(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        self.current.send_if_modified(|current| {
            if let Some(viewer) = current.as_mut() {
                viewer.display_name = Some(name);
            }
            false
        });
        self.current.borrow().is_some()
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentitySource for SessionIdentity {
    fn current_user(&self) -> Option<Viewer> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Viewer>> {
        self.current.subscribe()
    }
}
