use super::comment::Comment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// いいね状態。`is_liked` は閲覧者自身の状態、`count` は全体の件数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikeState {
    pub is_liked: bool,
    pub count: u64,
}

impl LikeState {
    pub fn new(is_liked: bool, count: u64) -> Self {
        Self { is_liked, count }
    }

    /// 楽観的更新で表示する次の状態。件数は 0 未満にならない。
    pub fn toggled(self) -> Self {
        let is_liked = !self.is_liked;
        let count = if is_liked {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
        Self { is_liked, count }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleKind {
    Like,
    Save,
}

impl ToggleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleKind::Like => "like",
            ToggleKind::Save => "save",
        }
    }
}

impl fmt::Display for ToggleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 投稿・種類ごとのトグル要求の状態。
///
/// `Idle → Pending → Idle`（サーバー値で確定）または
/// `Idle → Pending → RollingBack → Idle`（失敗して再読込）。
/// `Idle` 以外の間に来たトグル要求は何もせずキャッシュ値を返す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TogglePhase {
    #[default]
    Idle,
    /// 楽観値を表示中でリモート要求の応答待ち
    Pending,
    /// リモート要求が失敗し、再読込で同期中
    RollingBack,
}

impl TogglePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, TogglePhase::Idle)
    }
}

/// ストアから読み込んだ確定値。キャッシュへは一度にまとめて反映する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedInteractions {
    pub like: LikeState,
    pub saved: bool,
    pub comments: Vec<Comment>,
}

/// 1 投稿分のキャッシュエントリ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostInteractions {
    pub like: LikeState,
    pub saved: bool,
    pub comments: Vec<Comment>,
    pub loading: bool,
    pub like_phase: TogglePhase,
    pub save_phase: TogglePhase,
}

impl PostInteractions {
    pub fn phase(&self, kind: ToggleKind) -> TogglePhase {
        match kind {
            ToggleKind::Like => self.like_phase,
            ToggleKind::Save => self.save_phase,
        }
    }

    pub fn set_phase(&mut self, kind: ToggleKind, phase: TogglePhase) {
        match kind {
            ToggleKind::Like => self.like_phase = phase,
            ToggleKind::Save => self.save_phase = phase,
        }
    }

    /// 閲覧者側の現在値
    pub fn is_active(&self, kind: ToggleKind) -> bool {
        match kind {
            ToggleKind::Like => self.like.is_liked,
            ToggleKind::Save => self.saved,
        }
    }

    pub fn apply_loaded(&mut self, loaded: LoadedInteractions) {
        self.like = loaded.like;
        self.saved = loaded.saved;
        self.comments = loaded.comments;
    }
}
