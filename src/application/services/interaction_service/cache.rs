use crate::domain::entities::{
    LikeState, LoadedInteractions, PostInteractions, ToggleKind, TogglePhase,
};
use crate::domain::value_objects::PostId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 投稿ごとのインタラクション状態を保持するキャッシュ。
///
/// ロックは await を跨いで保持しない。完了時の書き込みは開始時に受け取った
/// `generation` を添えて行い、その間に `clear` されていれば何もしない。
#[derive(Default)]
pub(super) struct InteractionCache {
    inner: RwLock<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    generation: u64,
    entries: HashMap<PostId, PostInteractions>,
}

impl CacheInner {
    fn entry_mut(&mut self, post_id: &PostId, generation: u64) -> Option<&mut PostInteractions> {
        if self.generation != generation {
            return None;
        }
        self.entries.get_mut(post_id)
    }
}

/// トグル開始前の値。巻き戻しの再読込も失敗したときに書き戻す
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PriorValue {
    Like(LikeState),
    Save(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ToggleStart {
    /// 楽観値を書き込んだ。以降の書き込みには `generation` を使う
    Started {
        generation: u64,
        optimistic: bool,
        prior: PriorValue,
    },
    /// 同じ種類のトグルが進行中。現在のキャッシュ値を返すだけ
    Busy { current: bool },
}

impl InteractionCache {
    fn read_inner(&self) -> RwLockReadGuard<'_, CacheInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, CacheInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn read<R>(&self, post_id: &PostId, f: impl FnOnce(&PostInteractions) -> R) -> Option<R> {
        self.read_inner().entries.get(post_id).map(f)
    }

    pub(super) fn begin_load(&self, post_id: &PostId) -> u64 {
        let mut inner = self.write_inner();
        let generation = inner.generation;
        inner.entries.entry(post_id.clone()).or_default().loading = true;
        generation
    }

    /// `loaded` が `None`（読込失敗）のときは既存の値を残し、読込中フラグだけ下ろす。
    pub(super) fn finish_load(
        &self,
        post_id: &PostId,
        generation: u64,
        loaded: Option<LoadedInteractions>,
    ) {
        let mut inner = self.write_inner();
        if let Some(entry) = inner.entry_mut(post_id, generation) {
            if let Some(loaded) = loaded {
                entry.apply_loaded(loaded);
            }
            entry.loading = false;
        }
    }

    pub(super) fn begin_toggle(&self, post_id: &PostId, kind: ToggleKind) -> ToggleStart {
        let mut inner = self.write_inner();
        let generation = inner.generation;
        let entry = inner.entries.entry(post_id.clone()).or_default();

        if !entry.phase(kind).is_idle() {
            return ToggleStart::Busy {
                current: entry.is_active(kind),
            };
        }

        entry.set_phase(kind, TogglePhase::Pending);
        let (optimistic, prior) = match kind {
            ToggleKind::Like => {
                let prior = entry.like;
                entry.like = prior.toggled();
                (entry.like.is_liked, PriorValue::Like(prior))
            }
            ToggleKind::Save => {
                let prior = entry.saved;
                entry.saved = !prior;
                (entry.saved, PriorValue::Save(prior))
            }
        };

        ToggleStart::Started {
            generation,
            optimistic,
            prior,
        }
    }

    pub(super) fn settle_like(&self, post_id: &PostId, generation: u64, like: LikeState) {
        if let Some(entry) = self.write_inner().entry_mut(post_id, generation) {
            entry.like = like;
        }
    }

    pub(super) fn settle_save(&self, post_id: &PostId, generation: u64, saved: bool) {
        if let Some(entry) = self.write_inner().entry_mut(post_id, generation) {
            entry.saved = saved;
        }
    }

    pub(super) fn mark_rolling_back(&self, post_id: &PostId, kind: ToggleKind, generation: u64) {
        if let Some(entry) = self.write_inner().entry_mut(post_id, generation) {
            entry.set_phase(kind, TogglePhase::RollingBack);
        }
    }

    pub(super) fn restore(&self, post_id: &PostId, generation: u64, prior: PriorValue) {
        if let Some(entry) = self.write_inner().entry_mut(post_id, generation) {
            match prior {
                PriorValue::Like(like) => entry.like = like,
                PriorValue::Save(saved) => entry.saved = saved,
            }
        }
    }

    pub(super) fn finish_toggle(&self, post_id: &PostId, kind: ToggleKind, generation: u64) {
        if let Some(entry) = self.write_inner().entry_mut(post_id, generation) {
            entry.set_phase(kind, TogglePhase::Idle);
        }
    }

    /// 全エントリを破棄し、進行中の操作からの書き込みを無効にする。
    pub(super) fn clear(&self) -> usize {
        let mut inner = self.write_inner();
        inner.generation = inner.generation.wrapping_add(1);
        let removed = inner.entries.len();
        inner.entries.clear();
        removed
    }

    pub(super) fn len(&self) -> usize {
        self.read_inner().entries.len()
    }
}

/// トグル終了時に必ず `Idle` へ戻すためのガード。
/// future が途中で drop されても保留状態が残らない。
pub(super) struct ToggleGuard<'a> {
    cache: &'a InteractionCache,
    post_id: PostId,
    kind: ToggleKind,
    generation: u64,
}

impl<'a> ToggleGuard<'a> {
    pub(super) fn new(
        cache: &'a InteractionCache,
        post_id: &PostId,
        kind: ToggleKind,
        generation: u64,
    ) -> Self {
        Self {
            cache,
            post_id: post_id.clone(),
            kind,
            generation,
        }
    }
}

impl Drop for ToggleGuard<'_> {
    fn drop(&mut self) {
        self.cache
            .finish_toggle(&self.post_id, self.kind, self.generation);
    }
}
