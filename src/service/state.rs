//! アクティブセッションの状態
//!
//! 選択中のロケール・表示中のバンドル・読み込み状態を保持します。
//! 読み込み結果はリクエストトークンが最新の場合にのみ反映されます（後勝ち）。

use std::sync::Arc;

use crate::input::bundle::Bundle;
use crate::types::Locale;

/// Lifecycle of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No locale detected or requested yet
    Uninitialized,
    /// A bundle load for this locale is in flight
    Loading(Locale),
    /// The active bundle belongs to this locale
    Ready(Locale),
}

/// Mutable session state, owned by the service behind a lock.
#[derive(Debug)]
pub(crate) struct SessionState {
    /// Most recently requested locale
    pub(crate) locale: Locale,
    /// Bundle currently used by lookups
    pub(crate) bundle: Arc<Bundle>,
    /// 現在のフェーズ
    pub(crate) phase: SessionPhase,
    /// Token of the most recent accepted request
    latest_token: u64,
}

impl SessionState {
    /// Uninitialized state showing the empty bundle.
    pub(crate) fn new(initial: Locale) -> Self {
        Self {
            locale: initial,
            bundle: Arc::new(Bundle::empty()),
            phase: SessionPhase::Uninitialized,
            latest_token: 0,
        }
    }

    /// A load is in flight
    pub(crate) const fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Loading(_))
    }

    /// Startup transition `Uninitialized -> Loading(locale)`.
    ///
    /// Returns `None` once the session has left `Uninitialized`.
    pub(crate) fn start(&mut self, locale: Locale) -> Option<u64> {
        if self.phase != SessionPhase::Uninitialized {
            return None;
        }
        Some(self.issue(locale))
    }

    /// Request `locale`, superseding any in-flight load.
    ///
    /// Returns `None` when `locale` is already the selected locale.
    pub(crate) fn begin(&mut self, locale: Locale) -> Option<u64> {
        if self.phase != SessionPhase::Uninitialized && self.locale == locale {
            return None;
        }
        Some(self.issue(locale))
    }

    /// Apply a finished load. Stale tokens are discarded.
    pub(crate) fn commit(&mut self, token: u64, locale: Locale, bundle: Arc<Bundle>) -> bool {
        if token != self.latest_token {
            return false;
        }
        self.bundle = bundle;
        self.phase = SessionPhase::Ready(locale);
        true
    }

    /// Enter `Loading(locale)` under a fresh token
    fn issue(&mut self, locale: Locale) -> u64 {
        self.latest_token += 1;
        self.locale = locale;
        self.phase = SessionPhase::Loading(locale);
        self.latest_token
    }
}
