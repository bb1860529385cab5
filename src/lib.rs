//! site-i18n
//!
//! エージェンシーサイト向けの翻訳サービス。ロケールバンドルの遅延読み込み・
//! キャッシュ・フォールバック・言語設定の永続化を提供します。

pub mod config;
pub mod coverage;
pub mod error;
pub mod input;
pub mod service;
pub mod storage;
pub mod types;

mod test_utils;

pub use error::I18nError;
pub use service::TranslationService;
pub use types::Locale;
