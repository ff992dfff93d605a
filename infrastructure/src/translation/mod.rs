//! Translation backend adapters

#[cfg(feature = "remote-translation")]
mod libretranslate;
mod offline;

#[cfg(feature = "remote-translation")]
pub use libretranslate::LibreTranslateBackend;
pub use offline::OfflineBackend;
