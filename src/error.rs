/// Error types shared by the storage, platform and feature layers
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures talking to the synchronized key-value store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("read of {key:?} failed: {reason}")]
    Read { key: String, reason: String },

    #[error("write of {key:?} failed: {reason}")]
    Write { key: String, reason: String },

    /// The stored value could not cross the JS boundary
    #[error("value for {key:?} could not be converted: {reason}")]
    Convert { key: String, reason: String },
}

/// Failures reported by browser APIs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("browser API not available: {0}")]
    ApiNotFound(String),

    #[error("could not attach {event} listener: {reason}")]
    Listener { event: String, reason: String },

    #[error("could not open {url}: {reason}")]
    Open { url: String, reason: String },
}

/// A feature handler failed; the dispatcher treats this as "not claimed"
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{0}")]
    Other(String),
}

/// A site's URL predicate failed; the site is treated as not matching
#[derive(Error, Debug, Clone, PartialEq)]
#[error("match failed for {url:?}: {reason}")]
pub struct MatchError {
    pub url: String,
    pub reason: String,
}

/// Render a thrown JS value for logs and error payloads
pub(crate) fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
