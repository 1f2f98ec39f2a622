// crates/types/src/lib.rs
//! Schema of the public site configuration record.
//!
//! Everything here is safe to publish: the record is shipped to browsers as a
//! static asset, so no type in this crate may ever carry secret material.

pub mod endpoint;
pub mod error;
pub mod model;
pub mod provider;
pub mod record;

pub use endpoint::ChatEndpoint;
pub use error::{redact, SchemaError};
pub use model::ModelId;
pub use provider::{AiProvider, ProviderSubtype};
pub use record::{ConfigRecord, DEFAULT_CHAT_URL, DEFAULT_MODEL, FIELD_KEYS};
