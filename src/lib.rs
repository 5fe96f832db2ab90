pub mod error;
pub mod json;
pub mod config;

pub use error::{SerialTraceError, Result};
pub use json::{JsonPrintable, JsonWriter, quote_string};
pub use config::{
    ChecksumSet, SerializationKey, SerializationConfig, SerializationEntry,
    SerializationConfigParser,
};
