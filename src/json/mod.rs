mod writer;

pub use writer::{JsonPrintable, JsonWriter, quote_string};
