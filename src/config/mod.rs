mod checksums;
mod key;
mod parser;
mod serialization;

pub use checksums::ChecksumSet;
pub use key::SerializationKey;
pub use parser::SerializationConfigParser;
pub use serialization::{
    SerializationConfig, SerializationEntry,
    CHECKSUM_KEY, CUSTOM_TARGET_CONSTRUCTOR_CLASS_KEY, NAME_KEY,
};
