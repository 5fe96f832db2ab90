use std::fmt;

/// Identity of one accumulator entry: the serialized class plus the optional
/// class whose constructor is used on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SerializationKey {
    pub target_class: String,
    pub custom_constructor_class: Option<String>,
}

impl SerializationKey {
    pub fn new(target_class: impl Into<String>, custom_constructor_class: Option<&str>) -> Self {
        Self {
            target_class: target_class.into(),
            custom_constructor_class: custom_constructor_class.map(str::to_string),
        }
    }

    pub fn has_custom_constructor(&self) -> bool {
        self.custom_constructor_class.is_some()
    }
}

impl fmt::Display for SerializationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.custom_constructor_class {
            Some(ctor) => write!(f, "{} (constructor: {})", self.target_class, ctor),
            None => write!(f, "{}", self.target_class),
        }
    }
}
