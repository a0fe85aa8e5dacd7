use std::fmt;

/// Opaque clip identity, generated at load time; keys the pin registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClipId(String);

impl From<uuid::Uuid> for ClipId {
    fn from(value: uuid::Uuid) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
