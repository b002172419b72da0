//! Global identity tokens.

use std::fmt;

/// Durable handle identifying an object across editing contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalId {
    /// Assigned to newly inserted objects until they are saved
    Temporary(u64),
    /// Entity name plus integral primary key
    Permanent { entity_name: String, key: i64 },
}

impl GlobalId {
    pub fn permanent(entity_name: impl Into<String>, key: i64) -> Self {
        GlobalId::Permanent {
            entity_name: entity_name.into(),
            key,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, GlobalId::Temporary(_))
    }

    /// Entity name of a permanent id.
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            GlobalId::Permanent { entity_name, .. } => Some(entity_name),
            GlobalId::Temporary(_) => None,
        }
    }

    /// Primary key of a permanent id.
    pub fn key(&self) -> Option<i64> {
        match self {
            GlobalId::Permanent { key, .. } => Some(*key),
            GlobalId::Temporary(_) => None,
        }
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalId::Temporary(serial) => write!(f, "<temporary {}>", serial),
            GlobalId::Permanent { entity_name, key } => write!(f, "{}[{}]", entity_name, key),
        }
    }
}
