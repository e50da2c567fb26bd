//! Persona value objects
//!
//! A [`Persona`] is the structured summary of one party: who they are, what
//! they need and how they communicate. [`Speaker`] names the two seats in a
//! conversation.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One side of a two-party conversation.
///
/// Serialized as `profile_1` / `profile_2` in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Speaker {
    #[default]
    #[serde(rename = "profile_1", alias = "a", alias = "A")]
    A,
    #[serde(rename = "profile_2", alias = "b", alias = "B")]
    B,
}

impl Speaker {
    /// The counterpart seat
    pub fn other(&self) -> Speaker {
        match self {
            Speaker::A => Speaker::B,
            Speaker::B => Speaker::A,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::A => "profile_1",
            Speaker::B => "profile_2",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a" | "1" | "profile_1" => Ok(Speaker::A),
            "b" | "2" | "profile_2" => Ok(Speaker::B),
            _ => Err(format!(
                "Unknown speaker: {}. Valid: a, b, profile_1, profile_2",
                s
            )),
        }
    }
}

/// A party taking part in a matching conversation (Value Object)
///
/// Immutable once constructed. All three fields must be non-blank; the
/// engine never sees a persona that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPersona")]
pub struct Persona {
    id: String,
    needs: String,
    personality: String,
}

/// Unvalidated persona as it appears in JSON files.
///
/// Older persona files use `name_id` instead of `id`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawPersona {
    #[serde(default, alias = "name_id")]
    id: String,
    #[serde(default)]
    needs: String,
    #[serde(default)]
    personality: String,
}

impl TryFrom<RawPersona> for Persona {
    type Error = DomainError;

    fn try_from(raw: RawPersona) -> Result<Self, Self::Error> {
        Persona::new(raw.id, raw.needs, raw.personality)
    }
}

impl Persona {
    /// Create a validated persona
    pub fn new(
        id: impl Into<String>,
        needs: impl Into<String>,
        personality: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let id = id.into().trim().to_string();
        let needs = needs.into().trim().to_string();
        let personality = personality.into().trim().to_string();

        let missing: Vec<&str> = [("id", &id), ("needs", &needs), ("personality", &personality)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();

        if !missing.is_empty() {
            return Err(DomainError::InvalidPersona(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            id,
            needs,
            personality,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn needs(&self) -> &str {
        &self.needs
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
