use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BurritoError;

/// The relation an alignment record expresses. Each type fixes the roles
/// its references are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentType {
    /// Generic relation between units, without roles.
    Related,
    Directed,
    /// A source text and its translation.
    #[default]
    Translation,
    Anaphora,
}

impl AlignmentType {
    pub fn tag(&self) -> &'static str {
        match self {
            AlignmentType::Related => "related",
            AlignmentType::Directed => "directed",
            AlignmentType::Translation => "translation",
            AlignmentType::Anaphora => "anaphora",
        }
    }

    pub fn roles(&self) -> &'static [&'static str] {
        match self {
            AlignmentType::Related => &[],
            AlignmentType::Directed => &["from", "to"],
            AlignmentType::Translation => &["source", "target"],
            AlignmentType::Anaphora => &["antecedent", "anaphor"],
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(&role)
    }
}

impl FromStr for AlignmentType {
    type Err = BurritoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "related" => Ok(AlignmentType::Related),
            "directed" => Ok(AlignmentType::Directed),
            "translation" => Ok(AlignmentType::Translation),
            "anaphora" => Ok(AlignmentType::Anaphora),
            other => Err(BurritoError::TypeMismatch {
                expected: "related|directed|translation|anaphora".into(),
                found: other.into(),
            }),
        }
    }
}

impl fmt::Display for AlignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_per_type() {
        assert!(AlignmentType::Related.roles().is_empty());
        assert_eq!(AlignmentType::Directed.roles(), &["from", "to"]);
        assert_eq!(AlignmentType::Translation.roles(), &["source", "target"]);
        assert_eq!(AlignmentType::Anaphora.roles(), &["antecedent", "anaphor"]);
        assert!(AlignmentType::Translation.has_role("target"));
        assert!(!AlignmentType::Translation.has_role("to"));
    }

    #[test]
    fn parses_tags() {
        assert_eq!("anaphora".parse::<AlignmentType>().unwrap(), AlignmentType::Anaphora);
        assert!(matches!(
            "quotation".parse::<AlignmentType>(),
            Err(BurritoError::TypeMismatch { .. })
        ));
        assert_eq!(AlignmentType::default().to_string(), "translation");
    }
}
