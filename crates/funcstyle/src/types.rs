//! Run direction, shared by the CLI, the config loader and every transformer

use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer};

/// Direction of a restyling run
///
/// Selects which branch of the identifier and comment transformers is active
/// and in which direction the exception dictionary is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// `snake_case?` FunC style to `camelCase` style (CLI mode `1`)
    #[default]
    ToCamel,

    /// `camelCase` style back to `snake_case?` FunC style (CLI mode `2`)
    ToSnake,
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    /// Accepts the numeric modes of the original command line (`1`, `2`)
    /// as well as the descriptive names.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" | "camel" | "to-camel" | "snake-to-camel" => Ok(Direction::ToCamel),
            "2" | "snake" | "to-snake" | "camel-to-snake" => Ok(Direction::ToSnake),
            other => bail!("unknown mode '{other}', expected 1/camel or 2/snake"),
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Name(String),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n.to_string(),
            Raw::Name(name) => name,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::ToCamel => write!(f, "snake -> camel"),
            Direction::ToSnake => write!(f, "camel -> snake"),
        }
    }
}
