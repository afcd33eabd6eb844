use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Pinned region a render container draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerName {
    Body,
    Left,
    Right,
}

impl ContainerName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerName {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "body" => Ok(Self::Body),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(GridError::UnknownContainer(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_container_name_round_trip() {
        for name in [ContainerName::Body, ContainerName::Left, ContainerName::Right] {
            assert_eq!(name.as_str().parse::<ContainerName>().unwrap(), name);
        }
        assert!(matches!(
            "center".parse::<ContainerName>(),
            Err(GridError::UnknownContainer(_))
        ));
    }
}
