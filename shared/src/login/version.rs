use std::{fmt, str::FromStr};

use crate::login::error::VersionError;

/// Version of the game engine, compared exactly during login
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineVersion {
    major: u32,
    minor: u32,
    point: u32,
    micro: u32,
}

impl EngineVersion {
    pub const fn new(major: u32, minor: u32, point: u32) -> Self {
        Self {
            major,
            minor,
            point,
            micro: 0,
        }
    }

    pub const fn with_micro(self, micro: u32) -> Self {
        Self { micro, ..self }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn point(&self) -> u32 {
        self.point
    }

    pub fn micro(&self) -> u32 {
        self.micro
    }
}

impl FromStr for EngineVersion {
    type Err = VersionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let malformed = || VersionError::Malformed {
            raw: raw.to_string(),
        };
        let parts = trimmed
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<Vec<u32>, VersionError>>()?;

        match parts.as_slice() {
            [major, minor] => Ok(Self::new(*major, *minor, 0)),
            [major, minor, point] => Ok(Self::new(*major, *minor, *point)),
            [major, minor, point, micro] => {
                Ok(Self::new(*major, *minor, *point).with_micro(*micro))
            }
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.point)?;
        if self.micro != 0 {
            write!(f, ".{}", self.micro)?;
        }
        Ok(())
    }
}
