//! `X.Y.Z+B` version records

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use regex::Regex;

use crate::error::{OptikitError, OptikitResult};

/// Which semantic component to bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Major => write!(f, "major"),
            Self::Minor => write!(f, "minor"),
            Self::Patch => write!(f, "patch"),
        }
    }
}

/// Semantic version plus build number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionRecord {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build_number: u64,
}

impl VersionRecord {
    pub fn new(major: u64, minor: u64, patch: u64, build_number: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build_number,
        }
    }

    /// Parse exactly `X.Y.Z+B`; no surrounding text is tolerated
    pub fn parse(text: &str) -> OptikitResult<Self> {
        let re = Regex::new(r"^(\d+)\.(\d+)\.(\d+)\+(\d+)$")?;
        let caps = re
            .captures(text)
            .ok_or_else(|| OptikitError::InvalidVersion(text.to_string()))?;

        let component = |i: usize| {
            caps[i]
                .parse::<u64>()
                .map_err(|_| OptikitError::InvalidVersion(text.to_string()))
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
            build_number: component(4)?,
        })
    }

    /// New record with `kind` bumped; every bump also advances the build number
    pub fn increment(&self, kind: BumpKind) -> OptikitResult<Self> {
        let build_number = self.bumped(self.build_number, "build number")?;
        Ok(match kind {
            BumpKind::Major => Self::new(self.bumped(self.major, "major")?, 0, 0, build_number),
            BumpKind::Minor => {
                Self::new(self.major, self.bumped(self.minor, "minor")?, 0, build_number)
            }
            BumpKind::Patch => Self::new(
                self.major,
                self.minor,
                self.bumped(self.patch, "patch")?,
                build_number,
            ),
        })
    }

    /// Same semantic version, next build number
    pub fn next_build(&self) -> OptikitResult<Self> {
        Ok(Self {
            build_number: self.bumped(self.build_number, "build number")?,
            ..*self
        })
    }

    fn bumped(&self, value: u64, component: &str) -> OptikitResult<u64> {
        value.checked_add(1).ok_or_else(|| {
            OptikitError::Validation(format!(
                "Cannot increment {} of version {}: value is already at its maximum",
                component, self
            ))
        })
    }

    /// `X.Y.Z` without the build number
    pub fn semver(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}+{}",
            self.major, self.minor, self.patch, self.build_number
        )
    }
}

impl FromStr for VersionRecord {
    type Err = OptikitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
