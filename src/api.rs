//! Types shared across the public API: actions, build configurations and
//! command vectors.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An action to perform on the codebase
///
/// Each action is implemented by exactly one task in the
/// [`TaskRegistry`](crate::tasks::TaskRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Bootstrap,
    Configure,
    Build,
    Install,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bootstrap => "Bootstrap",
            Self::Configure => "Configure",
            Self::Build => "Build",
            Self::Install => "Install",
        }
    }

    pub fn all_variants() -> &'static [Self] {
        &[Self::Bootstrap, Self::Configure, Self::Build, Self::Install]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown action: {0}. Valid options: bootstrap, configure, build, install")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all_variants()
            .iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// Build configuration handed to the build system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuildConfig {
    #[default]
    Release,
    Debug,
}

impl BuildConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One external process invocation: the program followed by its arguments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandVector(Vec<String>);

impl CommandVector {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for CommandVector {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl fmt::Display for CommandVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl PartialEq<[&str]> for CommandVector {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for CommandVector {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}
