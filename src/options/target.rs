//! Build targets
//!
//! Target names are project-defined, so the set of valid targets is only
//! known once the configuration has been read. A [`TargetRegistry`] is built
//! once per run from `native` plus the keys of the `[targets]` table, and a
//! [`BuildTarget`] can only be obtained through it.

use std::fmt;
use toml::Table;

/// Key of the target that always exists
pub const NATIVE: &str = "native";

/// A validated build target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTarget {
    key: String,
}

impl BuildTarget {
    pub fn native() -> Self {
        Self {
            key: NATIVE.to_string(),
        }
    }

    /// Lower-case key used for configuration lookups and folder names
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Capitalised display name, e.g. `Native` or `Linux`
    pub fn name(&self) -> String {
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.key == NATIVE
    }
}

impl Default for BuildTarget {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// The set of targets known for this run
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: Vec<BuildTarget>,
}

impl TargetRegistry {
    /// Registry with only the `native` target
    pub fn new() -> Self {
        Self {
            targets: vec![BuildTarget::native()],
        }
    }

    /// Registry with `native` plus every key of the `[targets]` table
    pub fn from_table(targets: Option<&Table>) -> Self {
        let mut registry = Self::new();
        for name in targets.into_iter().flat_map(|t| t.keys()) {
            registry.register(name);
        }
        registry
    }

    /// Adds a target; names are case-insensitive and registered once
    pub fn register(&mut self, name: &str) {
        let key = name.to_lowercase();
        if self.targets.iter().all(|t| t.key != key) {
            self.targets.push(BuildTarget { key });
        }
    }

    /// Finds a target by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&BuildTarget> {
        let key = name.to_lowercase();
        self.targets.iter().find(|t| t.key == key)
    }

    pub fn all(&self) -> &[BuildTarget] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Default for TargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
