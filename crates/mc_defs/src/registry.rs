//! Macro registry: one owned `MacroDefinition` per name.
//!
//! A name may be redefined by a later source only when the two origin scopes
//! are nested (a more specific directory overriding a more general one), or
//! when the configured `OverridePolicy` allows the pair.

use std::collections::HashMap;
use std::path::Path;

use mc_ast::MacroDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::parse_definitions;
use crate::error::DefinitionError;

/// One allowlisted cross-tree override. Every field that is set must be a
/// substring of the corresponding scope for the rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideRule {
    pub new_scope_contains: Option<String>,
    pub previous_scope_contains: Option<String>,
}

impl OverrideRule {
    pub fn matches(&self, new_scope: &Path, previous_scope: &Path) -> bool {
        if self.new_scope_contains.is_none() && self.previous_scope_contains.is_none() {
            return false;
        }
        let contains = |scope: &Path, needle: &Option<String>| match needle {
            Some(needle) => scope.to_string_lossy().contains(needle.as_str()),
            None => true,
        };
        contains(new_scope, &self.new_scope_contains)
            && contains(previous_scope, &self.previous_scope_contains)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverridePolicy {
    pub rules: Vec<OverrideRule>,
}

impl OverridePolicy {
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    pub fn permits(&self, new_scope: &Path, previous_scope: &Path) -> bool {
        new_scope.starts_with(previous_scope)
            || previous_scope.starts_with(new_scope)
            || self
                .rules
                .iter()
                .any(|rule| rule.matches(new_scope, previous_scope))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    /// First-seen order, for iteration only.
    order: Vec<String>,
    macros: HashMap<String, MacroDefinition>,
    policy: OverridePolicy,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: OverridePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Parse one definition file and merge it.
    pub fn load(&mut self, path: &Path) -> Result<(), DefinitionError> {
        let defs = parse_definitions(path)?;
        self.merge(defs)
    }

    /// Load every file in order; later files override earlier ones where allowed.
    pub fn load_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), DefinitionError> {
        for path in paths {
            self.load(path.as_ref())?;
        }
        Ok(())
    }

    /// Merge already-parsed definitions. Either all of them are accepted or
    /// the registry is left untouched.
    pub fn merge(&mut self, defs: Vec<MacroDefinition>) -> Result<(), DefinitionError> {
        for def in &defs {
            if let Some(previous) = self.macros.get(&def.name) {
                if !self.policy.permits(&def.origin_scope, &previous.origin_scope) {
                    return Err(DefinitionError::RedefinitionConflict {
                        name: def.name.clone(),
                        previous_scope: previous.origin_scope.clone(),
                        new_scope: def.origin_scope.clone(),
                    });
                }
            }
        }

        for def in defs {
            match self.macros.get(&def.name) {
                Some(previous) => debug!(
                    name = %def.name,
                    from = %previous.origin_scope.display(),
                    to = %def.origin_scope.display(),
                    "overriding macro"
                ),
                None => self.order.push(def.name.clone()),
            }
            self.macros.insert(def.name.clone(), def);
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&MacroDefinition> {
        self.macros.get(name)
    }

    /// Definitions in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &MacroDefinition> {
        self.order.iter().filter_map(|name| self.macros.get(name))
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
