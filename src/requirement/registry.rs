//! Process-wide catalog of requirement variants
//!
//! Maps a textual type name to construction metadata. Populated once at
//! startup by [`RequirementRegistry::register_builtins`]; a reload builds a
//! fresh registry and swaps the reference, so reads between reloads see an
//! effectively immutable catalog.

use crate::core::error::Result;
use crate::requirement::variants;
use crate::requirement::{Amount, AmountFormat, Requirement, RequirementKind};
use ahash::AHashMap;

/// Builds one requirement instance from its validated parameter tokens
/// (identifiers only, amount token excluded) and the parsed amount.
pub type ConstructorFn = fn(params: &[&str], amount: Amount) -> Result<Box<dyn Requirement>>;

/// Registry metadata for one requirement variant
///
/// `min_params`/`max_params` count the tokens after the type name, amount
/// token included; `max_params == usize::MAX` means unbounded.
#[derive(Clone)]
pub struct RequirementDefinition {
    pub name: &'static str,
    pub kind: RequirementKind,
    pub min_params: usize,
    pub max_params: usize,
    pub usage: &'static str,
    pub amount_format: AmountFormat,
    pub ctor: ConstructorFn,
}

impl std::fmt::Debug for RequirementDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequirementDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("min_params", &self.min_params)
            .field("max_params", &self.max_params)
            .field("usage", &self.usage)
            .finish()
    }
}

/// Name-keyed catalog of requirement definitions
#[derive(Debug, Default)]
pub struct RequirementRegistry {
    definitions: AHashMap<String, RequirementDefinition>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every built-in variant
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Record one variant's metadata.
    ///
    /// A definition whose arity bounds are inverted is rejected with a log
    /// line instead of poisoning the catalog. Duplicate names overwrite:
    /// last registration wins, logged at WARN so an operator can spot an
    /// accidental shadowing.
    pub fn register(&mut self, definition: RequirementDefinition) {
        if definition.min_params > definition.max_params {
            tracing::error!(
                "Skipping requirement '{}': min_params {} exceeds max_params {}",
                definition.name,
                definition.min_params,
                definition.max_params
            );
            return;
        }

        let key = definition.name.to_ascii_lowercase();
        if let Some(previous) = self.definitions.insert(key, definition) {
            tracing::warn!(
                "Requirement '{}' registered twice; replacing '{}'",
                previous.name,
                previous.usage
            );
        }
    }

    /// One-time bulk registration of the built-in variants; returns the
    /// number registered.
    pub fn register_builtins(&mut self) -> usize {
        let definitions = variants::builtin_definitions();
        let count = definitions.len();
        for definition in definitions {
            self.register(definition);
        }
        tracing::info!("Registered {count} requirement types");
        count
    }

    /// Case-insensitive lookup by type name
    pub fn lookup(&self, name: &str) -> Option<&RequirementDefinition> {
        self.definitions.get(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
