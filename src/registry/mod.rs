use crate::error::RegistryError;
use crate::graph::model::{Outputs, Params, SEED_PARAM, param_u64, single_output};
use ahash::AHashMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;

pub mod kinds;
pub mod ports;

use kinds::{create_builtin_by_kind, register_builtin_transforms};
pub use ports::{Direction, Inputs, Port, PortShape};

/// Whether a kind's output is a pure function of its inputs and params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Behavior {
    Deterministic,
    /// Output also depends on a seed that only changes on an explicit regenerate request.
    Regenerative,
}

/// Where a kind sits in a flow, used to group the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Source,
    Transformer,
    Destination,
}

/// The contract every node kind satisfies.
///
/// Both methods must be pure: the engine may call them any number of times and relies on
/// identical arguments producing identical results.
pub trait Transform: Send + Sync {
    fn kind(&self) -> &str;
    fn label(&self) -> &str;
    fn description(&self) -> &str;

    fn category(&self) -> Category {
        Category::Transformer
    }

    fn behavior(&self) -> Behavior {
        Behavior::Deterministic
    }

    /// User-facing parameters a freshly created node starts with.
    fn default_params(&self) -> Params {
        Params::new()
    }

    /// Output cached when the kind has input ports but none of them is connected.
    fn empty(&self, _params: &Params) -> Outputs {
        single_output("")
    }

    fn resolve_ports(&self, params: &Params, inputs: &Inputs) -> PortShape;

    fn evaluate(&self, inputs: &Inputs, params: &Params) -> Outputs;
}

/// Derives the random generator of a regenerative node from its stored seed.
pub fn seeded_rng(params: &Params) -> StdRng {
    StdRng::seed_from_u64(param_u64(params, SEED_PARAM).unwrap_or_default())
}

/// Metadata describing one registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub kind: String,
    pub label: String,
    pub category: Category,
    pub behavior: Behavior,
    pub description: String,
}

/// The immutable catalog of node kinds.
pub struct Registry {
    transforms: AHashMap<String, Box<dyn Transform>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A shareable registry holding every built-in kind.
    pub fn with_defaults() -> Arc<Self> {
        Arc::new(RegistryBuilder::new().build())
    }

    pub fn get(&self, kind: &str) -> Result<&dyn Transform, RegistryError> {
        self.transforms
            .get(kind)
            .map(|t| t.as_ref())
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.transforms.contains_key(kind)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Every registered kind, grouped by category and sorted by kind name.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .transforms
            .iter()
            .map(|(kind, t)| CatalogEntry {
                kind: kind.clone(),
                label: t.label().to_string(),
                category: t.category(),
                behavior: t.behavior(),
                description: t.description().to_string(),
            })
            .collect();
        entries.sort_by(|a, b| (a.category, &a.kind).cmp(&(b.category, &b.kind)));
        entries
    }
}

pub struct RegistryBuilder {
    transforms: AHashMap<String, Box<dyn Transform>>,
    errors: Vec<RegistryError>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut transforms: AHashMap<String, Box<dyn Transform>> = AHashMap::new();
        register_builtin_transforms(&mut transforms);
        Self {
            transforms,
            errors: Vec::new(),
        }
    }

    /// Starts from an empty catalog instead of the built-in kinds.
    pub fn empty() -> Self {
        Self {
            transforms: AHashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Makes a built-in kind reachable under another name.
    pub fn with_alias(mut self, user_kind: &str, builtin_kind: &str) -> Self {
        match create_builtin_by_kind(builtin_kind) {
            Some(transform) => {
                self.transforms.insert(user_kind.to_string(), transform);
            }
            None => self.errors.push(RegistryError::InvalidAlias {
                alias: user_kind.to_string(),
                target: builtin_kind.to_string(),
            }),
        }
        self
    }

    /// Registers a custom kind, replacing any kind with the same name.
    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms
            .insert(transform.kind().to_string(), transform);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            transforms: self.transforms,
        }
    }

    /// Like [`build`](Self::build), but fails on the first alias that named no built-in kind.
    pub fn try_build(self) -> Result<Registry, RegistryError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(Registry {
                transforms: self.transforms,
            }),
        }
    }
}
