//! Explicit registry from kind to its id pattern and rule set.
//!
//! Populated once at process start; there is no runtime lookup from kind
//! name to model type beyond this map.

use std::collections::BTreeMap;

use vigil_core::entities::{Entity, Kind};
use vigil_store::DocumentStore;

use crate::check::Check;
use crate::error::AuditError;
use crate::rules::{CurrentTime, ModelIdPattern, TimeFieldRelation};
use crate::ruleset::RuleSet;

/// Everything the auditor knows about one kind.
#[derive(Debug)]
pub struct KindSpec {
    kind: Kind,
    id_pattern: String,
    rules: RuleSet,
}

impl KindSpec {
    /// Start a spec for `kind`. Every spec begins with the time field
    /// relation, current time and model id checks.
    #[must_use]
    pub fn builder(kind: impl Into<Kind>, id_pattern: &str) -> KindSpecBuilder {
        KindSpecBuilder {
            kind: kind.into(),
            id_pattern: id_pattern.to_string(),
            checks: Vec::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    #[must_use]
    pub fn id_pattern(&self) -> &str {
        &self.id_pattern
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Fetch an entity of this kind.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn get_by_id(
        &self,
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<Entity>, AuditError> {
        Ok(store.get(&self.kind, id)?)
    }
}

/// Builder for [`KindSpec`].
pub struct KindSpecBuilder {
    kind: Kind,
    id_pattern: String,
    checks: Vec<Box<dyn Check>>,
}

impl KindSpecBuilder {
    /// Append a kind-specific check after the standard ones.
    #[must_use]
    pub fn check(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// # Errors
    ///
    /// Returns `AuditError::InvalidPattern` if the id pattern does not
    /// compile, or `AuditError::DuplicateCheck` if two checks share a name.
    pub fn build(self) -> Result<KindSpec, AuditError> {
        let mut rules = RuleSet::new();
        rules.push(Box::new(TimeFieldRelation))?;
        rules.push(Box::new(CurrentTime))?;
        rules.push(Box::new(ModelIdPattern::new(&self.id_pattern)?))?;
        for check in self.checks {
            rules.push(check).map_err(|e| match e {
                AuditError::DuplicateCheck(name) => {
                    AuditError::DuplicateCheck(format!("{name} ({})", self.kind))
                }
                other => other,
            })?;
        }
        Ok(KindSpec {
            kind: self.kind,
            id_pattern: self.id_pattern,
            rules,
        })
    }
}

/// All registered kinds, iterated in kind order.
#[derive(Debug, Default)]
pub struct KindRegistry {
    specs: BTreeMap<Kind, KindSpec>,
}

impl KindRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `AuditError::DuplicateKind` if the kind is already registered.
    pub fn register(&mut self, spec: KindSpec) -> Result<(), AuditError> {
        if self.specs.contains_key(spec.kind()) {
            return Err(AuditError::DuplicateKind(spec.kind().to_string()));
        }
        self.specs.insert(spec.kind().clone(), spec);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AuditError::UnknownKind` if no spec is registered for `kind`.
    pub fn get(&self, kind: &Kind) -> Result<&KindSpec, AuditError> {
        self.specs
            .get(kind)
            .ok_or_else(|| AuditError::UnknownKind(kind.to_string()))
    }

    #[must_use]
    pub fn contains(&self, kind: &Kind) -> bool {
        self.specs.contains_key(kind)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<Kind> {
        self.specs.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KindSpec> {
        self.specs.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
