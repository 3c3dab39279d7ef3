//! License registry: a directed graph of licenses, acceptance edges, and
//! guarded obligations.
//!
//! Licenses are looked up case-insensitively but keep their authored
//! spelling for display. Identifiers the registry does not know are treated
//! as maximally restrictive: they trigger copyleft, demand every known term,
//! and are compatible with nothing but themselves.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::{Distribution, RelationType};
use crate::licenses::conditional::{Conditional, Guard};

/// A named obligation a license can demand from its users.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Term {
    name: String,
    description: String,
}

impl Term {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Default)]
struct LicenseDef {
    name: String,
    /// Lowercase keys of licenses and terms this license accepts.
    accepted: BTreeSet<String>,
    /// Lowercase term keys, guarded by usage thresholds.
    demands: Vec<Conditional<String>>,
    /// Reciprocal floor; the value is the lowercase key of the license the
    /// copyleft counts as (usually itself, but e.g. an exception clause
    /// counts as its base license).
    copyleft: Option<Conditional<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct LicenseRegistry {
    terms: BTreeMap<String, Term>,
    licenses: BTreeMap<String, LicenseDef>,
}

impl LicenseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a demandable term; repeated registration keeps the first
    /// description.
    pub fn term(&mut self, name: &str, description: &str) {
        self.terms.entry(key(name)).or_insert_with(|| Term {
            name: name.to_owned(),
            description: description.to_owned(),
        });
    }

    /// Defines (or reopens) a license and returns a builder for it.
    pub fn license(&mut self, name: &str) -> LicenseBuilder<'_> {
        let k = key(name);
        self.licenses.entry(k.clone()).or_insert_with(|| LicenseDef {
            name: name.to_owned(),
            ..LicenseDef::default()
        });
        LicenseBuilder {
            registry: self,
            key: k,
        }
    }

    /// Adds an acceptance edge to an already defined license.
    ///
    /// Needed for mutual edges like "or-later" pairs, where the second
    /// license does not exist yet while the first is being defined.
    pub fn accept(&mut self, license: &str, name: &str) {
        let accepted = key(name);
        if let Some(def) = self.licenses.get_mut(&key(license)) {
            def.accepted.insert(accepted);
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.licenses.contains_key(&key(name))
    }

    pub fn is_copyleft(&self, name: &str) -> bool {
        self.licenses
            .get(&key(name))
            .is_some_and(|def| def.copyleft.is_some())
    }

    /// Display names of all licenses, ordered case-insensitively.
    pub fn licenses(&self) -> impl Iterator<Item = &str> {
        self.licenses.values().map(|def| def.name.as_str())
    }

    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        self.terms.values()
    }

    /// Whether `consumer` accepts the license or term `name`.
    ///
    /// Every identifier accepts itself, registered or not.
    pub fn accepts(&self, consumer: &str, name: &str) -> bool {
        let consumer_key = key(consumer);
        let name_key = key(name);
        if consumer_key == name_key {
            return true;
        }
        self.licenses
            .get(&consumer_key)
            .is_some_and(|def| def.accepted.contains(&name_key))
    }

    /// Whether `consumer` may use code under `target`.
    ///
    /// True for the same registered license, or when the consumer accepts
    /// the target directly or under the license its copyleft counts as.
    /// Unregistered targets are compatible with nothing.
    pub fn is_compatible(&self, consumer: &str, target: &str) -> bool {
        let target_key = key(target);
        let Some(target_def) = self.licenses.get(&target_key) else {
            return false;
        };
        let consumer_key = key(consumer);
        if consumer_key == target_key {
            return true;
        }
        let Some(consumer_def) = self.licenses.get(&consumer_key) else {
            return false;
        };
        if consumer_def.accepted.contains(&target_key) {
            return true;
        }
        target_def
            .copyleft
            .as_ref()
            .is_some_and(|c| consumer_def.accepted.contains(c.value()))
    }

    /// Whether the license's reciprocal floor is crossed by this usage.
    pub fn copyleft_triggered(
        &self,
        license: &str,
        relation: RelationType,
        distribution: Distribution,
    ) -> bool {
        match self.licenses.get(&key(license)) {
            None => true,
            Some(def) => match &def.copyleft {
                None => false,
                Some(copyleft) => copyleft.evaluate(&conditions(relation, distribution)).is_some(),
            },
        }
    }

    /// Terms the license demands under this usage.
    pub fn unmet_obligations(
        &self,
        license: &str,
        relation: RelationType,
        distribution: Distribution,
    ) -> BTreeSet<Term> {
        match self.licenses.get(&key(license)) {
            None => self.terms.values().cloned().collect(),
            Some(def) => {
                let conditions = conditions(relation, distribution);
                def.demands
                    .iter()
                    .filter_map(|demand| demand.evaluate(&conditions))
                    .filter_map(|term_key| self.terms.get(term_key))
                    .cloned()
                    .collect()
            }
        }
    }
}

fn key(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn conditions(relation: RelationType, distribution: Distribution) -> [Guard; 2] {
    [Guard::Relation(relation), Guard::Distribution(distribution)]
}

/// Chaining builder for one license definition.
pub struct LicenseBuilder<'a> {
    registry: &'a mut LicenseRegistry,
    key: String,
}

impl LicenseBuilder<'_> {
    fn def(&mut self) -> &mut LicenseDef {
        // The entry is created in LicenseRegistry::license.
        self.registry.licenses.get_mut(&self.key).unwrap()
    }

    /// Copies the base license's acceptance set, demands, and copyleft.
    pub fn based_on(mut self, base: &str) -> Self {
        if let Some(base_def) = self.registry.licenses.get(&key(base)).cloned() {
            let def = self.def();
            def.accepted.extend(base_def.accepted);
            def.demands.extend(base_def.demands);
            if def.copyleft.is_none() {
                def.copyleft = base_def.copyleft;
            }
        }
        self
    }

    /// Accepts a license or term by name.
    pub fn accept(mut self, name: &str) -> Self {
        let accepted = key(name);
        self.def().accepted.insert(accepted);
        self
    }

    /// Demands a term whenever usage meets all guards.
    pub fn demand(mut self, term: &str, guards: &[Guard]) -> Self {
        let demand = Conditional::new(key(term), guards.to_vec());
        self.def().demands.push(demand);
        self
    }

    /// Marks the license reciprocal above the guarded floor.
    pub fn copyleft(self, guards: &[Guard]) -> Self {
        let own = self.key.clone();
        self.copyleft_as_key(own, guards)
    }

    /// Reciprocal floor counting as another license, e.g. an exception
    /// clause whose copyleft is really its base license's.
    pub fn copyleft_as(self, license: &str, guards: &[Guard]) -> Self {
        self.copyleft_as_key(key(license), guards)
    }

    fn copyleft_as_key(mut self, license_key: String, guards: &[Guard]) -> Self {
        self.def().copyleft = Some(Conditional::new(license_key, guards.to_vec()));
        self
    }
}
