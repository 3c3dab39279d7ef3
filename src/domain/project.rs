//! Projects: the unit a bill of materials is imported into and checked.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Dependency, Relation, RelationType};
use crate::error::NotFoundError;

/// How the project's own code reaches its audience.
///
/// Widens which copyleft obligations apply: software handed out as a product
/// triggers distribution clauses that a hosted service never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// Shipped to third parties.
    #[default]
    Standalone,
    /// Only ever run as a hosted service.
    Saas,
}

impl Distribution {
    /// Reach of the distribution, for floor comparisons against guards.
    pub fn breadth(self) -> u8 {
        match self {
            Distribution::Saas => 0,
            Distribution::Standalone => 1,
        }
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Standalone => write!(f, "standalone"),
            Distribution::Saas => write!(f, "saas"),
        }
    }
}

impl FromStr for Distribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standalone" => Ok(Distribution::Standalone),
            "saas" => Ok(Distribution::Saas),
            other => Err(format!("unknown distribution '{}'", other)),
        }
    }
}

/// A project and its imported dependency graph.
#[derive(Debug, Clone)]
pub struct Project {
    id: Uuid,
    title: Option<String>,
    last_update: Option<DateTime<Utc>>,
    distribution: Distribution,
    dependencies: BTreeMap<String, Dependency>,
    package_exemptions: BTreeSet<String>,
}

impl Project {
    pub fn new(id: Uuid) -> Self {
        Project {
            id,
            title: None,
            last_update: None,
            distribution: Distribution::default(),
            dependencies: BTreeMap::new(),
            package_exemptions: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn has_title(&self) -> bool {
        self.title.is_some()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    pub fn set_last_update(&mut self, moment: DateTime<Utc>) {
        self.last_update = Some(moment);
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn set_distribution(&mut self, distribution: Distribution) {
        self.distribution = distribution;
    }

    /// Adds a dependency, replacing any earlier one with the same key.
    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies
            .insert(dependency.key().to_owned(), dependency);
    }

    /// Swaps in a freshly imported bill of materials, dropping the old one.
    pub fn replace_all_dependencies(&mut self, dependencies: Vec<Dependency>) {
        self.dependencies = dependencies
            .into_iter()
            .map(|d| (d.key().to_owned(), d))
            .collect();
    }

    /// Records that `source` uses `target` under the given relation.
    ///
    /// Both endpoints must already be dependencies of this project.
    pub fn add_relation(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationType,
    ) -> Result<(), NotFoundError> {
        if !self.dependencies.contains_key(target) {
            return Err(NotFoundError::Dependency(target.to_owned()));
        }
        let src = self
            .dependencies
            .get_mut(source)
            .ok_or_else(|| NotFoundError::Dependency(source.to_owned()))?;
        src.push_relation(Relation::new(target, kind));
        if let Some(dep) = self.dependencies.get_mut(target) {
            dep.register_usage(source);
        }
        Ok(())
    }

    pub fn dependency(&self, key: &str) -> Option<&Dependency> {
        self.dependencies.get(key)
    }

    pub fn dependency_mut(&mut self, key: &str) -> Option<&mut Dependency> {
        self.dependencies.get_mut(key)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Dependencies no other dependency uses; the entry points of the graph.
    pub fn root_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values().filter(|d| !d.is_used())
    }

    /// Waives the per-project sign-off for one package in this project.
    pub fn exempt_package(&mut self, reference: impl Into<String>) {
        self.package_exemptions.insert(reference.into());
    }

    pub fn unexempt_package(&mut self, reference: &str) {
        self.package_exemptions.remove(reference);
    }

    pub fn is_package_exempted(&self, reference: &str) -> bool {
        self.package_exemptions.contains(reference)
    }
}
