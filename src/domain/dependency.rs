//! Dependencies and the directed relations between them.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Strength of the coupling between two dependencies.
///
/// The licensing weight runs `Independent < DynamicLink < StaticLink <
/// ModifiedCode` and drives which copyleft floors are crossed. `DependsOn` is
/// informational only and carries no more weight than `Independent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Independent,
    DependsOn,
    DynamicLink,
    StaticLink,
    ModifiedCode,
}

impl RelationType {
    /// Licensing weight used for floor comparisons.
    pub fn coupling(self) -> u8 {
        match self {
            RelationType::Independent | RelationType::DependsOn => 0,
            RelationType::DynamicLink => 1,
            RelationType::StaticLink => 2,
            RelationType::ModifiedCode => 3,
        }
    }

    /// Maps an SPDX relationship token onto a relation type.
    ///
    /// Tokens outside the modeled vocabulary degrade to the informational
    /// `DependsOn` so unmodeled SPDX relationships never break an import.
    pub fn from_spdx(token: &str) -> Self {
        match token {
            "INDEPENDENT" => RelationType::Independent,
            "DYNAMIC_LINK" => RelationType::DynamicLink,
            "STATIC_LINK" => RelationType::StaticLink,
            "MODIFIED_CODE" | "DESCENDANT_OF" => RelationType::ModifiedCode,
            _ => RelationType::DependsOn,
        }
    }
}

impl Display for RelationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::Independent => write!(f, "independent"),
            RelationType::DependsOn => write!(f, "depends on"),
            RelationType::DynamicLink => write!(f, "dynamic link"),
            RelationType::StaticLink => write!(f, "static link"),
            RelationType::ModifiedCode => write!(f, "modified code"),
        }
    }
}

/// Directed edge from one dependency to another within the same project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    target: String,
    kind: RelationType,
}

impl Relation {
    pub fn new(target: impl Into<String>, kind: RelationType) -> Self {
        Relation {
            target: target.into(),
            kind,
        }
    }

    /// Key of the dependency this relation points at.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> RelationType {
        self.kind
    }
}

/// One entry in a project's bill of materials.
///
/// Belongs to exactly one project and is addressed by an import-local key.
/// The optional package reference links to the shared [`Package`] definition
/// in the store.
///
/// [`Package`]: crate::domain::Package
#[derive(Debug, Clone)]
pub struct Dependency {
    key: String,
    title: String,
    version: String,
    license: String,
    package: Option<String>,
    relations: Vec<Relation>,
    usages: BTreeSet<String>,
}

impl Dependency {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Dependency {
            key: key.into(),
            title: title.into(),
            version: String::new(),
            license: String::new(),
            package: None,
            relations: Vec::new(),
            usages: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    /// The concluded license expression, verbatim from the import.
    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn set_license(&mut self, license: impl Into<String>) {
        self.license = license.into();
    }

    /// Reference of the shared package definition, if one was resolved.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn set_package(&mut self, reference: impl Into<String>) {
        self.package = Some(reference.into());
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Keys of dependencies that use this one.
    pub fn usages(&self) -> impl Iterator<Item = &str> {
        self.usages.iter().map(String::as_str)
    }

    pub fn is_used(&self) -> bool {
        !self.usages.is_empty()
    }

    pub(crate) fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub(crate) fn register_usage(&mut self, source: impl Into<String>) {
        self.usages.insert(source.into());
    }
}
