//! Walks a project's dependency graph and collects license violations.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Acceptance, Dependency, Package, Project, RelationType};
use crate::error::NotFoundError;
use crate::licenses::registry::LicenseRegistry;
use crate::repository::PackageStore;

/// Category of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    ForbiddenPackage,
    UnapprovedPackage,
    MissingLicense,
    UnknownLicense,
    IncompatibleLicense,
    UnmetObligation,
}

/// One finding against one dependency. Plain data, ordered and
/// serializable; never a process failure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Violation {
    dependency: String,
    title: String,
    kind: ViolationKind,
    detail: String,
}

impl Violation {
    fn new(dep: &Dependency, kind: ViolationKind, detail: String) -> Self {
        Violation {
            dependency: dep.key().to_owned(),
            title: dep.title().to_owned(),
            kind,
            detail,
        }
    }

    pub fn dependency(&self) -> &str {
        &self.dependency
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Checks one project against a license registry and the shared package
/// definitions.
pub struct LicenseChecker<'a> {
    registry: &'a LicenseRegistry,
    store: &'a dyn PackageStore,
}

impl<'a> LicenseChecker<'a> {
    pub fn new(registry: &'a LicenseRegistry, store: &'a dyn PackageStore) -> Self {
        LicenseChecker { registry, store }
    }

    /// All violations in the project, ordered by dependency.
    ///
    /// Iterative depth-first walk from the root dependencies, then any
    /// nodes left unreached (cycles without an entry point). Every node is
    /// checked exactly once. A dependency referencing a package missing
    /// from the store aborts the whole check.
    pub fn violations(&self, project: &Project) -> Result<Vec<Violation>, NotFoundError> {
        let mut found = Vec::new();
        let mut visited: BTreeSet<String> = BTreeSet::new();
        let mut pending: Vec<&Dependency> = project.root_dependencies().collect();

        loop {
            while let Some(dep) = pending.pop() {
                if !visited.insert(dep.key().to_owned()) {
                    continue;
                }
                self.check_dependency(project, dep, &mut found)?;
                for relation in dep.relations() {
                    if let Some(target) = project.dependency(relation.target()) {
                        pending.push(target);
                    }
                }
            }
            match project.dependencies().find(|d| !visited.contains(d.key())) {
                Some(dep) => pending.push(dep),
                None => break,
            }
        }

        found.sort();
        found.dedup();
        Ok(found)
    }

    fn check_dependency(
        &self,
        project: &Project,
        dep: &Dependency,
        found: &mut Vec<Violation>,
    ) -> Result<(), NotFoundError> {
        let package = self.package_of(dep)?;
        let own_code = matches!(
            package.map(Package::acceptance),
            Some(Acceptance::NotAPackage)
        );

        if let Some(pkg) = package {
            match pkg.acceptance() {
                Acceptance::Forbidden => found.push(Violation::new(
                    dep,
                    ViolationKind::ForbiddenPackage,
                    format!("package {} is forbidden", pkg.name()),
                )),
                Acceptance::PerProject if !project.is_package_exempted(pkg.reference()) => {
                    found.push(Violation::new(
                        dep,
                        ViolationKind::UnapprovedPackage,
                        format!(
                            "package {} needs a sign-off for this project",
                            pkg.name()
                        ),
                    ))
                }
                _ => {}
            }
        }

        if !own_code {
            let license = dep.license();
            if license.is_empty() {
                found.push(Violation::new(
                    dep,
                    ViolationKind::MissingLicense,
                    "no license declared".to_owned(),
                ));
            } else if !self.registry.is_registered(license)
                && !is_exempted(package, license)
            {
                found.push(Violation::new(
                    dep,
                    ViolationKind::UnknownLicense,
                    format!("license '{}' is not recognized", license),
                ));
            }
        }

        for relation in dep.relations() {
            let Some(target) = project.dependency(relation.target()) else {
                continue;
            };
            self.check_relation(project, dep, target, relation.kind(), found)?;
        }
        Ok(())
    }

    fn check_relation(
        &self,
        project: &Project,
        source: &Dependency,
        target: &Dependency,
        kind: RelationType,
        found: &mut Vec<Violation>,
    ) -> Result<(), NotFoundError> {
        let target_package = self.package_of(target)?;
        if matches!(
            target_package.map(Package::acceptance),
            Some(Acceptance::NotAPackage)
        ) {
            return Ok(());
        }

        let source_license = source.license();
        let target_license = target.license();
        if target_license.is_empty() || is_exempted(target_package, target_license) {
            return Ok(());
        }

        let distribution = project.distribution();
        if self
            .registry
            .copyleft_triggered(target_license, kind, distribution)
            && !self.registry.is_compatible(source_license, target_license)
        {
            found.push(Violation::new(
                source,
                ViolationKind::IncompatibleLicense,
                format!(
                    "license '{}' is incompatible with '{}' of {} ({})",
                    source_license,
                    target_license,
                    target.title(),
                    kind
                ),
            ));
        }

        // Obligation noise for an unrecognized license adds nothing beyond
        // the finding already raised on the dependency itself.
        if self.registry.is_registered(target_license) {
            for term in self
                .registry
                .unmet_obligations(target_license, kind, distribution)
            {
                if self.registry.accepts(source_license, term.name())
                    || is_exempted(target_package, term.name())
                {
                    continue;
                }
                found.push(Violation::new(
                    source,
                    ViolationKind::UnmetObligation,
                    format!(
                        "{} under '{}' demands: {}",
                        target.title(),
                        target_license,
                        term.description()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn package_of(&self, dep: &Dependency) -> Result<Option<&Package>, NotFoundError> {
        match dep.package() {
            None => Ok(None),
            Some(reference) => self
                .store
                .find_package(reference)
                .map(Some)
                .ok_or_else(|| NotFoundError::Package(reference.to_owned())),
        }
    }
}

fn is_exempted(package: Option<&Package>, license: &str) -> bool {
    package.is_some_and(|pkg| pkg.is_license_exempted(license))
}
