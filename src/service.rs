//! Application surface over the stores, registry, and importer.

use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Acceptance, Dependency, Distribution};
use crate::error::NotFoundError;
use crate::licenses::{LicenseChecker, LicenseRegistry, Violation};
use crate::repository::{PackageStore, ProjectStore};
use crate::spdx::SpdxImport;

/// Serializable view of a project for reports.
#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: Option<String>,
    pub distribution: Distribution,
    pub last_update: Option<DateTime<Utc>>,
    pub dependencies: Vec<DependencySummary>,
}

#[derive(Debug, Serialize)]
pub struct DependencySummary {
    pub key: String,
    pub title: String,
    pub version: String,
    pub license: String,
    pub package: Option<String>,
}

impl DependencySummary {
    fn from(dependency: &Dependency) -> Self {
        DependencySummary {
            key: dependency.key().to_owned(),
            title: dependency.title().to_owned(),
            version: dependency.version().to_owned(),
            license: dependency.license().to_owned(),
            package: dependency.package().map(str::to_owned),
        }
    }
}

/// Projects, packages, and the license catalog behind one mutable handle.
pub struct ProjectService<S> {
    store: S,
    registry: LicenseRegistry,
}

impl<S: ProjectStore + PackageStore> ProjectService<S> {
    pub fn new(store: S, registry: LicenseRegistry) -> Self {
        ProjectService { store, registry }
    }

    pub fn registry(&self) -> &LicenseRegistry {
        &self.registry
    }

    pub fn create_project(&mut self, title: Option<&str>) -> Uuid {
        let project = self.store.create_project();
        if let Some(title) = title {
            project.set_title(title);
        }
        project.id()
    }

    pub fn project(&self, id: Uuid) -> Result<ProjectSummary> {
        let project = self.store.find_project(id).ok_or(NotFoundError::Project(id))?;
        Ok(ProjectSummary {
            id: project.id(),
            title: project.title().map(str::to_owned),
            distribution: project.distribution(),
            last_update: project.last_update(),
            dependencies: project.dependencies().map(DependencySummary::from).collect(),
        })
    }

    pub fn rename_project(&mut self, id: Uuid, title: &str) -> Result<()> {
        let project = self
            .store
            .project_mut(id)
            .ok_or(NotFoundError::Project(id))?;
        project.set_title(title);
        Ok(())
    }

    pub fn set_distribution(&mut self, id: Uuid, distribution: Distribution) -> Result<()> {
        let project = self
            .store
            .project_mut(id)
            .ok_or(NotFoundError::Project(id))?;
        project.set_distribution(distribution);
        Ok(())
    }

    /// Replaces the project's bill of materials with the SPDX document.
    pub fn import_spdx<R: BufRead>(&mut self, id: Uuid, reader: R) -> Result<()> {
        if self.store.find_project(id).is_none() {
            return Err(NotFoundError::Project(id).into());
        }
        let bom = SpdxImport::new(&mut self.store)
            .read(reader)
            .context("failed to read SPDX document")?;
        // The project was just looked up; the import cannot have removed it.
        bom.apply_to(self.store.project_mut(id).unwrap());
        Ok(())
    }

    pub fn violations(&self, id: Uuid) -> Result<Vec<Violation>> {
        let project = self.store.find_project(id).ok_or(NotFoundError::Project(id))?;
        let violations = LicenseChecker::new(&self.registry, &self.store)
            .violations(project)
            .context("license check aborted")?;
        Ok(violations)
    }

    pub fn set_package_acceptance(&mut self, reference: &str, acceptance: Acceptance) -> Result<()> {
        let package = self
            .store
            .package_mut(reference)
            .ok_or_else(|| NotFoundError::Package(reference.to_owned()))?;
        package.set_acceptance(acceptance);
        Ok(())
    }

    pub fn exempt_package_license(&mut self, reference: &str, license: &str) -> Result<()> {
        let package = self
            .store
            .package_mut(reference)
            .ok_or_else(|| NotFoundError::Package(reference.to_owned()))?;
        package.exempt_license(license);
        Ok(())
    }

    /// Waives the per-project sign-off for one package in one project.
    pub fn exempt_package(&mut self, id: Uuid, reference: &str) -> Result<()> {
        let project = self
            .store
            .project_mut(id)
            .ok_or(NotFoundError::Project(id))?;
        project.exempt_package(reference);
        Ok(())
    }
}
