//! Map-backed store for tests and the CLI.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::{Package, Project};
use crate::repository::{PackageStore, ProjectStore};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    packages: BTreeMap<String, Package>,
    projects: BTreeMap<Uuid, Project>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackageStore for InMemoryStore {
    fn find_package(&self, reference: &str) -> Option<&Package> {
        self.packages.get(reference)
    }

    fn package_mut(&mut self, reference: &str) -> Option<&mut Package> {
        self.packages.get_mut(reference)
    }

    fn get_or_create_package(&mut self, reference: &str) -> &mut Package {
        self.packages
            .entry(reference.to_owned())
            .or_insert_with(|| Package::new(reference))
    }

    fn packages(&self) -> Vec<&Package> {
        self.packages.values().collect()
    }
}

impl ProjectStore for InMemoryStore {
    fn create_project(&mut self) -> &mut Project {
        let id = Uuid::new_v4();
        self.projects.entry(id).or_insert_with(|| Project::new(id))
    }

    fn find_project(&self, id: Uuid) -> Option<&Project> {
        self.projects.get(&id)
    }

    fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.get_mut(&id)
    }

    fn projects(&self) -> Vec<&Project> {
        self.projects.values().collect()
    }
}
