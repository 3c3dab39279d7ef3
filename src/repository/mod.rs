//! Storage contracts for projects and shared package definitions.

use uuid::Uuid;

use crate::domain::{Package, Project};

mod in_memory;

pub use in_memory::InMemoryStore;

/// Access to the shared package definitions, keyed by purl reference.
pub trait PackageStore {
    fn find_package(&self, reference: &str) -> Option<&Package>;

    fn package_mut(&mut self, reference: &str) -> Option<&mut Package>;

    /// Existing definition, or a fresh one registered under `reference`.
    fn get_or_create_package(&mut self, reference: &str) -> &mut Package;

    /// All definitions, ordered by reference.
    fn packages(&self) -> Vec<&Package>;
}

/// Access to the projects, keyed by id.
pub trait ProjectStore {
    /// Registers a new empty project under a fresh id.
    fn create_project(&mut self) -> &mut Project;

    fn find_project(&self, id: Uuid) -> Option<&Project>;

    fn project_mut(&mut self, id: Uuid) -> Option<&mut Project>;

    fn projects(&self) -> Vec<&Project>;
}
