//! In-memory model of projects, their dependencies, and shared packages.
//!
//! A [`Project`] owns a keyed set of [`Dependency`] records forming a directed
//! graph of "who uses whom under what relation". [`Package`] definitions are
//! shared across projects and owned by the store that indexes them.

mod dependency;
mod package;
mod project;

pub use dependency::{Dependency, Relation, RelationType};
pub use package::{Acceptance, Package};
pub use project::{Distribution, Project};
