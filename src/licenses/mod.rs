//! License knowledge and compliance checking.
//!
//! [`registry::LicenseRegistry`] holds the graph of licenses, acceptance
//! edges, and guarded obligations; [`catalog::builtin`] populates it with
//! the authored catalog; [`checker::LicenseChecker`] walks a project's
//! dependency graph against it.

pub mod catalog;
pub mod checker;
pub mod conditional;
pub mod registry;

pub use checker::{LicenseChecker, Violation, ViolationKind};
pub use conditional::{Conditional, Guard};
pub use registry::{LicenseRegistry, Term};
