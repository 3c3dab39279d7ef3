//! # Bomgate - Bill-of-Materials License Gate
//!
//! Bomgate checks the dependencies of a software product against an
//! authored catalog of license compatibility rules. It reads SPDX
//! tag-value documents into a dependency graph and reports where licenses
//! clash with each other or with package review decisions.
//!
//! ## Core Concepts
//!
//! - **Packages**: shared definitions keyed by package URL, carrying review
//!   state and license exemptions
//! - **Projects**: a bill of materials imported from SPDX, with relations
//!   describing how dependencies couple to each other
//! - **Registry**: the license graph of acceptance edges, demanded terms,
//!   and copyleft floors
//!
//! ## Modules
//!
//! - [`purl`] - Package URL codec
//! - [`domain`] - Projects, dependencies, and packages
//! - [`licenses`] - License registry, built-in catalog, and checker
//! - [`spdx`] - SPDX tag-value parsing and import
//! - [`repository`] - Store contracts and the in-memory store
//! - [`service`] - Application surface used by the CLI
//! - [`error`] - Typed format and lookup errors

pub mod domain;
pub mod error;
pub mod licenses;
pub mod purl;
pub mod repository;
pub mod service;
pub mod spdx;
