//! Command module structure for the bomgate CLI.

pub mod check;
pub mod licenses;
