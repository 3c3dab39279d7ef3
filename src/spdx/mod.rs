//! SPDX tag-value ingestion.

use std::io::BufRead;

use crate::domain::Project;
use crate::error::FormatError;
use crate::repository::PackageStore;

pub mod import;
pub mod tag_value;

pub use import::{ImportedBom, SpdxImport};

/// Reads an SPDX tag-value document and commits it to the project.
///
/// On any format error the project keeps its previous bill of materials.
pub fn import<R: BufRead>(
    project: &mut Project,
    store: &mut dyn PackageStore,
    reader: R,
) -> Result<(), FormatError> {
    SpdxImport::new(store).read(reader)?.apply_to(project);
    Ok(())
}
