//! Common test helpers for integration tests

use std::path::PathBuf;

/// A product whose application dynamically links a GPL library. One
/// incompatibility, on the application.
pub const CONFLICTED_SPDX: &str = "\
SPDXVersion: SPDX-2.2
DocumentName: Sample product
Created: 2021-03-15T10:00:00Z
Relationship: SPDXRef-app DYNAMIC_LINK SPDXRef-gpl
Relationship: SPDXRef-app STATIC_LINK SPDXRef-mit
PackageName: Application
SPDXID: SPDXRef-app
PackageLicenseConcluded: MIT
ExternalRef: PACKAGE-MANAGER purl pkg:npm/application@1.0.0
PackageName: Copyleft library
SPDXID: SPDXRef-gpl
PackageLicenseConcluded: GPL-2.0-only
ExternalRef: PACKAGE-MANAGER purl pkg:npm/copyleft@2.0.0
PackageName: Permissive library
SPDXID: SPDXRef-mit
PackageLicenseConcluded: MIT
ExternalRef: PACKAGE-MANAGER purl pkg:npm/permissive@3.0.0
";

/// A GPL application statically linking permissive code. No violations.
pub const CLEAN_SPDX: &str = "\
SPDXVersion: SPDX-2.2
DocumentName: Clean product
Created: 2021-03-15T10:00:00Z
Relationship: SPDXRef-app STATIC_LINK SPDXRef-lib
PackageName: Application
SPDXID: SPDXRef-app
PackageLicenseConcluded: GPL-2.0-only
ExternalRef: PACKAGE-MANAGER purl pkg:npm/application@1.0.0
PackageName: Library
SPDXID: SPDXRef-lib
PackageLicenseConcluded: MIT
ExternalRef: PACKAGE-MANAGER purl pkg:npm/library@2.0.0
";

/// Writes an SPDX document into the temp directory and returns its path.
pub fn spdx_file(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("bom.spdx");
    std::fs::write(&path, content).expect("write SPDX fixture");
    path
}
