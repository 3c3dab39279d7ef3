//! Builds a project's bill of materials from an SPDX tag-value document.

use std::collections::HashMap;
use std::io::BufRead;

use chrono::{DateTime, Utc};
use regex::Regex;
use url::Url;

use crate::domain::{Dependency, Project, RelationType};
use crate::error::FormatError;
use crate::purl::Purl;
use crate::repository::PackageStore;
use crate::spdx::tag_value;

/// Accumulates one SPDX document against the shared package definitions.
///
/// The project itself is only touched by [`ImportedBom::apply_to`], so a
/// document that fails halfway leaves the project as it was.
pub struct SpdxImport<'a> {
    store: &'a mut dyn PackageStore,
    title: Option<String>,
    created: Option<DateTime<Utc>>,
    dependencies: Vec<Dependency>,
    current: Option<CurrentPackage>,
    anonymous: usize,
    relationships: Vec<(String, RelationType, String)>,
    license_refs: HashMap<String, String>,
    pending_ref: Option<String>,
}

/// Scratch state for the package being read.
struct CurrentPackage {
    key: Option<String>,
    title: String,
    version: String,
    version_locked: bool,
    license: String,
    reference: Option<String>,
}

impl CurrentPackage {
    fn new(title: &str) -> Self {
        CurrentPackage {
            key: None,
            title: title.to_owned(),
            version: String::new(),
            version_locked: false,
            license: String::new(),
            reference: None,
        }
    }
}

impl<'a> SpdxImport<'a> {
    pub fn new(store: &'a mut dyn PackageStore) -> Self {
        SpdxImport {
            store,
            title: None,
            created: None,
            dependencies: Vec::new(),
            current: None,
            anonymous: 0,
            relationships: Vec::new(),
            license_refs: HashMap::new(),
            pending_ref: None,
        }
    }

    /// Reads the whole document and returns the bill of materials to commit.
    pub fn read<R: BufRead>(mut self, reader: R) -> Result<ImportedBom, FormatError> {
        tag_value::parse(reader, |tag, value| self.apply(tag, value))?;
        self.close_current();
        self.resolve_license_refs();
        Ok(ImportedBom {
            title: self.title,
            created: self.created,
            dependencies: self.dependencies,
            relationships: self.relationships,
        })
    }

    fn apply(&mut self, tag: &str, value: &str) -> Result<(), String> {
        match tag {
            "Created" => {
                let moment = DateTime::parse_from_rfc3339(value)
                    .map_err(|_| format!("invalid timestamp '{}'", value))?;
                self.created = Some(moment.with_timezone(&Utc));
            }
            "DocumentName" => {
                if self.title.is_none() {
                    self.title = Some(value.to_owned());
                }
            }
            "PackageName" => {
                self.close_current();
                self.current = Some(CurrentPackage::new(value));
            }
            // The document itself carries an SPDXID too; only an open
            // package takes one as its key.
            "SPDXID" => {
                if let Some(current) = &mut self.current {
                    current.key = Some(value.to_owned());
                }
            }
            "ExternalRef" => self.external_ref(value)?,
            "PackageVersion" => {
                if let Some(current) = &mut self.current {
                    if !current.version_locked {
                        current.version = value.to_owned();
                    }
                }
            }
            "PackageLicenseConcluded" => {
                if let Some(current) = &mut self.current {
                    current.license = value.to_owned();
                }
            }
            "PackageHomePage" => self.update_package(|pkg| {
                if pkg.homepage().is_none() {
                    if let Ok(url) = Url::parse(value) {
                        pkg.set_homepage(url);
                    }
                }
            }),
            "PackageSupplier" => self.update_package(|pkg| {
                if pkg.vendor().is_none() {
                    pkg.set_vendor(value);
                }
            }),
            "PackageSummary" => self.update_package(|pkg| {
                if pkg.description().is_none() {
                    pkg.set_description(value);
                }
            }),
            "LicenseID" => self.pending_ref = Some(value.to_owned()),
            "LicenseName" => {
                if let Some(id) = self.pending_ref.take() {
                    self.license_refs.insert(id, value.to_owned());
                }
            }
            "Relationship" => {
                let mut parts = value.split_whitespace();
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(source), Some(token), Some(target), None) => {
                        self.relationships.push((
                            source.to_owned(),
                            RelationType::from_spdx(token),
                            target.to_owned(),
                        ));
                    }
                    _ => return Err(format!("malformed relationship '{}'", value)),
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// `ExternalRef: PACKAGE-MANAGER purl <locator>` binds the package
    /// definition; the purl version beats any `PackageVersion` tag.
    fn external_ref(&mut self, value: &str) -> Result<(), String> {
        if self.current.is_none() {
            return Ok(());
        }
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 3 || parts[0] != "PACKAGE-MANAGER" || parts[1] != "purl" {
            return Ok(());
        }
        let purl = Purl::parse(parts[2]).map_err(|err| err.to_string())?;
        self.store.get_or_create_package(purl.reference());
        if let Some(current) = self.current.as_mut() {
            current.reference = Some(purl.reference().to_owned());
            current.version = purl.version().to_owned();
            current.version_locked = true;
        }
        Ok(())
    }

    fn update_package(&mut self, update: impl FnOnce(&mut crate::domain::Package)) {
        let reference = self
            .current
            .as_ref()
            .and_then(|current| current.reference.clone());
        if let Some(reference) = reference {
            if let Some(pkg) = self.store.package_mut(&reference) {
                update(pkg);
            }
        }
    }

    fn close_current(&mut self) {
        let Some(current) = self.current.take() else {
            return;
        };
        let key = current.key.unwrap_or_else(|| {
            self.anonymous += 1;
            format!("pkg-{}", self.anonymous)
        });
        let mut dependency = Dependency::new(key, &current.title);
        dependency.set_version(current.version);
        dependency.set_license(current.license);
        if let Some(reference) = current.reference {
            if let Some(pkg) = self.store.package_mut(&reference) {
                if !pkg.has_name() {
                    pkg.set_name(&current.title);
                }
            }
            dependency.set_package(reference);
        }
        self.dependencies.push(dependency);
    }

    /// Rewrites `LicenseRef-…` tokens to their declared quoted names;
    /// unresolved references keep the quoted raw identifier.
    fn resolve_license_refs(&mut self) {
        let pattern = Regex::new(r"LicenseRef-[A-Za-z0-9.\-]+").unwrap();
        let refs = &self.license_refs;
        for dependency in &mut self.dependencies {
            if !dependency.license().contains("LicenseRef-") {
                continue;
            }
            let resolved = pattern
                .replace_all(dependency.license(), |caps: &regex::Captures<'_>| {
                    let token = &caps[0];
                    format!("\"{}\"", refs.get(token).map_or(token, String::as_str))
                })
                .into_owned();
            dependency.set_license(resolved);
        }
    }
}

/// A fully read document, ready to commit to a project.
pub struct ImportedBom {
    title: Option<String>,
    created: Option<DateTime<Utc>>,
    dependencies: Vec<Dependency>,
    relationships: Vec<(String, RelationType, String)>,
}

impl ImportedBom {
    /// Commits the import: replaces the dependency graph wholesale.
    ///
    /// The document title only fills an untitled project. Relationships
    /// with an endpoint that never materialized are dropped.
    pub fn apply_to(self, project: &mut Project) {
        if let Some(title) = self.title {
            if !project.has_title() {
                project.set_title(title);
            }
        }
        if let Some(created) = self.created {
            project.set_last_update(created);
        }
        project.replace_all_dependencies(self.dependencies);
        for (source, kind, target) in self.relationships {
            let _ = project.add_relation(&source, &target, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use uuid::Uuid;

    const TITLE: &str = "Name";
    const REFERENCE: &str = "maven/namespace/name";
    const VERSION: &str = "Version";
    const LICENSE: &str = "License";

    fn import(project: &mut Project, store: &mut InMemoryStore, lines: &[&str]) {
        try_import(project, store, lines).unwrap();
    }

    fn try_import(
        project: &mut Project,
        store: &mut InMemoryStore,
        lines: &[&str],
    ) -> Result<(), FormatError> {
        let doc = lines.join("\n");
        SpdxImport::new(store)
            .read(doc.as_bytes())?
            .apply_to(project);
        Ok(())
    }

    fn fixture() -> (Project, InMemoryStore) {
        (Project::new(Uuid::new_v4()), InMemoryStore::new())
    }

    #[test]
    fn sets_update_timestamp() {
        let (mut project, mut store) = fixture();

        import(&mut project, &mut store, &["Created: 2010-01-29T18:30:22Z"]);

        assert_eq!(
            project.last_update(),
            Some("2010-01-29T18:30:22Z".parse::<DateTime<Utc>>().unwrap())
        );
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let (mut project, mut store) = fixture();

        let err = try_import(&mut project, &mut store, &["Created: yesterday"]).unwrap_err();

        assert_eq!(err.to_string(), "Line 1: invalid timestamp 'yesterday'");
    }

    #[test]
    fn sets_initial_project_title() {
        let (mut project, mut store) = fixture();

        import(&mut project, &mut store, &[&format!("DocumentName: {}", TITLE)]);

        assert_eq!(project.title(), Some(TITLE));
    }

    #[test]
    fn keeps_existing_project_title() {
        let (mut project, mut store) = fixture();
        project.set_title(TITLE);

        import(&mut project, &mut store, &["DocumentName: Something else"]);

        assert_eq!(project.title(), Some(TITLE));
    }

    #[test]
    fn adds_package_as_dependency() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                &format!("PackageName: {}", TITLE),
                "SPDXID: package",
                &format!("PackageLicenseConcluded: {}", LICENSE),
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@{}", REFERENCE, VERSION),
                "PackageVersion: Nope",
            ],
        );

        assert_eq!(project.dependency_count(), 1);
        let dependency = project.dependency("package").unwrap();
        assert_eq!(dependency.package(), Some(REFERENCE));
        assert_eq!(dependency.version(), VERSION);
        assert_eq!(dependency.title(), TITLE);
        assert_eq!(dependency.license(), LICENSE);
        assert!(store.find_package(REFERENCE).is_some());
    }

    #[test]
    fn adds_anonymous_dependency() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                &format!("PackageName: {}", TITLE),
                &format!("PackageVersion: {}", VERSION),
                &format!("PackageLicenseConcluded: {}", LICENSE),
            ],
        );

        assert_eq!(project.dependency_count(), 1);
        let dependency = project.dependencies().next().unwrap();
        assert!(!dependency.key().is_empty());
        assert!(dependency.package().is_none());
        assert_eq!(dependency.title(), TITLE);
        assert_eq!(dependency.version(), VERSION);
        assert_eq!(dependency.license(), LICENSE);
    }

    #[test]
    fn replaces_previous_dependencies() {
        let (mut project, mut store) = fixture();
        project.add_dependency(Dependency::new("Old", "Old stuff"));

        import(
            &mut project,
            &mut store,
            &[&format!("PackageName: {}", TITLE), "SPDXID: package"],
        );

        assert_eq!(project.dependency_count(), 1);
        assert!(project.dependency("package").is_some());
    }

    #[test]
    fn document_level_spdxid_is_not_a_package() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "SPDXID: SPDXRef-DOCUMENT",
                &format!("PackageName: {}", TITLE),
                "SPDXID: package",
            ],
        );

        assert_eq!(project.dependency_count(), 1);
        assert!(project.dependency("package").is_some());
    }

    #[test]
    fn creates_child_relations() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "Relationship: parent DYNAMIC_LINK child",
                "Relationship: parent DEPENDS_ON child",
                "PackageName: Parent package",
                "SPDXID: parent",
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@1.0", REFERENCE),
                "PackageName: Child package",
                "SPDXID: child",
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@2.0", REFERENCE),
            ],
        );

        let parent = project.dependency("parent").unwrap();
        let child = project.dependency("child").unwrap();
        assert!(child.relations().is_empty());
        assert_eq!(parent.relations().len(), 2);
        let relation = parent
            .relations()
            .iter()
            .find(|r| r.kind() == RelationType::DynamicLink)
            .unwrap();
        assert_eq!(relation.target(), "child");
        assert!(child.usages().any(|key| key == "parent"));
        assert!(!parent.is_used());
    }

    #[test]
    fn drops_relation_with_missing_endpoint() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "Relationship: parent STATIC_LINK ghost",
                "PackageName: Parent package",
                "SPDXID: parent",
            ],
        );

        assert!(project.dependency("parent").unwrap().relations().is_empty());
    }

    #[test]
    fn rejects_malformed_relationship() {
        let (mut project, mut store) = fixture();

        let err = try_import(
            &mut project,
            &mut store,
            &["Relationship: parent STATIC_LINK"],
        )
        .unwrap_err();

        assert!(err.to_string().contains("malformed relationship"), "{}", err);
    }

    #[test]
    fn expands_custom_license_references() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "PackageName: Custom license",
                "SPDXID: 1",
                "PackageLicenseConcluded: Apache-2.0 OR (MIT AND LicenseRef-Custom) OR LicenseRef-Custom",
                "PackageName: Broken",
                "SPDXID: 2",
                "PackageLicenseConcluded: LicenseRef-Broken",
                "LicenseID: LicenseRef-Custom",
                "LicenseName: Name",
            ],
        );

        assert_eq!(
            project.dependency("1").unwrap().license(),
            "Apache-2.0 OR (MIT AND \"Name\") OR \"Name\""
        );
        assert_eq!(
            project.dependency("2").unwrap().license(),
            "\"LicenseRef-Broken\""
        );
    }

    #[test]
    fn copies_missing_package_information() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "PackageName: Name",
                "SPDXID: 1",
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@1.0", REFERENCE),
                "PackageHomePage: http://example.com",
                "PackageSupplier: Vendor",
                "PackageSummary: <text>Summary</text>",
            ],
        );

        let pkg = store.find_package(REFERENCE).unwrap();
        assert_eq!(pkg.name(), "Name");
        assert_eq!(pkg.homepage().unwrap().as_str(), "http://example.com/");
        assert_eq!(pkg.vendor(), Some("Vendor"));
        assert_eq!(pkg.description(), Some("Summary"));
    }

    #[test]
    fn keeps_existing_package_information() {
        let (mut project, mut store) = fixture();
        {
            let pkg = store.get_or_create_package(REFERENCE);
            pkg.set_name("Existing");
            pkg.set_vendor("Existing vendor");
        }

        import(
            &mut project,
            &mut store,
            &[
                "PackageName: Name",
                "SPDXID: 1",
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@1.0", REFERENCE),
                "PackageSupplier: Vendor",
            ],
        );

        let pkg = store.find_package(REFERENCE).unwrap();
        assert_eq!(pkg.name(), "Existing");
        assert_eq!(pkg.vendor(), Some("Existing vendor"));
    }

    #[test]
    fn ignores_invalid_homepage() {
        let (mut project, mut store) = fixture();

        import(
            &mut project,
            &mut store,
            &[
                "PackageName: Name",
                "SPDXID: 1",
                &format!("ExternalRef: PACKAGE-MANAGER purl pkg:{}@1.0", REFERENCE),
                "PackageHomePage: not a url",
            ],
        );

        assert!(store.find_package(REFERENCE).unwrap().homepage().is_none());
    }

    #[test]
    fn rejects_malformed_purl_reference() {
        let (mut project, mut store) = fixture();

        let err = try_import(
            &mut project,
            &mut store,
            &[
                "PackageName: Name",
                "SPDXID: 1",
                "ExternalRef: PACKAGE-MANAGER purl pkg:incomplete",
            ],
        )
        .unwrap_err();

        assert!(err.to_string().contains("Line 3"), "{}", err);
    }

    #[test]
    fn failed_import_leaves_project_untouched() {
        let (mut project, mut store) = fixture();
        project.add_dependency(Dependency::new("existing", "Existing"));

        let _ = try_import(
            &mut project,
            &mut store,
            &["PackageName: New", "Created: garbage"],
        )
        .unwrap_err();

        assert_eq!(project.dependency_count(), 1);
        assert!(project.dependency("existing").is_some());
    }

    #[test]
    fn reimport_is_idempotent() {
        let (mut project, mut store) = fixture();
        let doc = [
            "Relationship: a STATIC_LINK b",
            "PackageName: A",
            "SPDXID: a",
            "PackageName: B",
            "SPDXID: b",
            "PackageLicenseConcluded: MIT",
        ];

        import(&mut project, &mut store, &doc);
        import(&mut project, &mut store, &doc);

        assert_eq!(project.dependency_count(), 2);
        assert_eq!(project.dependency("a").unwrap().relations().len(), 1);
    }
}
