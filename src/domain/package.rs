//! Shared package definitions, indexed by purl reference.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use url::Url;

/// Review status of a package, independent of any single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Not reviewed yet.
    #[default]
    Default,
    /// Cleared for use in any project.
    Approved,
    /// Never allowed.
    Forbidden,
    /// Requires a sign-off per project.
    PerProject,
    /// Not a third-party package (e.g. the project's own code); excluded
    /// from compliance checks.
    NotAPackage,
}

impl Display for Acceptance {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Acceptance::Default => write!(f, "unreviewed"),
            Acceptance::Approved => write!(f, "approved"),
            Acceptance::Forbidden => write!(f, "forbidden"),
            Acceptance::PerProject => write!(f, "per project"),
            Acceptance::NotAPackage => write!(f, "not a package"),
        }
    }
}

/// A package definition shared by all projects that depend on it.
///
/// Identity is the purl reference; everything else is descriptive metadata
/// or review state.
#[derive(Debug, Clone)]
pub struct Package {
    reference: String,
    name: Option<String>,
    vendor: Option<String>,
    homepage: Option<Url>,
    description: Option<String>,
    acceptance: Acceptance,
    license_exemptions: Vec<String>,
}

impl Package {
    pub fn new(reference: impl Into<String>) -> Self {
        Package {
            reference: reference.into(),
            name: None,
            vendor: None,
            homepage: None,
            description: None,
            acceptance: Acceptance::Default,
            license_exemptions: Vec::new(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Display name, falling back to the reference.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.reference)
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    pub fn set_vendor(&mut self, vendor: impl Into<String>) {
        self.vendor = Some(vendor.into());
    }

    pub fn homepage(&self) -> Option<&Url> {
        self.homepage.as_ref()
    }

    pub fn set_homepage(&mut self, homepage: Url) {
        self.homepage = Some(homepage);
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    pub fn set_acceptance(&mut self, acceptance: Acceptance) {
        self.acceptance = acceptance;
    }

    /// Exempts a license from violation checks for this package.
    pub fn exempt_license(&mut self, license: impl Into<String>) {
        let license = license.into();
        if !self.is_license_exempted(&license) {
            self.license_exemptions.push(license);
        }
    }

    pub fn remove_license_exemption(&mut self, license: &str) {
        self.license_exemptions
            .retain(|l| !l.eq_ignore_ascii_case(license));
    }

    /// Case-insensitive exemption lookup.
    pub fn is_license_exempted(&self, license: &str) -> bool {
        self.license_exemptions
            .iter()
            .any(|l| l.eq_ignore_ascii_case(license))
    }

    pub fn license_exemptions(&self) -> impl Iterator<Item = &str> {
        self.license_exemptions.iter().map(String::as_str)
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference
    }
}

impl Eq for Package {}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        self.reference.cmp(&other.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "type/namespace/name";
    const LICENSE: &str = "License";

    #[test]
    fn creates_instance_with_default_name() {
        let pkg = Package::new(REFERENCE);

        assert_eq!(pkg.reference(), REFERENCE);
        assert_eq!(pkg.name(), REFERENCE);
        assert!(pkg.vendor().is_none());
        assert!(pkg.homepage().is_none());
        assert_eq!(pkg.acceptance(), Acceptance::Default);
    }

    #[test]
    fn updates_acceptance() {
        let mut pkg = Package::new(REFERENCE);

        pkg.set_acceptance(Acceptance::PerProject);

        assert_eq!(pkg.acceptance(), Acceptance::PerProject);
    }

    #[test]
    fn exempts_licenses_ignoring_casing() {
        let mut pkg = Package::new(REFERENCE);

        pkg.exempt_license(LICENSE);

        assert!(pkg.is_license_exempted(&LICENSE.to_lowercase()));
        assert!(pkg.is_license_exempted(&LICENSE.to_uppercase()));
        assert!(!pkg.is_license_exempted("Other"));
        assert!(pkg.license_exemptions().any(|l| l == LICENSE));
    }

    #[test]
    fn drops_license_exemption() {
        let mut pkg = Package::new(REFERENCE);
        pkg.exempt_license(LICENSE);

        pkg.remove_license_exemption(LICENSE);

        assert!(!pkg.is_license_exempted(LICENSE));
    }

    #[test]
    fn updates_package_details() {
        let mut pkg = Package::new(REFERENCE);

        pkg.set_homepage(Url::parse("https://example.com").unwrap());
        pkg.set_vendor("Vendor name");

        assert_eq!(pkg.homepage().unwrap().as_str(), "https://example.com/");
        assert_eq!(pkg.vendor(), Some("Vendor name"));
    }

    #[test]
    fn orders_by_reference() {
        let one = Package::new("One");
        let two = Package::new("Two");

        assert_eq!(one.cmp(&one), Ordering::Equal);
        assert!(one < two);
    }

    #[test]
    fn equality_is_by_reference_only() {
        let mut one = Package::new(REFERENCE);
        one.set_vendor("Somebody");
        let other = Package::new(REFERENCE);

        assert_eq!(one, other);
    }
}
