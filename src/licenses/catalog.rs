//! The built-in license catalog.
//!
//! An opinionated graph of the common SPDX licenses: which licenses accept
//! which, which terms they demand, and where their reciprocal floors sit.
//! Built once and shared by reference; it is data, not policy code.

use crate::domain::{Distribution, RelationType};
use crate::licenses::conditional::Guard;
use crate::licenses::registry::LicenseRegistry;

const PERMISSIVE: &str = "(permissive)";
const ADVERTISING: &str = "ADVERTISING";
const PATENTS: &str = "PATENTS";

/// Builds the full catalog.
pub fn builtin() -> LicenseRegistry {
    let mut registry = LicenseRegistry::new();

    let modified_code = Guard::Relation(RelationType::ModifiedCode);
    let static_link = Guard::Relation(RelationType::StaticLink);
    let dynamic_link = Guard::Relation(RelationType::DynamicLink);
    let independent = Guard::Relation(RelationType::Independent);
    let saas = Guard::Distribution(Distribution::Saas);

    registry.term(ADVERTISING, "Advertising clause");
    registry.term(PATENTS, "Patents clause");

    // The permissive family shares one abstract base that tolerates the
    // advertising and patents clauses.
    registry.license(PERMISSIVE).accept(ADVERTISING).accept(PATENTS);
    for name in [
        "CC-PDDC",
        "WTFPL",
        "Unlicense",
        "CC0-1.0",
        "MIT",
        "X11",
        "ISC",
        "0BSD",
        "BSD-2-Clause",
        "BSD-3-Clause",
        "Python-2.0",
        "Apache-1.0",
        "Apache-1.1",
        "AFL-1.1",
        "AFL-1.2",
        "AFL-2.0",
        "AFL-2.1",
        "AFL-3.0",
        "SAX-PD",
    ] {
        registry.license(name).based_on(PERMISSIVE);
    }
    registry
        .license("BSD-4-Clause")
        .based_on(PERMISSIVE)
        .demand(ADVERTISING, &[]);
    registry
        .license("Apache-2.0")
        .based_on(PERMISSIVE)
        .demand(PATENTS, &[modified_code]);

    registry
        .license("CDDL-1.0")
        .based_on(PERMISSIVE)
        .copyleft(&[modified_code]);
    registry
        .license("CDDL-1.1")
        .based_on(PERMISSIVE)
        .copyleft(&[modified_code]);

    registry.license("EPL-1.0").copyleft(&[modified_code]);
    registry.license("EPL-2.0").copyleft(&[modified_code]);

    registry.license("CECILL-1.0").copyleft(&[]);
    registry.license("CECILL-1.1").copyleft_as("CECILL-1.0", &[]);
    registry.license("CECILL-2.0").copyleft(&[]);
    registry.license("CECILL-2.1").copyleft(&[]).accept("CECILL-2.0");

    registry.license("MPL-1.0").copyleft(&[]);
    registry.license("MPL-1.1").copyleft_as("MPL-1.0", &[]);
    registry.license("MPL-2.0").copyleft(&[]);

    registry.license("EUPL-1.0").copyleft(&[]);
    registry.license("EUPL-1.1").copyleft(&[]).accept("CECILL-2.1");
    registry.license("EUPL-1.2").copyleft(&[]).accept("CECILL-2.1");

    registry
        .license("LGPL-2.0-only")
        .copyleft(&[static_link, saas]);
    registry
        .license("LGPL-2.0-or-later")
        .copyleft(&[static_link, saas])
        .accept("LGPL-2.0-only");
    registry.accept("LGPL-2.0-only", "LGPL-2.0-or-later");
    registry
        .license("LGPL-2.1-only")
        .copyleft_as("LGPL-2.0-only", &[static_link, saas])
        .accept("LGPL-2.0-or-later")
        .accept("MPL-2.0");
    registry
        .license("LGPL-2.1-or-later")
        .copyleft_as("LGPL-2.0-or-later", &[static_link, saas])
        .accept("LGPL-2.0-only")
        .accept("MPL-2.0");
    registry
        .license("LGPL-3.0-only")
        .copyleft(&[static_link, saas])
        .accept("LGPL-2.0-only")
        .accept("LGPL-2.0-or-later")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry
        .license("LGPL-3.0-or-later")
        .copyleft(&[static_link, saas])
        .accept("LGPL-3.0-only")
        .accept("LGPL-2.0-only")
        .accept("LGPL-2.0-or-later")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry.accept("LGPL-3.0-only", "LGPL-3.0-or-later");

    registry
        .license("GPL-1.0-only")
        .copyleft(&[dynamic_link])
        .accept("CECILL-1.0");
    registry
        .license("GPL-1.0-or-later")
        .copyleft(&[dynamic_link])
        .accept("GPL-1.0-only")
        .accept("CECILL-1.0");
    registry.accept("GPL-1.0-only", "GPL-1.0-or-later");
    registry
        .license("GPL-2.0-only")
        .copyleft(&[dynamic_link])
        .accept("GPL-1.0-or-later")
        .accept("EUPL-1.2")
        .accept("EPL-2.0")
        .accept("CECILL-2.0")
        .accept("CECILL-2.1")
        .accept("MPL-1.0");
    registry
        .license("Classpath-exception-2.0")
        .based_on("GPL-2.0-only")
        .copyleft_as("GPL-2.0-only", &[static_link]);
    registry
        .license("GPL-2.0-or-later")
        .copyleft(&[dynamic_link])
        .accept("GPL-2.0-only")
        .accept("LGPL-2.0-only")
        .accept("LGPL-2.0-or-later")
        .accept("GPL-1.0-or-later")
        .accept("EUPL-1.2")
        .accept("EPL-2.0")
        .accept("CECILL-2.0")
        .accept("CECILL-2.1")
        .accept("MPL-2.0");
    registry.accept("GPL-2.0-only", "LGPL-2.0-or-later");
    registry
        .license("GPL-3.0-only")
        .copyleft(&[dynamic_link])
        .accept("LGPL-3.0-only")
        .accept("LGPL-3.0-or-later")
        .accept("LGPL-2.0-or-later")
        .accept("EUPL-1.2")
        .accept("EPL-2.0")
        .accept("CECILL-2.0")
        .accept("CECILL-2.1")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry
        .license("GPL-3.0-or-later")
        .copyleft(&[dynamic_link])
        .accept("GPL-3.0-only")
        .accept("LGPL-2.0-or-later")
        .accept("LGPL-3.0-only")
        .accept("LGPL-3.0-or-later")
        .accept("GPL-1.0-or-later")
        .accept("GPL-2.0-or-later")
        .accept("EUPL-1.2")
        .accept("EPL-2.0")
        .accept("CECILL-2.0")
        .accept("CECILL-2.1")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry.accept("GPL-3.0-only", "GPL-3.0-or-later");

    registry.license("AGPL-1.0-only").copyleft(&[independent]);
    registry
        .license("AGPL-1.0-or-later")
        .copyleft(&[independent])
        .accept("AGPL-1.0-only");
    registry.accept("AGPL-1.0-only", "AGPL-1.0-or-later");
    registry
        .license("AGPL-3.0-only")
        .copyleft(&[independent])
        .accept("AGPL-1.0-or-later")
        .accept("LGPL-3.0-only")
        .accept("LGPL-3.0-or-later")
        .accept("GPL-3.0-only")
        .accept("GPL-3.0-or-later")
        .accept("EUPL-1.2")
        .accept("CECILL-2.1")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry
        .license("AGPL-3.0-or-later")
        .copyleft(&[independent])
        .accept("AGPL-3.0-only")
        .accept("AGPL-1.0-or-later")
        .accept("LGPL-3.0-only")
        .accept("LGPL-3.0-or-later")
        .accept("GPL-3.0-only")
        .accept("GPL-3.0-or-later")
        .accept("EUPL-1.2")
        .accept("CECILL-2.1")
        .accept("MPL-2.0")
        .accept(PATENTS);
    registry.accept("AGPL-3.0-only", "AGPL-3.0-or-later");

    registry
}
