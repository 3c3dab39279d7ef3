//! `bomgate licenses`: list the built-in catalog.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use bomgate::licenses::catalog;

#[derive(Serialize)]
struct LicenseEntry<'a> {
    name: &'a str,
    copyleft: bool,
}

pub fn run(terms: bool, json: bool) -> Result<()> {
    let registry = catalog::builtin();

    if terms {
        let all: Vec<_> = registry.terms().collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&all)?);
        } else {
            for term in all {
                println!("{}: {}", term.name().bold(), term.description());
            }
        }
        return Ok(());
    }

    let entries: Vec<_> = registry
        .licenses()
        .map(|name| LicenseEntry {
            name,
            copyleft: registry.is_copyleft(name),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in entries {
            if entry.copyleft {
                println!("{} {}", entry.name, "(copyleft)".yellow());
            } else {
                println!("{}", entry.name);
            }
        }
    }
    Ok(())
}
