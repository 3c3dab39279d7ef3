//! Package URL ("purl") codec.
//!
//! A purl identifies a package as `pkg:<type>/[<namespace>/]<name>@<version>[#<subpath>]`
//! per <https://github.com/package-url/purl-spec>. Internally a purl is reduced
//! to a `(reference, version)` pair, where the reference keeps any `#`-delimited
//! subpath so packages are deduplicated on the full coordinate.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Immutable package coordinate: a reference plus a mandatory version.
///
/// Equality and ordering are by `(reference, version)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Purl {
    reference: String,
    version: String,
}

impl Purl {
    /// Direct construction from an already-split reference and version.
    pub fn new(reference: impl Into<String>, version: impl Into<String>) -> Self {
        Purl {
            reference: reference.into(),
            version: version.into(),
        }
    }

    /// Parses a purl string, with or without the leading `pkg:` scheme.
    ///
    /// Fails when a scheme other than `pkg` is present, when the type or name
    /// segment is missing, or when no `@version` is present. Percent-encoded
    /// bytes are decoded in every segment.
    pub fn parse(input: &str) -> Result<Self, FormatError> {
        if let Some(scheme) = scheme_of(input) {
            if scheme != "pkg" {
                return Err(FormatError::purl(input, "expected the 'pkg' scheme"));
            }
        }

        let name = name_of(input);
        let parts = segment_count(name);
        if parts < 1 {
            return Err(FormatError::purl(input, "missing type part"));
        }
        if parts < 2 {
            return Err(FormatError::purl(input, "missing name part"));
        }

        let version =
            version_of(input).ok_or_else(|| FormatError::purl(input, "missing version"))?;
        let path = path_of(input);

        let mut reference = percent_decode(name);
        if !path.trim().is_empty() {
            reference.push('#');
            reference.push_str(&percent_decode(path));
        }
        Ok(Purl {
            reference,
            version: percent_decode(version),
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Display for Purl {
    /// Reconstructs the canonical `pkg:` form; round-trips with [`Purl::parse`].
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.reference.split_once('#') {
            Some((name, path)) => write!(f, "pkg:{}@{}#{}", name, self.version, path),
            None => write!(f, "pkg:{}@{}", self.reference, self.version),
        }
    }
}

impl FromStr for Purl {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Purl::parse(s)
    }
}

/// The scheme prefix, if the first `:` occurs before any separator.
fn scheme_of(input: &str) -> Option<&str> {
    let colon = input.find(':')?;
    let stop = input.find(['/', '@', '#', '?']).unwrap_or(input.len());
    (colon < stop).then(|| &input[..colon])
}

/// Everything between the scheme and the version/qualifier/subpath markers.
fn name_of(input: &str) -> &str {
    let start = match scheme_of(input) {
        Some(scheme) => scheme.len() + 1,
        None => 0,
    };
    let end = input[start..]
        .find(['@', '?', '#'])
        .map(|i| start + i)
        .unwrap_or(input.len());
    &input[start..end]
}

fn version_of(input: &str) -> Option<&str> {
    let start = input.find('@')? + 1;
    let end = input[start..]
        .find(['?', '#'])
        .map(|i| start + i)
        .unwrap_or(input.len());
    Some(&input[start..end])
}

fn path_of(input: &str) -> &str {
    match input.find('#') {
        Some(pos) => &input[pos + 1..],
        None => "",
    }
}

/// Segment count with trailing empty segments dropped, so `"/"` counts as zero.
fn segment_count(name: &str) -> usize {
    let mut segments: Vec<&str> = name.split('/').collect();
    while segments.last() == Some(&"") {
        segments.pop();
    }
    segments.len()
}

/// Minimal percent decoder; malformed escapes pass through unchanged.
fn percent_decode(s: &str) -> String {
    let raw = s.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] == b'%' && i + 3 <= raw.len() {
            if let Ok(hex) = std::str::from_utf8(&raw[i + 1..i + 3]) {
                if let Ok(byte) = u8::from_str_radix(hex, 16) {
                    bytes.push(byte);
                    i += 3;
                    continue;
                }
            }
        }
        bytes.push(raw[i]);
        i += 1;
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
