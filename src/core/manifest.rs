//! Requirements manifest parsing
//!
//! Reads the course's `requirements.txt`. The file's grammar is owned by
//! pip - the installer consumes the file itself during provisioning - so
//! parsing here is deliberately permissive and exists only for
//! validation and reporting. A line this parser cannot classify is kept
//! verbatim rather than rejected.

use std::path::{Path, PathBuf};

use crate::error::ManifestError;

/// Version-constraint operators pip recognizes, longest first so that
/// `===` wins over `==`.
const CONSTRAINT_OPERATORS: &[&str] = &["===", "==", "~=", "!=", ">=", "<=", ">", "<"];

/// One entry of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementLine {
    /// A package requirement, e.g. `numpy==1.26.0`
    Package(Requirement),
    /// An installer option line, e.g. `--extra-index-url ...`
    Option(String),
}

/// A single package requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name, without extras or constraint
    pub name: String,
    /// Extras requested for the package, e.g. `["standard"]`
    pub extras: Vec<String>,
    /// Version constraint including its operator, e.g. `==1.26.0`
    pub constraint: Option<String>,
    /// The line as written, passed to pip untouched
    pub raw: String,
}

impl Requirement {
    /// The exact version for `==`/`===` pins, if this requirement is pinned
    pub fn pinned_version(&self) -> Option<&str> {
        let constraint = self.constraint.as_deref()?;
        if constraint.starts_with("==") {
            let version = constraint.trim_start_matches('=').trim();
            if !version.is_empty() {
                return Some(version);
            }
        }
        None
    }
}

/// Parsed view of a requirements manifest
#[derive(Debug, Clone)]
pub struct Requirements {
    /// Path the manifest was loaded from
    pub path: PathBuf,
    /// Entries in file order
    pub entries: Vec<RequirementLine>,
}

impl Requirements {
    /// Load and parse a manifest file.
    ///
    /// Fails when the file is absent, unreadable, or declares no
    /// packages; everything else is pip's to judge at install time.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let requirements = Self {
            path: path.to_path_buf(),
            entries: parse(&content),
        };

        if requirements.package_count() == 0 {
            return Err(ManifestError::Empty {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            packages = requirements.package_count(),
            "loaded requirements manifest"
        );

        Ok(requirements)
    }

    /// Iterate over package requirements, skipping option lines
    pub fn packages(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|entry| match entry {
            RequirementLine::Package(req) => Some(req),
            RequirementLine::Option(_) => None,
        })
    }

    /// Number of package requirements
    pub fn package_count(&self) -> usize {
        self.packages().count()
    }

    /// Requirements pinned to an exact version
    pub fn pinned(&self) -> Vec<(&str, &str)> {
        self.packages()
            .filter_map(|req| req.pinned_version().map(|v| (req.name.as_str(), v)))
            .collect()
    }
}

/// Parse manifest content into entries. Infallible: unclassifiable lines
/// are preserved as raw requirements for pip to judge.
pub fn parse(content: &str) -> Vec<RequirementLine> {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<RequirementLine> {
    let stripped = strip_inline_comment(line).trim();
    if stripped.is_empty() {
        return None;
    }

    if stripped.starts_with('-') {
        return Some(RequirementLine::Option(stripped.to_string()));
    }

    // Environment markers (after ';') don't affect the name or constraint
    let spec = stripped.split(';').next().unwrap_or(stripped).trim();

    let (name_part, constraint) = split_constraint(spec);
    let (name, extras) = split_extras(name_part);

    Some(RequirementLine::Package(Requirement {
        name: name.trim().to_string(),
        extras,
        constraint,
        raw: stripped.to_string(),
    }))
}

/// Drop a trailing comment. Pip treats `#` as a comment start only at the
/// beginning of a line or after whitespace.
fn strip_inline_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }

    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return &line[..i];
        }
    }
    line
}

/// Split `numpy==1.26.0` into (`numpy`, `Some("==1.26.0")`)
fn split_constraint(spec: &str) -> (&str, Option<String>) {
    let first_op = CONSTRAINT_OPERATORS
        .iter()
        .filter_map(|op| spec.find(op).map(|idx| (idx, *op)))
        .min_by_key(|(idx, op)| (*idx, std::cmp::Reverse(op.len())));

    match first_op {
        Some((idx, _)) => (&spec[..idx], Some(spec[idx..].trim().to_string())),
        None => (spec, None),
    }
}

/// Split `uvicorn[standard]` into (`uvicorn`, `["standard"]`)
fn split_extras(name_part: &str) -> (String, Vec<String>) {
    match name_part.find('[') {
        Some(open) => {
            let name = name_part[..open].to_string();
            let extras = name_part[open + 1..]
                .trim_end()
                .trim_end_matches(']')
                .split(',')
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect();
            (name, extras)
        }
        None => (name_part.to_string(), Vec::new()),
    }
}
