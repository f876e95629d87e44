//! Validated repository references and branch names.
//!
//! Both types validate on construction, so anything holding a `RepoRef` or a
//! `Branch` can splice it into a URL path without further checks.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FetchError, FetchResult};

/// Branch names are restricted to this pattern.
static BRANCH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("branch pattern is valid"));

/// Model id segments (owner and name) are restricted to this pattern.
static SEGMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("segment pattern is valid"));

// ============================================================================
// Repository Reference
// ============================================================================

/// Reference to a model repository (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    name: String,
}

impl RepoRef {
    /// Parse a repository reference from a model ID string.
    ///
    /// A single trailing `/` is tolerated and stripped.
    pub fn parse(model_id: &str) -> FetchResult<Self> {
        let trimmed = model_id.trim();
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let Some((owner, name)) = trimmed.split_once('/') else {
            return Err(FetchError::validation(format!(
                "model id '{model_id}' must have the form organization/name"
            )));
        };

        for segment in [owner, name] {
            if !SEGMENT_PATTERN.is_match(segment) || segment == "." || segment == ".." {
                return Err(FetchError::validation(format!(
                    "model id '{model_id}' contains an invalid segment '{segment}'"
                )));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the full model ID (owner/name).
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// ============================================================================
// Branch
// ============================================================================

/// A validated branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch(String);

impl Branch {
    /// Name of the default branch.
    pub const MAIN: &'static str = "main";

    /// Validate a branch name.
    ///
    /// Only alphanumeric characters, period, underscore and dash are allowed.
    /// The dot segments `.` and `..` are rejected as well since they would be
    /// collapsed out of the request path.
    pub fn parse(name: &str) -> FetchResult<Self> {
        if BRANCH_PATTERN.is_match(name) && name != "." && name != ".." {
            Ok(Self(name.to_string()))
        } else {
            Err(FetchError::validation(format!(
                "invalid branch name '{name}': only alphanumeric characters, period, underscore and dash are allowed"
            )))
        }
    }

    /// The default `main` branch.
    #[must_use]
    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// Branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the default branch.
    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }
}

impl Default for Branch {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
