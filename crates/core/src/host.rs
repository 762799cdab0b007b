//! Host: a named handle with an ordered list of SSH aliases (`spec.md` §3).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a configured host, e.g. `"dev"` or `"gpu-box"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostName(pub String);

impl HostName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HostName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for HostName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for HostName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for HostName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A host in the configured fleet: an ordered list of SSH aliases (tried in
/// priority order), a remote directory template, and optional tags/env/
/// requirements. Invariant: at least one alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub name: HostName,
    /// SSH aliases, tried in order. Never empty — enforced by `Host::new`.
    pub aliases: Vec<String>,
    /// Remote directory template; may contain `${PROJECT}`, `${BRANCH}`,
    /// `${USER}`, `${HOME}`.
    pub dir_template: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub require: Vec<String>,
}

/// A `Host` was constructed with zero aliases, violating the invariant that
/// every host must have at least one SSH alias to attempt.
#[derive(Debug, Clone, thiserror::Error)]
#[error("host `{0}` has no SSH aliases configured")]
pub struct NoAliasesError(pub String);

impl Host {
    pub fn new(
        name: impl Into<HostName>,
        aliases: Vec<String>,
        dir_template: impl Into<String>,
    ) -> Result<Self, NoAliasesError> {
        let name = name.into();
        if aliases.is_empty() {
            return Err(NoAliasesError(name.0));
        }
        Ok(Self {
            name,
            aliases,
            dir_template: dir_template.into(),
            tags: Vec::new(),
            env: HashMap::new(),
            require: Vec::new(),
        })
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Resolve `dir_template` against the given substitution values.
    pub fn resolve_dir(&self, project: &str, branch: &str, user: &str, home: &str) -> String {
        self.dir_template
            .replace("${PROJECT}", project)
            .replace("${BRANCH}", branch)
            .replace("${USER}", user)
            .replace("${HOME}", home)
    }
}
