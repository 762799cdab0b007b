//! Test-only builders shared across crates. Enabled via the `test-support`
//! feature so downstream crates' dev-dependencies can use them without
//! duplicating fixture code.

use std::time::Duration;

use crate::host::Host;

/// Build a [`Host`] with sensible defaults for tests, overriding only what
/// a given test cares about.
pub struct HostBuilder {
    name: String,
    aliases: Vec<String>,
    dir_template: String,
    tags: Vec<String>,
}

impl HostBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), aliases: vec!["default.example".into()], dir_template: "/tmp/rr".into(), tags: Vec::new() }
    }

    pub fn aliases(mut self, aliases: Vec<impl Into<String>>) -> Self {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn tags(mut self, tags: Vec<impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn dir(mut self, dir: impl Into<String>) -> Self {
        self.dir_template = dir.into();
        self
    }

    pub fn build(self) -> Host {
        Host::new(self.name, self.aliases, self.dir_template).expect("built with non-empty aliases").with_tags(self.tags)
    }
}

/// A short, test-friendly duration so wait loops don't make suites slow.
pub fn short_wait() -> Duration {
    Duration::from_millis(10)
}
