// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync options: exclude list and extra driver flags from config
//! (`spec.md` §4.4), plus dry-run composition.

/// Options that shape a single `sync`/`pull` invocation. `dry_run`
/// *composes* by appending driver flags rather than bypassing the phase
/// (`spec.md` §4.9).
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub exclude: Vec<String>,
    pub flags: Vec<String>,
    pub dry_run: bool,
}

impl SyncOptions {
    /// Extra argv entries to append to the driver invocation: one
    /// `--exclude=<pattern>` per exclude entry, any arbitrary extra flags
    /// from config, and — when `dry_run` is set — `--dry-run --verbose`
    /// appended last so they can't be shadowed by an earlier flag.
    pub fn driver_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.exclude.iter().map(|pattern| format!("--exclude={pattern}")).collect();
        args.extend(self.flags.iter().cloned());
        if self.dry_run {
            args.push("--dry-run".to_string());
            args.push("--verbose".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_appends_flags_after_configured_ones() {
        let opts = SyncOptions { exclude: vec!["target/".into()], flags: vec!["--delete".into()], dry_run: true };
        let args = opts.driver_args();
        assert_eq!(args, vec!["--exclude=target/".to_string(), "--delete".to_string(), "--dry-run".to_string(), "--verbose".to_string()]);
    }

    #[test]
    fn non_dry_run_has_no_preview_flags() {
        let opts = SyncOptions { exclude: vec![], flags: vec![], dry_run: false };
        assert!(opts.driver_args().is_empty());
    }
}
