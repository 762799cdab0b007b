//! Output mode selection (`spec.md` §3).

/// How a run's output should be rendered. Chosen per run; orthogonal to
/// every other flag (`spec.md` §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One line per task, updated in place.
    #[default]
    Progress,
    /// Interleaved lines prefixed by task name.
    Stream,
    /// Full per-task output on completion.
    Verbose,
    /// Summary only.
    Quiet,
}
