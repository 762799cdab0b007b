// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Root aggregator for the end-to-end CLI specs (`spec.md` §8): each `mod`
//! below pulls in one `tests/specs/**/*.rs` file so `cargo test --test
//! specs` runs them all as a single binary, matching how `assert_cmd`
//! locates the compiled `rr` binary within a single target dir.

#[path = "specs/prelude.rs"]
mod prelude;

mod cli {
    #[path = "../specs/cli/help.rs"]
    mod help;
    #[path = "../specs/cli/run.rs"]
    mod run;
}
