// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! The scheduling core: pure, synchronous functions over in-memory
//! booking data. No I/O, no locks, no clock reads. Candidate selection
//! and persistence happen in the layers around this crate, strictly
//! before and after these functions run.

mod conflict;
mod expand;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use conflict::{ConflictReport, ConflictSummary, conflict_report, conflicts};
pub use expand::expand;
