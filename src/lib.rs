// Rollcall: deterministic email assignment and name-similarity screening
// for student rosters.
//
// This is the library root. Each module corresponds to a stage of the
// roster pipeline or one of its I/O seams.

pub mod config;
pub mod email;
pub mod errors;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod roster;
pub mod similarity;
