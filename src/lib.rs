//! `ailloy` CLI binary. Thin: all domain logic lives in `ailloy-core` and
//! the leaf crates it composes. This crate owns only argument parsing,
//! dispatch, process wiring (git/gh runners, HTTP client), and error/exit
//! reporting.

pub mod cli;
