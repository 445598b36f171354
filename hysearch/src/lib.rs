//! Search-side surface of the synthesis engine.
//!
//! A search procedure receives training [`example::Example`]s and a
//! [`hytoken::library::TokenLibrary`], and returns a complete
//! [`hytoken::program::Program`] wrapped in a [`search::SearchReport`].
//! Candidates are scored with [`cost::cost`], which never fails: execution
//! errors count as an infinite cost for the example that triggered them.
//!
//! Modules:
//! - `example`: input/output pairs and test cases
//! - `cost`: per-example evaluation and the aggregated cost
//! - `search`: the [`search::SearchAlgorithm`] trait and its result record
//! - `config`: TOML-backed search configuration
//! - `enumerative`: breadth-first enumeration over program builders
//! - `batch`: in-memory batch runs over many test cases

pub mod batch;
pub mod config;
pub mod cost;
pub mod enumerative;
pub mod example;
pub mod search;
pub mod utils;

pub use hytoken;
