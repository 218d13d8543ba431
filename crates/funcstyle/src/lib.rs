//! Restyle FunC sources between `snake_case?` and `camelCase` conventions.
//!
//! The pipeline for each file is method id injection on raw text, then
//! tokenization, then per-token identifier and comment rewriting. The
//! [`orchestrator`] walks the `#include` graph and mirrors every reached file
//! under the output directory.

pub mod cli;
pub mod comments;
pub mod config;
pub mod dirs;
pub mod method_id;
pub mod naming;
pub mod orchestrator;
pub mod resolver;
pub mod tokenizer;
pub mod types;
pub mod util;
