//! pr-review: Describe and review GitHub pull requests with an LLM
//!
//! This library fetches pull-request diffs, keeps them within a model's
//! context budget by filtering, truncating and chunking, and turns the
//! model's replies into structured review results.

pub mod chunk;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod llm;
pub mod render;
pub mod review;
pub mod utils;
