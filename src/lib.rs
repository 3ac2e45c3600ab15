//! Ask a database a question in plain language.
//!
//! A question is turned into SQL by a language model, run against a DuckDB
//! database, summarized by the model and drawn as a default bar chart. See
//! [`pipeline::Analyzer`] for the end-to-end flow.

pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod util;
pub mod web;
