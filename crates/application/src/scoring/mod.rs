//! Scoring module - Bounds, scores and aggregation
//!
//! This module turns solver traces into normalized objective and AUC scores
//! and aggregates them into ranked summaries.

pub mod aggregation;
pub mod bounds;
pub mod calculator;
mod engine;

pub use engine::*;
