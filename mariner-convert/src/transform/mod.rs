//! Per-file settings transformations.
//!
//! Each submodule edits an already parsed tree in place; reading, writing and
//! choosing output paths belongs to [`crate::pipeline`].

pub mod collection_setting;
pub mod dbwatcher_list;
pub mod dbwatcher_source;
