//! Mariner 4 to Mariner 5 settings migration.
//!
//! A Mariner settings folder holds one `collectionList.xml` and, per
//! collection, a `profileSetting.xml`, a `collectionSetting.xml` and a
//! `dbwatcher/` folder with a `list.xml` and one file per database source.
//! The generation-5 platform reads the same layout with a few schema changes;
//! this crate rewrites a generation-4 tree into a new output tree.
//!
//! # Architecture
//!
//! - [`discover`] — list the `.xml` files under the input root
//! - [`classify`] — decide which rule applies to each file
//! - [`transform`] — per-file tree edits
//!   - [`transform::collection_setting`] — home path rewrite, `union`/`join` to `type`
//!   - [`transform::dbwatcher_source`] — query sections restructured, id upper-cased
//!   - [`transform::dbwatcher_list`] — optional id upper-casing in `list.xml`
//! - [`query_mappings`] — the tag table behind the dbwatcher restructuring
//! - [`pipeline`] — plans and runs a [`job::ConversionJob`]
//! - [`report`] — per-file outcomes and terminal/JSON rendering
//!
//! # Examples
//!
//! ```ignore
//! use mariner_convert::job::{ConversionJob, ConvertOptions};
//! use mariner_convert::pipeline::convert;
//! use mariner_convert::query_mappings::default_query_mappings;
//!
//! let job = ConversionJob::new("m4/setting", "m5/setting", "/opt/ir4", "/opt/ir5");
//! let report = convert(&job, ConvertOptions::default(), &default_query_mappings())?;
//! println!("{}", mariner_convert::report::render_text(&report));
//! ```
//!
//! # Built on xml-settings-core
//!
//! Parsing, tree editing and declaration-preserving output live in
//! `xml-settings-core`; everything Mariner-specific is here.

pub mod classify;
pub mod discover;
pub mod error;
pub mod job;
pub mod pipeline;
pub mod query_mappings;
pub mod report;
pub mod transform;
