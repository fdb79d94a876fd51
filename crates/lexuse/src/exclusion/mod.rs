//! Exclusion list for forms that were already handled.
//!
//! Every form that is completed, skipped or found to have no usable
//! sentences is recorded so later runs do not offer it again. The list is
//! a single JSON object keyed by form id:
//!
//! ```text
//! {
//!   "L35455-F2": {"word": "bankerna", "date": "2024-05-01T09:30:00+00:00", "lang": "sv"}
//! }
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use lexuse::exclusion::{ExclusionRecord, ExclusionStore};
//!
//! let mut store = ExclusionStore::open("exclude_list.json").unwrap();
//! if !store.is_excluded("L35455-F2", "sv") {
//!     store.add(ExclusionRecord::now("L35455-F2", "bankerna", "sv"));
//! }
//! ```

mod record;
mod store;

pub use record::ExclusionRecord;
pub use store::ExclusionStore;
