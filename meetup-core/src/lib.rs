//! Core logic for the meetup calendar.
//!
//! This crate owns everything that has invariants worth testing:
//! - `window` and `date_range` for the forward-looking day windows
//! - `tag` for resolving `MM/DD` flair tags against a window
//! - `registry` for bucketing postings into days
//! - `reconcile` for the delete-then-reinsert calendar sync
//! - `sidebar` for rendering and patching the wiki table
//!
//! Remote services are reached only through the traits in `store`.

pub mod date_range;
pub mod error;
pub mod posting;
pub mod reconcile;
pub mod registry;
pub mod sidebar;
pub mod store;
pub mod tag;
pub mod window;

pub use date_range::DateRange;
pub use error::{MeetupError, MeetupResult};
pub use posting::CandidatePosting;
pub use reconcile::{CalendarPlan, ReconcileStats, reconcile};
pub use registry::{EventRecord, EventRegistry};
pub use store::{AuthProvider, CalendarStore, NewEvent, PostingSource, RemoteEvent, WikiStore};
pub use tag::TagMatch;
pub use window::CalendarWindow;
