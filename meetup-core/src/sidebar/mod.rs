//! The sidebar table on the community wiki page.

mod patch;
mod render;

pub use patch::{SidebarPatch, TRAILING_SEPARATOR, patch};
pub use render::{TableRow, render, rows};

/// Marker where the hand-maintained part of the page begins.
pub const DEFAULT_ANCHOR: &str = "#Weekly Happy Hour";

/// Heading written above the table.
pub const DEFAULT_HEADER: &str = "###Upcoming Meetups  \n\n";
