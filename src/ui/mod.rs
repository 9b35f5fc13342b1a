//! Text presentation of snapshots. This is the only layer that applies the
//! user's unit preference.

pub mod format;
pub mod report;

pub use format::{share_text, time_ago};
pub use report::{render_favorites, render_report};
