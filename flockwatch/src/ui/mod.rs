//! UI module root: exposes drawing functions for individual panels.

pub mod feed;
pub mod header;
pub mod panels;
pub mod radar;
pub mod theme;
pub mod threat;
pub mod util;
