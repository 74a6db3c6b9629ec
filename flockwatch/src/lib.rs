//! flockwatch: live terminal dashboard for a detection scanner's Socket.IO feed.

pub mod app;
pub mod clock;
pub mod dashboard;
pub mod demo;
pub mod feed;
pub mod logging;
pub mod profiles;
pub mod radar;
pub mod render;
pub mod threat;
pub mod timer;
pub mod types;
pub mod ui;
pub mod wire;
pub mod ws;
