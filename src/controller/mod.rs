//! API Controller modules

pub mod misc;
pub mod send_notification;
pub mod subscribe;
