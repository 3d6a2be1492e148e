//! User-Facing Notifications
//!
//! Fire-and-forget side channel for the failure classes that must reach the
//! user: I/O warnings and exception reports. Not part of the data contract —
//! the scan result stays empty regardless of what is published here.

pub mod event;
pub mod notifier;

pub use event::{NotificationEvent, NotificationKind};
pub use notifier::{ChannelNotifier, LogNotifier, Notifier};
