// src/integrations/mod.rs
//
// External Integrations Module
//
// The OS notification service is reached only through the
// `NotificationBackend` trait.

pub mod notifications;

pub use notifications::{LocalNotificationBackend, NotificationBackend};
