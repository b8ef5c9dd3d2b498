// src/integrations/notifications/mod.rs

mod backend;
mod local;

pub use backend::NotificationBackend;
pub use local::LocalNotificationBackend;

#[cfg(test)]
pub use backend::MockNotificationBackend;
