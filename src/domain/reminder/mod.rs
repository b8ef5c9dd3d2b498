//! Reminder domain
//!
//! Reminders are derived from game records and statistics. Nothing here
//! talks to the scheduler; the policy only decides *what* should fire
//! and *when*.

pub mod entity;
pub mod policy;

pub use entity::{
    DeliveredReminder, ReminderAction, ReminderHandle, ReminderIntent, ReminderKind,
    ReminderPayload, ReminderResponse, ReminderTrigger, Repeat, ScheduledReminder,
};
pub use policy::{ReminderPolicy, ReminderRules};
