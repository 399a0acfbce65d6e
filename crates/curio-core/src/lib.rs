//! curio-core - Core library for curio.
//!
//! This crate provides the item types, the `ItemStore` trait, and the
//! expiry-reminder machinery for the curio personal inventory catalog:
//! pure due-date evaluation, acknowledgment transitions, and the periodic
//! scan scheduler.
//!
//! # Example
//!
//! ```ignore
//! use curio_core::{ReminderEngine, ReminderScheduler, ScanConfig};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(ReminderEngine::new(store));
//! let (scheduler, mut due_rx) = ReminderScheduler::with_defaults(engine.clone()).await?;
//! scheduler.start().await?;
//!
//! // Present due items as they arrive; acknowledge through the engine.
//! if let Some(due) = due_rx.recv().await {
//!     let refreshed = engine.snooze(due[0].id, chrono::Utc::now()).await?;
//! }
//! ```

pub mod error;
pub mod reminders;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CurioError, CurioResult, ErrorCode};
pub use reminders::{
    add_calendar_months, due_items, is_due, item_is_due, next_due, DueSetReceiver, ReminderEngine,
    ReminderScheduler, ScanConfig,
};
pub use traits::{ItemPatch, ItemStore};
pub use types::{
    DistributionInfo, DonationInfo, Disposition, InventoryItem, MarketplaceLink, Platform,
    RecurringCadence, ReminderInterval, ReminderPolicy, ReminderSchedule,
};
