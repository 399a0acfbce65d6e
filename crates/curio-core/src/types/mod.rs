//! Core types for curio.

mod item;
mod policy;

pub use item::{
    DistributionInfo, DonationInfo, Disposition, InventoryItem, MarketplaceLink, Platform,
};
pub use policy::{RecurringCadence, ReminderInterval, ReminderPolicy, ReminderSchedule};
