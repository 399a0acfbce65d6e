//! Inventory item types.
//!
//! An `InventoryItem` is a cataloged possession: photos, AI-suggested
//! description and tags, disposition, optional marketplace/donation records,
//! and an optional reminder policy. The wire format is the original
//! catalog's camelCase JSON document, so an export from the original app
//! loads unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::types::ReminderPolicy;

/// The item's intended fate.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Kept by the owner.
    Owned,
    /// Listed for sale on a marketplace.
    Listed,
    /// Marked for donation.
    Donated,
    /// Gifted or handed off to someone.
    Distributed,
}

/// Marketplace where an item is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Craigslist,
    Ebay,
    Auction,
}

/// A posted marketplace listing for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceLink {
    pub id: Uuid,
    pub platform: Platform,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub date_posted: DateTime<Utc>,
}

/// Donation details for a donated item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationInfo {
    pub charity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_donated: Option<DateTime<Utc>>,
    pub tax_deductible: bool,
}

/// Hand-off details for a distributed item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionInfo {
    pub recipient: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A cataloged possession.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Stable unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// AI-suggested or user-edited description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Photo references (URLs or data URIs).
    #[serde(default)]
    pub photos: Vec<String>,
    /// Category label.
    pub category: String,
    /// Rough resale value estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    /// Creation instant; the due baseline when a reminder has never been
    /// acknowledged.
    pub date_added: DateTime<Utc>,
    /// Current disposition.
    pub status: Disposition,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marketplace_links: Vec<MarketplaceLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation_info: Option<DonationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_info: Option<DistributionInfo>,
    /// Expiry reminder policy, if any. Absent means the same as `Never`.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "expiryReminder")]
    pub reminder: Option<ReminderPolicy>,
}

impl InventoryItem {
    /// Create a new owned item added now.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            tags: Vec::new(),
            photos: Vec::new(),
            category: category.into(),
            estimated_value: None,
            date_added: Utc::now(),
            status: Disposition::Owned,
            marketplace_links: Vec::new(),
            donation_info: None,
            distribution_info: None,
            reminder: None,
        }
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Builder method to set the creation instant.
    pub fn added_at(mut self, instant: DateTime<Utc>) -> Self {
        self.date_added = instant;
        self
    }

    /// Builder method to set the disposition.
    pub fn with_status(mut self, status: Disposition) -> Self {
        self.status = status;
        self
    }

    /// Builder method to attach a reminder policy.
    pub fn with_reminder(mut self, reminder: ReminderPolicy) -> Self {
        self.reminder = Some(reminder);
        self
    }

    /// The baseline instant for due computation: the reminder's last
    /// acknowledgment, or the creation instant if never acknowledged.
    ///
    /// Both evaluation and acknowledgment go through this accessor so the
    /// read and write sites cannot drift apart.
    pub fn effective_baseline(&self) -> DateTime<Utc> {
        self.reminder
            .as_ref()
            .and_then(|r| r.last_acknowledged)
            .unwrap_or(self.date_added)
    }
}
