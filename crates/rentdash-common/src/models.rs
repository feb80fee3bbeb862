//! Wire types for the admin API.
//!
//! Entities deserialize from the backend's camelCase JSON. Create and patch
//! payloads are separate types per entity: a create carries every required
//! field (and image bytes), a patch only what changed.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Properties ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[serde(alias = "Flat")]
    Flat,
    #[serde(alias = "House")]
    House,
    #[serde(alias = "Villa")]
    Villa,
    #[serde(alias = "Apartment")]
    Apartment,
    #[serde(alias = "Condo")]
    Condo,
    #[serde(alias = "Studio")]
    Studio,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::Flat,
        PropertyType::House,
        PropertyType::Villa,
        PropertyType::Apartment,
        PropertyType::Condo,
        PropertyType::Studio,
    ];

    /// Lowercase wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Flat => "flat",
            PropertyType::House => "house",
            PropertyType::Villa => "villa",
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::Studio => "studio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Flat => "Flat",
            PropertyType::House => "House",
            PropertyType::Villa => "Villa",
            PropertyType::Apartment => "Apartment",
            PropertyType::Condo => "Condo",
            PropertyType::Studio => "Studio",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown property type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 3] = [
        PropertyStatus::Available,
        PropertyStatus::Rented,
        PropertyStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Maintenance => "maintenance",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PropertyStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| format!("unknown property status: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    #[serde(alias = "bedrooms")]
    pub bedroom: u32,
    #[serde(default)]
    pub servicing: String,
    pub price: f64,
    #[serde(default)]
    pub agent_percentage: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: PropertyStatus,
    #[serde(default)]
    pub description: String,
}

/// An image picked in a form, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Body of `POST /upload-property`; sent as multipart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    pub location: String,
    pub kind: PropertyType,
    pub servicing: String,
    pub bedroom: u32,
    pub price: f64,
    pub agent_percentage: f64,
    pub amenities: Vec<String>,
    pub description: String,
    pub images: Vec<ImageUpload>,
}

/// Partial update; unset fields are left out of the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servicing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedroom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Banners ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub target_url: String,
}

/// Banners in display order. Stable, so equal `order`s keep insertion order.
pub fn sorted_by_order(banners: &[Banner]) -> Vec<Banner> {
    let mut sorted = banners.to_vec();
    sorted.sort_by_key(|b| b.order);
    sorted
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBanner {
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub order: i64,
    pub target_url: String,
    pub image: ImageUpload,
}

/// Banner update. Goes out as multipart when `image` is set, JSON otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

// ── Earnings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEarning {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub year: String,
    #[serde(alias = "earnings", alias = "data", default)]
    pub months: Vec<MonthlyEarning>,
}

impl Earnings {
    pub fn total(&self) -> f64 {
        self.months.iter().map(|m| m.amount).sum()
    }

    /// Month with the highest amount; the first one wins on ties.
    pub fn best_month(&self) -> Option<&MonthlyEarning> {
        self.months
            .iter()
            .fold(None, |best: Option<&MonthlyEarning>, m| match best {
                Some(b) if b.amount >= m.amount => Some(b),
                _ => Some(m),
            })
    }
}

// ── Payouts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Approved,
    Paid,
    Rejected,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Approved => "approved",
            PayoutStatus::Paid => "paid",
            PayoutStatus::Rejected => "rejected",
        }
    }

    /// Paid and rejected payouts accept no further transitions.
    pub fn is_final(&self) -> bool {
        matches!(self, PayoutStatus::Paid | PayoutStatus::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub agent_name: String,
    pub amount: f64,
    #[serde(default)]
    pub status: PayoutStatus,
    #[serde(default)]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutPatch {
    pub status: PayoutStatus,
}

// ── Agent bans ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBan {
    #[serde(alias = "_id")]
    pub id: String,
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub banned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgentBan {
    pub agent_id: String,
    pub reason: String,
}
