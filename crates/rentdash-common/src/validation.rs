//! Local form validation.
//!
//! Forms hold raw input strings. `validate*` either yields a typed payload
//! ready for a store action or a per-field error map; it never panics and
//! never reaches the network.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{
    BannerPatch, ImageUpload, NewAgentBan, NewBanner, NewProperty, PropertyPatch, PropertyStatus,
    PropertyType,
};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Address,
    Location,
    Kind,
    Servicing,
    Bedroom,
    Price,
    AgentPercentage,
    Status,
    Images,
    Title,
    Order,
    TargetUrl,
    Image,
    AgentId,
    Reason,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::Location => "location",
            Field::Kind => "type",
            Field::Servicing => "servicing",
            Field::Bedroom => "bedroom",
            Field::Price => "price",
            Field::AgentPercentage => "agentPercentage",
            Field::Status => "status",
            Field::Images => "images",
            Field::Title => "title",
            Field::Order => "order",
            Field::TargetUrl => "targetUrl",
            Field::Image => "image",
            Field::AgentId => "agentId",
            Field::Reason => "reason",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message per field.
    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

// ── Field checks ────────────────────────────────────────────────────

fn required(errors: &mut FieldErrors, field: Field, value: &str, label: &str) -> String {
    let v = value.trim();
    if v.is_empty() {
        errors.add(field, format!("{label} is required"));
    }
    v.to_string()
}

fn positive_int(errors: &mut FieldErrors, field: Field, value: &str, label: &str) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            errors.add(field, format!("{label} must be a positive whole number"));
            0
        }
    }
}

fn positive_decimal(errors: &mut FieldErrors, field: Field, value: &str, label: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => n,
        _ => {
            errors.add(field, format!("{label} must be greater than 0"));
            0.0
        }
    }
}

fn check_image(errors: &mut FieldErrors, field: Field, image: &ImageUpload) {
    if !image.mime.starts_with("image/") {
        errors.add(field, format!("{} is not an image", image.file_name));
    } else if image.size() > MAX_IMAGE_BYTES {
        errors.add(field, format!("{} is larger than 5MB", image.file_name));
    }
}

/// Comma-separated input to a clean list.
pub fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ── Property ────────────────────────────────────────────────────────

/// Raw state of the add/edit property modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyForm {
    pub name: String,
    pub address: String,
    pub location: String,
    /// Dropdown value; empty until the user picks one.
    pub kind: String,
    pub servicing: String,
    pub bedroom: String,
    pub price: String,
    pub agent_percentage: String,
    /// Comma-separated.
    pub amenities: String,
    pub description: String,
    /// Only used by the edit form.
    pub status: String,
    pub images: Vec<ImageUpload>,
}

struct PropertyFields {
    name: String,
    address: String,
    location: String,
    kind: Option<PropertyType>,
    servicing: String,
    bedroom: u32,
    price: f64,
    agent_percentage: f64,
}

impl PropertyForm {
    /// Prefill the edit modal.
    pub fn from_property(p: &crate::models::Property) -> Self {
        Self {
            name: p.name.clone(),
            address: p.address.clone(),
            location: p.location.clone(),
            kind: p.kind.as_str().to_string(),
            servicing: p.servicing.clone(),
            bedroom: p.bedroom.to_string(),
            price: p.price.to_string(),
            agent_percentage: p.agent_percentage.to_string(),
            amenities: p.amenities.join(", "),
            description: p.description.clone(),
            status: p.status.as_str().to_string(),
            images: Vec::new(),
        }
    }

    fn check_common(&self, errors: &mut FieldErrors) -> PropertyFields {
        let name = required(errors, Field::Name, &self.name, "Property name");
        let address = required(errors, Field::Address, &self.address, "Address");
        let location = required(errors, Field::Location, &self.location, "Location");
        let kind = match self.kind.parse::<PropertyType>() {
            Ok(k) => Some(k),
            Err(_) => {
                errors.add(Field::Kind, "Select a property type");
                None
            }
        };
        let servicing = required(errors, Field::Servicing, &self.servicing, "Servicing");
        let bedroom = positive_int(errors, Field::Bedroom, &self.bedroom, "Bedrooms");
        let price = positive_decimal(errors, Field::Price, &self.price, "Price");
        let agent_percentage = positive_decimal(
            errors,
            Field::AgentPercentage,
            &self.agent_percentage,
            "Agent percentage",
        );
        if agent_percentage > 100.0 {
            errors.add(Field::AgentPercentage, "Agent percentage cannot exceed 100");
        }
        PropertyFields {
            name,
            address,
            location,
            kind,
            servicing,
            bedroom,
            price,
            agent_percentage,
        }
    }

    /// Rules for the add form, including at least one valid image.
    pub fn validate(&self) -> Result<NewProperty, FieldErrors> {
        let mut errors = FieldErrors::new();
        let f = self.check_common(&mut errors);
        if self.images.is_empty() {
            errors.add(Field::Images, "At least one image is required");
        }
        for image in &self.images {
            check_image(&mut errors, Field::Images, image);
        }
        errors.into_result(|| NewProperty {
            name: f.name,
            address: f.address,
            location: f.location,
            kind: f.kind.unwrap_or(PropertyType::Flat),
            servicing: f.servicing,
            bedroom: f.bedroom,
            price: f.price,
            agent_percentage: f.agent_percentage,
            amenities: split_amenities(&self.amenities),
            description: self.description.trim().to_string(),
            images: self.images.clone(),
        })
    }

    /// Rules for the edit form. Images are managed separately, so none are
    /// required; the status must be a known value.
    pub fn validate_patch(&self) -> Result<PropertyPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let f = self.check_common(&mut errors);
        let status = match self.status.parse::<PropertyStatus>() {
            Ok(s) => Some(s),
            Err(_) => {
                errors.add(Field::Status, "Select a status");
                None
            }
        };
        errors.into_result(|| PropertyPatch {
            name: Some(f.name),
            address: Some(f.address),
            location: Some(f.location),
            kind: f.kind,
            servicing: Some(f.servicing),
            bedroom: Some(f.bedroom),
            price: Some(f.price),
            agent_percentage: Some(f.agent_percentage),
            amenities: Some(split_amenities(&self.amenities)),
            status,
            description: Some(self.description.trim().to_string()),
        })
    }
}

// ── Banner ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct BannerForm {
    pub title: String,
    pub description: String,
    pub target_url: String,
    pub order: String,
    pub is_active: bool,
    pub image: Option<ImageUpload>,
}

impl Default for BannerForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            target_url: String::new(),
            order: "0".to_string(),
            is_active: true,
            image: None,
        }
    }
}

impl BannerForm {
    pub fn from_banner(b: &crate::models::Banner) -> Self {
        Self {
            title: b.title.clone(),
            description: b.description.clone(),
            target_url: b.target_url.clone(),
            order: b.order.to_string(),
            is_active: b.is_active,
            image: None,
        }
    }

    fn check_common(&self, errors: &mut FieldErrors) -> (String, i64, String) {
        let title = required(errors, Field::Title, &self.title, "Title");
        let order = match self.order.trim().parse::<i64>() {
            Ok(n) if n >= 0 => n,
            _ => {
                errors.add(Field::Order, "Order must be a whole number, 0 or more");
                0
            }
        };
        let target = self.target_url.trim().to_string();
        let target_ok = target.is_empty()
            || target.starts_with("http://")
            || target.starts_with("https://")
            || target.starts_with('/');
        if !target_ok {
            errors.add(
                Field::TargetUrl,
                "Target URL must start with http://, https:// or /",
            );
        }
        if let Some(image) = &self.image {
            check_image(errors, Field::Image, image);
        }
        (title, order, target)
    }

    pub fn validate(&self) -> Result<NewBanner, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (title, order, target_url) = self.check_common(&mut errors);
        let Some(image) = self.image.clone() else {
            errors.add(Field::Image, "A banner image is required");
            return Err(errors);
        };
        errors.into_result(|| NewBanner {
            title,
            description: self.description.trim().to_string(),
            is_active: self.is_active,
            order,
            target_url,
            image,
        })
    }

    pub fn validate_patch(&self) -> Result<BannerPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let (title, order, target_url) = self.check_common(&mut errors);
        errors.into_result(|| BannerPatch {
            title: Some(title),
            description: Some(self.description.trim().to_string()),
            is_active: Some(self.is_active),
            order: Some(order),
            target_url: Some(target_url),
            image: self.image.clone(),
        })
    }
}

// ── Agent ban ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentBanForm {
    pub agent_id: String,
    pub reason: String,
}

impl AgentBanForm {
    pub fn validate(&self) -> Result<NewAgentBan, FieldErrors> {
        let mut errors = FieldErrors::new();
        let agent_id = required(&mut errors, Field::AgentId, &self.agent_id, "Agent ID");
        let reason = required(&mut errors, Field::Reason, &self.reason, "Reason");
        errors.into_result(|| NewAgentBan { agent_id, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.into(),
            mime: "image/jpeg".into(),
            bytes: vec![0; size],
        }
    }

    fn filled() -> PropertyForm {
        PropertyForm {
            name: "Lekki Flat".into(),
            address: "1 Admiralty Way".into(),
            location: "Lekki".into(),
            kind: "apartment".into(),
            servicing: "Fully serviced".into(),
            bedroom: "3".into(),
            price: "2500000".into(),
            agent_percentage: "10".into(),
            amenities: "Pool, Gym, ,Parking".into(),
            description: String::new(),
            status: "available".into(),
            images: vec![jpeg("front.jpg", 1024)],
        }
    }

    #[test]
    fn valid_form_builds_payload() {
        let p = filled().validate().unwrap();
        assert_eq!(p.kind, PropertyType::Apartment);
        assert_eq!(p.bedroom, 3);
        assert_eq!(p.amenities, ["Pool", "Gym", "Parking"]);
        assert_eq!(p.images.len(), 1);
    }

    #[test]
    fn zero_bedroom_and_price_are_rejected() {
        let form = PropertyForm {
            bedroom: "0".into(),
            price: "0".into(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains(Field::Bedroom));
        assert!(errors.contains(Field::Price));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn fractional_bedroom_is_rejected() {
        let form = PropertyForm {
            bedroom: "2.5".into(),
            ..filled()
        };
        assert!(form.validate().unwrap_err().contains(Field::Bedroom));
    }

    #[test]
    fn agent_percentage_bounds() {
        for bad in ["0", "-3", "100.5", "ten"] {
            let form = PropertyForm {
                agent_percentage: bad.into(),
                ..filled()
            };
            assert!(
                form.validate().unwrap_err().contains(Field::AgentPercentage),
                "{bad} should be rejected"
            );
        }
        let form = PropertyForm {
            agent_percentage: "100".into(),
            ..filled()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = PropertyForm::default().validate().unwrap_err();
        for field in [
            Field::Name,
            Field::Address,
            Field::Location,
            Field::Kind,
            Field::Servicing,
            Field::Bedroom,
            Field::Price,
            Field::AgentPercentage,
            Field::Images,
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn image_rules() {
        let form = PropertyForm {
            images: vec![jpeg("huge.jpg", MAX_IMAGE_BYTES + 1)],
            ..filled()
        };
        assert_eq!(
            form.validate().unwrap_err().get(Field::Images),
            Some("huge.jpg is larger than 5MB")
        );

        let form = PropertyForm {
            images: vec![ImageUpload {
                file_name: "notes.pdf".into(),
                mime: "application/pdf".into(),
                bytes: vec![1],
            }],
            ..filled()
        };
        assert_eq!(
            form.validate().unwrap_err().get(Field::Images),
            Some("notes.pdf is not an image")
        );

        let form = PropertyForm {
            images: vec![jpeg("exact.jpg", MAX_IMAGE_BYTES)],
            ..filled()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn patch_does_not_need_images() {
        let form = PropertyForm {
            images: Vec::new(),
            status: "rented".into(),
            ..filled()
        };
        let patch = form.validate_patch().unwrap();
        assert_eq!(patch.status, Some(PropertyStatus::Rented));
        assert_eq!(patch.price, Some(2500000.0));
    }

    #[test]
    fn banner_rules() {
        let form = BannerForm {
            title: "Easter sale".into(),
            order: "-1".into(),
            target_url: "ftp://nope".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.contains(Field::Order));
        assert!(errors.contains(Field::TargetUrl));
        assert!(errors.contains(Field::Image));

        let form = BannerForm {
            title: "Easter sale".into(),
            target_url: "/listings".into(),
            ..Default::default()
        };
        assert!(form.validate_patch().is_ok());
        let form = BannerForm {
            image: Some(jpeg("b.jpg", 10)),
            ..form
        };
        assert_eq!(form.validate().unwrap().order, 0);
    }

    #[test]
    fn agent_ban_requires_both_fields() {
        let errors = AgentBanForm::default().validate().unwrap_err();
        assert_eq!(errors.get(Field::AgentId), Some("Agent ID is required"));
        assert_eq!(errors.get(Field::Reason), Some("Reason is required"));
    }
}
