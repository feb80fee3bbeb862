//! Per-entity REST descriptions used by the generic store.

use std::convert::Infallible;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::http::{FormBuilder, RequestBody};
use crate::models::{
    AgentBan, Banner, BannerPatch, NewAgentBan, NewBanner, NewProperty, Payout, PayoutPatch,
    Property, PropertyPatch,
};

/// Admin API route under `/api/v1/admin/`.
macro_rules! admin_path {
    ($route:literal) => {
        concat!("/api/v1/admin/", $route)
    };
}

/// Turns a typed payload into a request body.
pub trait RequestPayload {
    fn to_body(&self) -> RequestBody;

    /// Fields to merge locally when an update response carries no entity.
    fn local_fields(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Operations an entity does not support take `Infallible`.
impl RequestPayload for Infallible {
    fn to_body(&self) -> RequestBody {
        match *self {}
    }
}

pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Create: RequestPayload;
    type Patch: RequestPayload;

    /// Lowercase noun used in messages, e.g. "property".
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
    /// `GET` list / `POST` create path.
    const COLLECTION: &'static str;
    const CREATE_PATH: &'static str = Self::COLLECTION;
    /// LocalStorage key for the rehydration cache, if cached.
    const CACHE_KEY: Option<&'static str> = None;

    fn id(&self) -> &str;

    fn item_path(id: &str) -> String {
        format!("{}/{}", Self::COLLECTION, id)
    }
}

/// Entities with a server-side search endpoint.
pub trait Searchable: Resource {
    const SEARCH_PATH: &'static str;
    const SEARCH_PARAM: &'static str;
}

// ── Properties ──────────────────────────────────────────────────────

impl RequestPayload for NewProperty {
    fn to_body(&self) -> RequestBody {
        let mut form = FormBuilder::new()
            .text("name", &self.name)
            .text("address", &self.address)
            .text("location", &self.location)
            .text("type", self.kind.as_str())
            .text("servicing", &self.servicing)
            .text("bedroom", self.bedroom)
            .text("price", self.price)
            .text("agentPercentage", self.agent_percentage);
        for amenity in &self.amenities {
            form = form.text("amenities", amenity);
        }
        if !self.description.is_empty() {
            form = form.text("description", &self.description);
        }
        for image in &self.images {
            form = form.file("images", &image.file_name, &image.mime, image.bytes.clone());
        }
        form.build()
    }
}

impl RequestPayload for PropertyPatch {
    fn to_body(&self) -> RequestBody {
        RequestBody::Json(self.local_fields())
    }

    fn local_fields(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Resource for Property {
    type Create = NewProperty;
    type Patch = PropertyPatch;

    const SINGULAR: &'static str = "property";
    const PLURAL: &'static str = "properties";
    const COLLECTION: &'static str = admin_path!("properties");
    const CREATE_PATH: &'static str = admin_path!("upload-property");
    const CACHE_KEY: Option<&'static str> = Some("rentdash.properties");

    fn id(&self) -> &str {
        &self.id
    }
}

impl Searchable for Property {
    const SEARCH_PATH: &'static str = admin_path!("search-apartment");
    const SEARCH_PARAM: &'static str = "searchTerm";
}

// ── Banners ─────────────────────────────────────────────────────────

impl RequestPayload for NewBanner {
    fn to_body(&self) -> RequestBody {
        FormBuilder::new()
            .text("title", &self.title)
            .text("description", &self.description)
            .text("isActive", self.is_active)
            .text("order", self.order)
            .text("targetUrl", &self.target_url)
            .file(
                "image",
                &self.image.file_name,
                &self.image.mime,
                self.image.bytes.clone(),
            )
            .build()
    }
}

impl RequestPayload for BannerPatch {
    fn to_body(&self) -> RequestBody {
        match &self.image {
            Some(image) => FormBuilder::new()
                .text_if_present("title", self.title.as_ref())
                .text_if_present("description", self.description.as_ref())
                .text_if_present("isActive", self.is_active)
                .text_if_present("order", self.order)
                .text_if_present("targetUrl", self.target_url.as_ref())
                .file("image", &image.file_name, &image.mime, image.bytes.clone())
                .build(),
            None => RequestBody::Json(self.local_fields()),
        }
    }

    fn local_fields(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Resource for Banner {
    type Create = NewBanner;
    type Patch = BannerPatch;

    const SINGULAR: &'static str = "banner";
    const PLURAL: &'static str = "banners";
    const COLLECTION: &'static str = admin_path!("banners");
    const CACHE_KEY: Option<&'static str> = Some("rentdash.banners");

    fn id(&self) -> &str {
        &self.id
    }
}

// ── Payouts ─────────────────────────────────────────────────────────

impl RequestPayload for PayoutPatch {
    fn to_body(&self) -> RequestBody {
        RequestBody::Json(self.local_fields())
    }

    fn local_fields(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Resource for Payout {
    type Create = Infallible;
    type Patch = PayoutPatch;

    const SINGULAR: &'static str = "payout";
    const PLURAL: &'static str = "payouts";
    const COLLECTION: &'static str = admin_path!("payouts");

    fn id(&self) -> &str {
        &self.id
    }
}

// ── Agent bans ──────────────────────────────────────────────────────

impl RequestPayload for NewAgentBan {
    fn to_body(&self) -> RequestBody {
        RequestBody::Json(serde_json::to_value(self).unwrap_or(serde_json::Value::Null))
    }
}

impl Resource for AgentBan {
    type Create = NewAgentBan;
    type Patch = Infallible;

    const SINGULAR: &'static str = "agent ban";
    const PLURAL: &'static str = "agent bans";
    const COLLECTION: &'static str = admin_path!("agent-bans");

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FormPart;
    use crate::models::{ImageUpload, PropertyType};

    fn image(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.into(),
            mime: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8],
        }
    }

    #[test]
    fn new_property_is_multipart_with_repeated_fields() {
        let p = NewProperty {
            name: "Lekki Flat".into(),
            address: "1 Admiralty Way".into(),
            location: "Lekki".into(),
            kind: PropertyType::Flat,
            servicing: "Serviced".into(),
            bedroom: 3,
            price: 2500000.0,
            agent_percentage: 7.5,
            amenities: vec!["Pool".into(), "Gym".into()],
            description: String::new(),
            images: vec![image("a.jpg"), image("b.jpg")],
        };
        let RequestBody::Multipart(parts) = p.to_body() else {
            panic!("expected multipart");
        };
        let fields: Vec<&str> = parts.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            fields,
            [
                "name",
                "address",
                "location",
                "type",
                "servicing",
                "bedroom",
                "price",
                "agentPercentage",
                "amenities",
                "amenities",
                "images",
                "images"
            ]
        );
        assert_eq!(parts[3].1, FormPart::Text("flat".into()));
        assert_eq!(parts[7].1, FormPart::Text("7.5".into()));
    }

    #[test]
    fn banner_patch_without_image_is_json() {
        let patch = BannerPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            patch.to_body(),
            RequestBody::Json(serde_json::json!({ "isActive": false }))
        );
    }

    #[test]
    fn banner_patch_with_image_is_multipart() {
        let patch = BannerPatch {
            title: Some("Summer".into()),
            image: Some(image("s.png")),
            ..Default::default()
        };
        let body = patch.to_body();
        assert!(body.is_multipart());
        let RequestBody::Multipart(parts) = body else {
            unreachable!()
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, "title");
        assert_eq!(parts[1].0, "image");
    }

    #[test]
    fn paths() {
        assert_eq!(Property::item_path("p1"), "/api/v1/admin/properties/p1");
        assert_eq!(Banner::CREATE_PATH, Banner::COLLECTION);
        assert_eq!(AgentBan::item_path("b2"), "/api/v1/admin/agent-bans/b2");
        assert_eq!(Property::CREATE_PATH, "/api/v1/admin/upload-property");
        assert_eq!(Property::SEARCH_PATH, "/api/v1/admin/search-apartment");
        assert_eq!(Payout::COLLECTION, "/api/v1/admin/payouts");
    }
}
