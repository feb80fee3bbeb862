//! Browser side of the admin API.
//!
//! `GlooTransport` sends the core client's requests with gloo-net; the
//! token and the display cache live in LocalStorage.

use gloo_net::http::{Request, RequestBuilder};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FormData, HtmlInputElement};

use rentdash_common::cache::KeyValueStore;
use rentdash_common::http::{
    ApiRequest, ApiResponse, FormPart, Method, RequestBody, TokenSource, Transport,
};
use rentdash_common::models::ImageUpload;
use rentdash_common::ApiError;

/// LocalStorage key the login flow writes the bearer token under.
pub const TOKEN_KEY: &str = "token";

fn js_err(e: JsValue) -> ApiError {
    ApiError::Network(format!("{e:?}"))
}

fn net_err(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

// ── Transport ───────────────────────────────────────────────────────

pub struct GlooTransport;

fn builder(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    }
}

fn form_data(parts: &[(String, FormPart)]) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_err)?;
    for (field, part) in parts {
        match part {
            FormPart::Text(value) => form.append_with_str(field, value).map_err(js_err)?,
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let array = js_sys::Uint8Array::from(bytes.as_slice());
                let options = BlobPropertyBag::new();
                options.set_type(mime);
                let blob = Blob::new_with_u8_array_sequence_and_options(
                    &js_sys::Array::of1(&array),
                    &options,
                )
                .map_err(js_err)?;
                form.append_with_blob_and_filename(field, &blob, file_name)
                    .map_err(js_err)?;
            }
        }
    }
    Ok(form)
}

impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut req = builder(request.method, &request.url).query(
            request
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        if let Some(auth) = &request.authorization {
            req = req.header("Authorization", auth);
        }

        // Multipart bodies get their boundary header from the browser.
        let resp = match request.body {
            RequestBody::Empty => req.send().await,
            RequestBody::Json(value) => req.json(&value).map_err(net_err)?.send().await,
            RequestBody::Multipart(parts) => {
                req.body(form_data(&parts)?).map_err(net_err)?.send().await
            }
        }
        .map_err(net_err)?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Ok(ApiResponse { status, body })
    }
}

// ── LocalStorage ────────────────────────────────────────────────────

/// Reads the token on every call; this app never writes it.
pub struct BrowserToken;

impl TokenSource for BrowserToken {
    fn token(&self) -> Option<String> {
        let raw = LocalStorage::raw().get_item(TOKEN_KEY).ok().flatten()?;
        // Tolerate a JSON-encoded string.
        let token = raw.trim().trim_matches('"').to_string();
        (!token.is_empty()).then_some(token)
    }
}

pub struct BrowserCache;

impl KeyValueStore for BrowserCache {
    fn load(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(e) = LocalStorage::raw().set_item(key, value) {
            log::warn!("LocalStorage write {key} failed: {e:?}");
        }
    }
}

// ── File inputs ─────────────────────────────────────────────────────

/// Files currently selected in the `<input type="file">` that fired `ev`.
pub fn selected_files(ev: &web_sys::Event) -> Vec<File> {
    let input: HtmlInputElement = leptos::prelude::event_target(ev);
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Read a picked file into memory so it can be validated and uploaded.
pub async fn read_image(file: File) -> Result<ImageUpload, ApiError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_err)?;
    Ok(ImageUpload {
        file_name: file.name(),
        mime: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}
