//! Shared core for the Rentdash admin dashboard.
//!
//! This crate contains everything that does not touch the browser:
//! - **Models**: properties, banners, earnings, payouts, agent bans and
//!   their typed create/patch payloads
//! - **Admin client**: bearer-authenticated REST calls over a pluggable
//!   [`http::Transport`]
//! - **Stores**: snapshot-publishing state containers wrapping the client
//! - **Filtering / validation**: listing search and form checks
//!
//! The WASM app (`rentdash-dashboard`) supplies the gloo-net transport and
//! LocalStorage-backed token and cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod earnings;
pub mod error;
pub mod filter;
pub mod http;
pub mod models;
pub mod notify;
pub mod publish;
pub mod resource;
pub mod store;
pub mod validation;

pub mod test_util;

pub use client::AdminClient;
pub use config::ApiConfig;
pub use earnings::EarningsStore;
pub use error::ApiError;
pub use store::{EntityStore, Snapshot, StoreContext};
