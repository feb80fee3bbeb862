//! App-wide stores and the signals that mirror them.

use std::sync::Arc;

use leptos::prelude::*;

use rentdash_common::earnings::EarningsSnapshot;
use rentdash_common::models::{AgentBan, Banner, Payout, Property};
use rentdash_common::notify::Notice;
use rentdash_common::resource::Resource;
use rentdash_common::{AdminClient, ApiConfig, EarningsStore, EntityStore, Snapshot, StoreContext};

use crate::api::{BrowserCache, BrowserToken, GlooTransport};
use crate::toast::Toasts;

pub type Store<E> = EntityStore<E, GlooTransport>;

/// A store plus a signal that always holds its latest snapshot.
pub struct Bound<E: Resource> {
    pub store: Store<E>,
    pub state: ReadSignal<Arc<Snapshot<E>>>,
}

impl<E: Resource> Clone for Bound<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            state: self.state,
        }
    }
}

impl<E: Resource> Bound<E> {
    fn bind(store: Store<E>) -> Self {
        let (state, set_state) = signal(store.snapshot());
        store.subscribe(move |snap| set_state.set(Arc::clone(snap)));
        Self { store, state }
    }
}

/// Provided via Leptos context from the app root, so the signals live as
/// long as the app.
#[derive(Clone)]
pub struct Stores {
    pub properties: Bound<Property>,
    pub banners: Bound<Banner>,
    pub payouts: Bound<Payout>,
    pub agent_bans: Bound<AgentBan>,
    pub earnings: EarningsStore<GlooTransport>,
    pub earnings_state: ReadSignal<Arc<EarningsSnapshot>>,
}

impl Stores {
    pub fn new(toasts: Toasts) -> Self {
        let config = ApiConfig::from_env();
        log::info!("API base {}", config.base_url);
        let client = Arc::new(AdminClient::new(
            GlooTransport,
            config,
            Arc::new(BrowserToken),
        ));
        let ctx = StoreContext {
            notifier: Some(Arc::new(move |notice: Notice| toasts.push(notice))),
            cache: Some(Arc::new(BrowserCache)),
        };

        let properties = Bound::bind(Store::new(Arc::clone(&client), ctx.clone()));
        let banners = Bound::bind(Store::new(Arc::clone(&client), ctx.clone()));
        let payouts = Bound::bind(Store::new(Arc::clone(&client), ctx.clone()));
        let agent_bans = Bound::bind(Store::new(Arc::clone(&client), ctx.clone()));

        // Show the last known listings until the first fetch lands.
        properties.store.rehydrate();
        banners.store.rehydrate();

        let earnings = EarningsStore::new(client, ctx);
        let (earnings_state, set_earnings_state) = signal(earnings.snapshot());
        earnings.subscribe(move |snap| set_earnings_state.set(Arc::clone(snap)));

        Self {
            properties,
            banners,
            payouts,
            agent_bans,
            earnings,
            earnings_state,
        }
    }
}
