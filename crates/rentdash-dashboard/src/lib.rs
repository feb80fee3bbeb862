//! Rentdash admin dashboard — Leptos CSR WASM application.
//!
//! Single-page app over the rental platform's admin REST API. State lives
//! in the `rentdash-common` stores; this crate binds their snapshots to
//! signals and renders them.

pub mod api;
pub mod format;
pub mod pages;
pub mod stores;
pub mod toast;

use leptos::prelude::*;

use pages::agent_bans::AgentBansPage;
use pages::banners::BannersPage;
use pages::earnings::EarningsPage;
use pages::payouts::PayoutsPage;
use pages::properties::PropertiesPage;
use rentdash_common::notify::NoticeKind;
use stores::Stores;
use toast::Toasts;

// ── Navigation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Properties,
    Banners,
    Earnings,
    Payouts,
    AgentBans,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Properties,
        Section::Banners,
        Section::Earnings,
        Section::Payouts,
        Section::AgentBans,
    ];

    fn label(self) -> &'static str {
        match self {
            Section::Properties => "Properties",
            Section::Banners => "Banners",
            Section::Earnings => "Earnings",
            Section::Payouts => "Payouts",
            Section::AgentBans => "Agent Bans",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Section::Properties => "🏠",
            Section::Banners => "🖼",
            Section::Earnings => "📈",
            Section::Payouts => "💸",
            Section::AgentBans => "⛔",
        }
    }
}

// ── App Root ────────────────────────────────────────────────────────

/// Leptos application root.
#[component]
pub fn App() -> impl IntoView {
    let toasts = Toasts::new();
    let stores = Stores::new(toasts);

    provide_context(toasts);
    provide_context(stores);

    let (section, set_section) = signal(Section::Properties);

    view! {
        <div class="app-layout">
            <nav class="sidebar">
                <div class="sidebar-brand">
                    <h1>"Rentdash"</h1>
                    <span class="version">"admin"</span>
                </div>
                <div class="sidebar-nav">
                    {Section::ALL.into_iter().map(|s| view! {
                        <a
                            class=move || if section.get() == s { "active" } else { "" }
                            on:click=move |_| set_section.set(s)
                        >
                            <span class="icon">{s.icon()}</span>
                            {s.label()}
                        </a>
                    }).collect_view()}
                </div>
            </nav>
            <main class="main-content">
                {move || match section.get() {
                    Section::Properties => view! { <PropertiesPage /> }.into_any(),
                    Section::Banners => view! { <BannersPage /> }.into_any(),
                    Section::Earnings => view! { <EarningsPage /> }.into_any(),
                    Section::Payouts => view! { <PayoutsPage /> }.into_any(),
                    Section::AgentBans => view! { <AgentBansPage /> }.into_any(),
                }}
            </main>
            <ToastStack />
        </div>
    }
}

#[component]
fn ToastStack() -> impl IntoView {
    let toasts = expect_context::<Toasts>();

    view! {
        <div class="toast toast-end">
            <For
                each=move || toasts.items.get()
                key=|t| t.id
                children=move |t| {
                    let class = match t.notice.kind {
                        NoticeKind::Success => "alert alert-success",
                        NoticeKind::Error => "alert alert-error",
                    };
                    let id = t.id;
                    view! {
                        <div class=class on:click=move |_| toasts.dismiss(id)>
                            <span>{t.notice.text}</span>
                        </div>
                    }
                }
            />
        </div>
    }
}

// ── WASM entry point ────────────────────────────────────────────────

/// Called by trunk to mount the app.
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Rentdash dashboard starting");
    leptos::mount::mount_to_body(App);
}
