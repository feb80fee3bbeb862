//! Platform earnings by month.

use chrono::Datelike;
use leptos::prelude::*;

use crate::format::naira;
use crate::pages::form::store_error;
use crate::stores::Stores;

const YEARS_SHOWN: i32 = 5;

#[component]
pub fn EarningsPage() -> impl IntoView {
    let stores = expect_context::<Stores>();
    let store = stores.earnings;
    let state = stores.earnings_state;

    let this_year = chrono::Utc::now().year();
    let years: Vec<String> = (0..YEARS_SHOWN).map(|i| (this_year - i).to_string()).collect();

    let fetch_store = store.clone();
    let fetch = move |year: String| {
        let store = fetch_store.clone();
        leptos::task::spawn_local(async move {
            let _ = store.fetch(&year).await;
        });
    };

    // Keep the last viewed year when coming back to the page.
    let initial = state
        .with_untracked(|s| s.year.clone())
        .unwrap_or_else(|| this_year.to_string());
    fetch(initial.clone());

    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let clear_store = store.clone();

    view! {
        <div>
            <div class="flex justify-between items-center mb-6">
                <div>
                    <h2 class="text-2xl font-semibold">"Earnings"</h2>
                    <p class="text-sm text-base-content/60 mt-1">"Platform commission by month"</p>
                </div>
                <select
                    class="select select-bordered"
                    prop:value=initial
                    on:change=move |ev| fetch(event_target_value(&ev))
                >
                    {years.into_iter().map(|y| view! { <option value=y.clone()>{y.clone()}</option> }).collect_view()}
                </select>
            </div>

            {store_error(error, move || clear_store.clear_error())}

            {move || {
                let snap = state.get();
                match (&snap.earnings, snap.loading) {
                    (None, true) => view! { <p class="text-base-content/60">"Loading…"</p> }.into_any(),
                    (None, false) => view! {
                        <p class="text-base-content/60">"No earnings recorded."</p>
                    }.into_any(),
                    (Some(e), _) => {
                        let best = e.best_month().map(|m| format!("{} ({})", m.month, naira(m.amount)));
                        view! {
                            <div class="stats mb-6">
                                <div class="stat">
                                    <div class="stat-title">{format!("Total {}", e.year)}</div>
                                    <div class="stat-value">{naira(e.total())}</div>
                                </div>
                                <div class="stat">
                                    <div class="stat-title">"Best month"</div>
                                    <div class="stat-value text-lg">{best.unwrap_or_else(|| "—".into())}</div>
                                </div>
                            </div>
                            <table class="table">
                                <thead>
                                    <tr><th>"Month"</th><th class="text-right">"Amount"</th></tr>
                                </thead>
                                <tbody>
                                    {e.months.iter().map(|m| view! {
                                        <tr>
                                            <td>{m.month.clone()}</td>
                                            <td class="text-right">{naira(m.amount)}</td>
                                        </tr>
                                    }).collect_view()}
                                </tbody>
                            </table>
                        }.into_any()
                    }
                }
            }}
        </div>
    }
}
