//! Agent payout requests.

use leptos::prelude::*;

use rentdash_common::models::{Payout, PayoutPatch, PayoutStatus};

use crate::format::{naira, short_date};
use crate::pages::form::store_error;
use crate::stores::{Bound, Stores};

/// Transitions offered for a payout in `status`.
fn next_steps(status: PayoutStatus) -> &'static [(PayoutStatus, &'static str)] {
    match status {
        PayoutStatus::Pending => &[
            (PayoutStatus::Approved, "Approve"),
            (PayoutStatus::Rejected, "Reject"),
        ],
        PayoutStatus::Approved => &[(PayoutStatus::Paid, "Mark paid")],
        PayoutStatus::Paid | PayoutStatus::Rejected => &[],
    }
}

#[component]
pub fn PayoutsPage() -> impl IntoView {
    let Bound { store, state } = expect_context::<Stores>().payouts;

    let load = store.clone();
    leptos::task::spawn_local(async move {
        let _ = load.fetch_all().await;
    });

    let set_store = store.clone();
    let set_status = move |id: String, status: PayoutStatus| {
        let store = set_store.clone();
        if store.snapshot().is_busy(&id) {
            return;
        }
        leptos::task::spawn_local(async move {
            let _ = store.update(&id, &PayoutPatch { status }).await;
        });
    };

    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let clear_store = store.clone();

    view! {
        <div>
            <div class="mb-6">
                <h2 class="text-2xl font-semibold">"Payouts"</h2>
                <p class="text-sm text-base-content/60 mt-1">
                    {move || {
                        let pending = state.with(|s| {
                            s.items.iter().filter(|p| p.status == PayoutStatus::Pending).count()
                        });
                        format!("{pending} awaiting review")
                    }}
                </p>
            </div>

            {store_error(error, move || clear_store.clear_error())}

            {move || {
                if state.with(|s| s.loading && s.items.is_empty()) {
                    return view! { <p class="text-base-content/60">"Loading…"</p> }.into_any();
                }
                let payouts = state.with(|s| s.items.clone());
                if payouts.is_empty() {
                    return view! { <p class="text-base-content/60">"No payout requests."</p> }.into_any();
                }
                let set_status = set_status.clone();
                view! {
                    <table class="table">
                        <thead>
                            <tr>
                                <th>"Agent"</th>
                                <th class="text-right">"Amount"</th>
                                <th>"Requested"</th>
                                <th>"Status"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {payouts.into_iter().map(|p| {
                                let id = p.id.clone();
                                let busy = Signal::derive(move || state.with(|s| s.is_busy(&id)));
                                payout_row(p, busy, set_status.clone())
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_any()
            }}
        </div>
    }
}

/// One payout; its buttons stay disabled while a change to it is in flight.
fn payout_row(
    p: Payout,
    busy: Signal<bool>,
    set_status: impl Fn(String, PayoutStatus) + Clone + 'static,
) -> impl IntoView {
    let badge = match p.status {
        PayoutStatus::Pending => "badge badge-warning",
        PayoutStatus::Approved => "badge badge-info",
        PayoutStatus::Paid => "badge badge-success",
        PayoutStatus::Rejected => "badge badge-error",
    };
    let actions = next_steps(p.status)
        .iter()
        .map(|&(next, label)| {
            let id = p.id.clone();
            let set_status = set_status.clone();
            view! {
                <button
                    class="btn btn-xs"
                    disabled=move || busy.get()
                    on:click=move |_| set_status(id.clone(), next)
                >
                    {label}
                </button>
            }
        })
        .collect_view();

    view! {
        <tr>
            <td>{p.agent_name}</td>
            <td class="text-right">{naira(p.amount)}</td>
            <td>{short_date(p.requested_at.as_ref())}</td>
            <td><span class=badge>{p.status.as_str()}</span></td>
            <td class="flex gap-2">{actions}</td>
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_statuses_offer_nothing() {
        for status in [PayoutStatus::Paid, PayoutStatus::Rejected] {
            assert!(status.is_final());
            assert!(next_steps(status).is_empty());
        }
    }

    #[test]
    fn pending_can_be_approved_or_rejected() {
        let targets: Vec<_> = next_steps(PayoutStatus::Pending).iter().map(|(s, _)| *s).collect();
        assert_eq!(targets, [PayoutStatus::Approved, PayoutStatus::Rejected]);
        assert_eq!(next_steps(PayoutStatus::Approved)[0].0, PayoutStatus::Paid);
    }
}
