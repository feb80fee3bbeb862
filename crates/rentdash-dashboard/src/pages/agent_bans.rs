//! Banned agents: ban with a reason, lift a ban.

use leptos::prelude::*;

use rentdash_common::validation::{AgentBanForm, Field, FieldErrors};

use crate::format::short_date;
use crate::pages::form::{confirm_delete, input_field, store_error, submit_label, DeleteTarget};
use crate::stores::{Bound, Stores};

#[component]
pub fn AgentBansPage() -> impl IntoView {
    let Bound { store, state } = expect_context::<Stores>().agent_bans;

    let form = RwSignal::new(AgentBanForm::default());
    let errors = RwSignal::new(FieldErrors::new());
    let (busy, set_busy) = signal(false);
    let unban_target: DeleteTarget = RwSignal::new(None);

    let load = store.clone();
    leptos::task::spawn_local(async move {
        let _ = load.fetch_all().await;
    });

    let ban_store = store.clone();
    let on_ban = move |_| {
        let payload = match form.get_untracked().validate() {
            Ok(p) => p,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(FieldErrors::new());
        set_busy.set(true);
        let store = ban_store.clone();
        leptos::task::spawn_local(async move {
            if store.create(&payload).await.is_ok() {
                form.set(AgentBanForm::default());
            }
            set_busy.set(false);
        });
    };

    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let clear_store = store.clone();

    view! {
        <div>
            <div class="mb-6">
                <h2 class="text-2xl font-semibold">"Agent Bans"</h2>
                <p class="text-sm text-base-content/60 mt-1">"Banned agents cannot list or manage properties"</p>
            </div>

            {store_error(error, move || clear_store.clear_error())}

            <div class="card bg-base-200 mb-6">
                <div class="card-body">
                    <h3 class="card-title">"Ban an agent"</h3>
                    {input_field("Agent ID", "text", form, errors, Field::AgentId,
                        |f| f.agent_id.clone(), |f, v| f.agent_id = v)}
                    {input_field("Reason", "text", form, errors, Field::Reason,
                        |f| f.reason.clone(), |f, v| f.reason = v)}
                    <div class="card-actions justify-end">
                        <button class="btn btn-error" disabled=move || busy.get() on:click=on_ban>
                            {submit_label(busy, "Ban agent")}
                        </button>
                    </div>
                </div>
            </div>

            {move || {
                let bans = state.with(|s| s.items.clone());
                if bans.is_empty() {
                    return view! { <p class="text-base-content/60">"No agents are banned."</p> }.into_any();
                }
                view! {
                    <table class="table">
                        <thead>
                            <tr><th>"Agent"</th><th>"Reason"</th><th>"Since"</th><th></th></tr>
                        </thead>
                        <tbody>
                            {bans.into_iter().map(|b| {
                                let label = if b.agent_name.is_empty() { b.agent_id.clone() } else { b.agent_name.clone() };
                                let target = (b.id.clone(), label.clone());
                                view! {
                                    <tr>
                                        <td>{label}<div class="text-xs text-base-content/60">{b.agent_id}</div></td>
                                        <td>{b.reason}</td>
                                        <td>{short_date(b.banned_at.as_ref())}</td>
                                        <td>
                                            <button
                                                class="btn btn-ghost btn-xs"
                                                on:click=move |_| unban_target.set(Some(target.clone()))
                                            >
                                                "Unban"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_any()
            }}

            {confirm_delete(store, unban_target)}
        </div>
    }
}
