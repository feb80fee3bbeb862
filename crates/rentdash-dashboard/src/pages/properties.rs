//! Property listing management page.

use leptos::prelude::*;

use rentdash_common::filter::{PropertyFilter, TypeFilter};
use rentdash_common::models::{Property, PropertyStatus, PropertyType};
use rentdash_common::validation::{Field, FieldErrors, PropertyForm};

use crate::format::{file_size, naira, percent};
use crate::pages::form::{
    confirm_delete, field_error, input_field, read_picked, store_error, submit_label,
    textarea_field, DeleteTarget,
};
use crate::stores::{Bound, Stores};

#[derive(Debug, Clone, PartialEq)]
enum Modal {
    None,
    Add,
    Edit(String),
    Detail(String),
}

/// Searchable property table with add, edit, detail and delete.
#[component]
pub fn PropertiesPage() -> impl IntoView {
    let Bound { store, state } = expect_context::<Stores>().properties;

    let search = RwSignal::new(String::new());
    let kind = RwSignal::new(TypeFilter::All);
    let modal = RwSignal::new(Modal::None);
    let delete_target: DeleteTarget = RwSignal::new(None);

    let visible = Memo::new(move |_| {
        let filter = PropertyFilter::new(search.get(), kind.get());
        state.with(|s| filter.apply(&s.items))
    });

    let load = store.clone();
    leptos::task::spawn_local(async move {
        let _ = load.fetch_all().await;
    });

    let search_store = store.clone();
    let on_server_search = move |_| {
        let store = search_store.clone();
        let term = search.get_untracked();
        leptos::task::spawn_local(async move {
            let _ = store.search(&term).await;
        });
    };

    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let clear_store = store.clone();

    view! {
        <div>
            <div class="flex justify-between items-center mb-6">
                <div>
                    <h2 class="text-2xl font-semibold">"Properties"</h2>
                    <p class="text-sm text-base-content/60 mt-1">
                        {move || format!("{} listed", state.with(|s| s.items.len()))}
                    </p>
                </div>
                <button class="btn btn-primary" on:click=move |_| modal.set(Modal::Add)>
                    "+ Add Property"
                </button>
            </div>

            {store_error(error, move || clear_store.clear_error())}

            <div class="flex gap-3 mb-4">
                <input
                    class="input input-bordered flex-1"
                    type="search"
                    placeholder="Search name, address or type"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
                <button class="btn btn-outline" on:click=on_server_search>"Search server"</button>
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        if let Ok(k) = event_target_value(&ev).parse() {
                            kind.set(k);
                        }
                    }
                >
                    <option value="all">"All types"</option>
                    {PropertyType::ALL.into_iter().map(|t| view! {
                        <option value=t.as_str()>{t.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            {move || {
                if state.with(|s| s.loading && s.items.is_empty()) {
                    view! { <p class="text-base-content/60">"Loading…"</p> }.into_any()
                } else if visible.with(Vec::is_empty) {
                    view! {
                        <div class="flex flex-col items-center justify-center py-16 text-center">
                            <p class="text-base-content/60">"No properties match."</p>
                        </div>
                    }.into_any()
                } else {
                    view! {
                        <table class="table">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Type"</th>
                                    <th>"Location"</th>
                                    <th>"Bedrooms"</th>
                                    <th>"Price"</th>
                                    <th>"Status"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {visible.get().into_iter().map(|p| property_row(p, modal, delete_target)).collect_view()}
                            </tbody>
                        </table>
                    }.into_any()
                }
            }}

            {move || match modal.get() {
                Modal::None => ().into_any(),
                Modal::Add => view! { <PropertyEditor modal=modal editing=None /> }.into_any(),
                Modal::Edit(id) => {
                    match state.with_untracked(|s| s.find(&id).cloned()) {
                        Some(p) => view! { <PropertyEditor modal=modal editing=Some(p) /> }.into_any(),
                        None => ().into_any(),
                    }
                }
                Modal::Detail(id) => view! { <PropertyDetail modal=modal id=id /> }.into_any(),
            }}

            {confirm_delete(store, delete_target)}
        </div>
    }
}

fn property_row(p: Property, modal: RwSignal<Modal>, delete_target: DeleteTarget) -> impl IntoView {
    let (detail_id, edit_id, delete_id) = (p.id.clone(), p.id.clone(), p.id.clone());
    let name = p.name.clone();
    view! {
        <tr>
            <td>
                <a class="link" on:click=move |_| modal.set(Modal::Detail(detail_id.clone()))>
                    {p.name}
                </a>
                <div class="text-xs text-base-content/60">{p.address}</div>
            </td>
            <td>{p.kind.label()}</td>
            <td>{p.location}</td>
            <td>{p.bedroom}</td>
            <td>{naira(p.price)}</td>
            <td><span class="badge">{p.status.as_str()}</span></td>
            <td class="flex gap-2">
                <button class="btn btn-ghost btn-xs" on:click=move |_| modal.set(Modal::Edit(edit_id.clone()))>
                    "Edit"
                </button>
                <button
                    class="btn btn-ghost btn-xs text-error"
                    on:click=move |_| delete_target.set(Some((delete_id.clone(), name.clone())))
                >
                    "Delete"
                </button>
            </td>
        </tr>
    }
}

// ── Add / edit ──────────────────────────────────────────────────────

/// Add form when `editing` is `None`, edit form otherwise.
#[component]
fn PropertyEditor(modal: RwSignal<Modal>, editing: Option<Property>) -> impl IntoView {
    let store = expect_context::<Stores>().properties.store;
    let edit_id = editing.as_ref().map(|p| p.id.clone());
    let is_edit = edit_id.is_some();

    let form = RwSignal::new(
        editing
            .as_ref()
            .map(PropertyForm::from_property)
            .unwrap_or_default(),
    );
    let errors = RwSignal::new(FieldErrors::new());
    let (busy, set_busy) = signal(false);

    let on_submit = move |_| {
        let store = store.clone();
        let edit_id = edit_id.clone();
        let current = form.get_untracked();
        match edit_id {
            Some(id) => match current.validate_patch() {
                Err(e) => errors.set(e),
                Ok(patch) => {
                    errors.set(FieldErrors::new());
                    set_busy.set(true);
                    leptos::task::spawn_local(async move {
                        if store.update(&id, &patch).await.is_ok() {
                            modal.set(Modal::None);
                        }
                        set_busy.set(false);
                    });
                }
            },
            None => match current.validate() {
                Err(e) => errors.set(e),
                Ok(payload) => {
                    errors.set(FieldErrors::new());
                    set_busy.set(true);
                    leptos::task::spawn_local(async move {
                        if store.create(&payload).await.is_ok() {
                            modal.set(Modal::None);
                        }
                        set_busy.set(false);
                    });
                }
            },
        }
    };

    view! {
        <div class="modal modal-open">
            <div class="modal-box max-w-2xl">
                <h3 class="text-lg font-semibold mb-4">
                    {if is_edit { "Edit Property" } else { "Add Property" }}
                </h3>
                <div class="grid grid-cols-2 gap-x-4">
                    {input_field("Name", "text", form, errors, Field::Name,
                        |f| f.name.clone(), |f, v| f.name = v)}
                    {input_field("Address", "text", form, errors, Field::Address,
                        |f| f.address.clone(), |f, v| f.address = v)}
                    {input_field("Location", "text", form, errors, Field::Location,
                        |f| f.location.clone(), |f, v| f.location = v)}
                    <fieldset class="fieldset mb-3">
                        <label class="fieldset-label">"Type"</label>
                        <select
                            class="select select-bordered w-full"
                            prop:value=move || form.with(|f| f.kind.clone())
                            on:change=move |ev| form.update(|f| f.kind = event_target_value(&ev))
                        >
                            <option value="">"Select type"</option>
                            {PropertyType::ALL.into_iter().map(|t| view! {
                                <option value=t.as_str()>{t.label()}</option>
                            }).collect_view()}
                        </select>
                        {field_error(errors, Field::Kind)}
                    </fieldset>
                    {input_field("Servicing", "text", form, errors, Field::Servicing,
                        |f| f.servicing.clone(), |f, v| f.servicing = v)}
                    {input_field("Bedrooms", "number", form, errors, Field::Bedroom,
                        |f| f.bedroom.clone(), |f, v| f.bedroom = v)}
                    {input_field("Price (₦)", "number", form, errors, Field::Price,
                        |f| f.price.clone(), |f, v| f.price = v)}
                    {input_field("Agent %", "number", form, errors, Field::AgentPercentage,
                        |f| f.agent_percentage.clone(), |f, v| f.agent_percentage = v)}
                </div>
                {textarea_field("Amenities (comma separated)", form,
                    |f| f.amenities.clone(), |f, v| f.amenities = v)}
                {textarea_field("Description", form, |f| f.description.clone(), |f, v| f.description = v)}

                {is_edit.then(|| view! {
                    <fieldset class="fieldset mb-3">
                        <label class="fieldset-label">"Status"</label>
                        <select
                            class="select select-bordered w-full"
                            prop:value=move || form.with(|f| f.status.clone())
                            on:change=move |ev| form.update(|f| f.status = event_target_value(&ev))
                        >
                            {PropertyStatus::ALL.into_iter().map(|s| view! {
                                <option value=s.as_str()>{s.as_str()}</option>
                            }).collect_view()}
                        </select>
                        {field_error(errors, Field::Status)}
                    </fieldset>
                })}

                {(!is_edit).then(|| view! {
                    <fieldset class="fieldset mb-3">
                        <label class="fieldset-label">"Images (max 5MB each)"</label>
                        <input
                            class="file-input file-input-bordered w-full"
                            type="file"
                            accept="image/*"
                            multiple=true
                            on:change=move |ev| read_picked(&ev, move |images| {
                                form.update(|f| f.images = images);
                            })
                        />
                        <ul class="text-xs mt-1">
                            {move || form.with(|f| f.images.iter().map(|img| {
                                let line = format!("{} · {}", img.file_name, file_size(img.size()));
                                view! { <li>{line}</li> }
                            }).collect_view())}
                        </ul>
                        {field_error(errors, Field::Images)}
                    </fieldset>
                })}

                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| modal.set(Modal::None)>
                        "Cancel"
                    </button>
                    <button class="btn btn-primary" disabled=move || busy.get() on:click=on_submit>
                        {submit_label(busy, if is_edit { "Save" } else { "Create" })}
                    </button>
                </div>
            </div>
            <div class="modal-backdrop" on:click=move |_| modal.set(Modal::None)></div>
        </div>
    }
}

// ── Detail ──────────────────────────────────────────────────────────

/// Loads the property from the backend into the store's `current` slot.
#[component]
fn PropertyDetail(modal: RwSignal<Modal>, id: String) -> impl IntoView {
    let Bound { store, state } = expect_context::<Stores>().properties;

    let failed = RwSignal::new(None::<String>);
    let load = store.clone();
    let wanted = id.clone();
    leptos::task::spawn_local(async move {
        if let Err(e) = load.fetch_by_id(&wanted).await {
            failed.set(Some(e.user_message("Failed to fetch property")));
        }
    });

    let close = move |_| {
        store.clear_current();
        modal.set(Modal::None);
    };
    let close_backdrop = close.clone();

    view! {
        <div class="modal modal-open">
            <div class="modal-box max-w-2xl">
                {move || match (state.with(|s| s.current_for(&id).cloned()), failed.get()) {
                    (None, Some(e)) => view! {
                        <div class="alert alert-error text-sm">{e}</div>
                    }.into_any(),
                    (None, None) => view! { <p class="text-base-content/60">"Loading…"</p> }.into_any(),
                    (Some(p), _) => view! {
                        <h3 class="text-lg font-semibold">{p.name}</h3>
                        <p class="text-sm text-base-content/60 mb-4">
                            {format!("{} · {}", p.address, p.location)}
                        </p>
                        <div class="flex gap-2 overflow-x-auto mb-4">
                            {p.images.into_iter().map(|src| view! {
                                <img class="h-32 rounded" src=src />
                            }).collect_view()}
                        </div>
                        <dl class="grid grid-cols-2 gap-2 text-sm">
                            <dt>"Type"</dt><dd>{p.kind.label()}</dd>
                            <dt>"Bedrooms"</dt><dd>{p.bedroom}</dd>
                            <dt>"Servicing"</dt><dd>{p.servicing}</dd>
                            <dt>"Price"</dt><dd>{naira(p.price)}</dd>
                            <dt>"Agent share"</dt><dd>{percent(p.agent_percentage)}</dd>
                            <dt>"Status"</dt><dd>{p.status.as_str()}</dd>
                            <dt>"Amenities"</dt><dd>{p.amenities.join(", ")}</dd>
                        </dl>
                        <p class="mt-4 whitespace-pre-line">{p.description}</p>
                    }.into_any(),
                }}
                <div class="modal-action">
                    <button class="btn" on:click=close>"Close"</button>
                </div>
            </div>
            <div class="modal-backdrop" on:click=close_backdrop></div>
        </div>
    }
}
