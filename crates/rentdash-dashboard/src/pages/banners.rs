//! Promotional banner management page.

use leptos::prelude::*;

use rentdash_common::models::{sorted_by_order, Banner, BannerPatch, NewBanner};
use rentdash_common::validation::{BannerForm, Field, FieldErrors};

use crate::format::file_size;
use crate::pages::form::{
    confirm_delete, field_error, input_field, read_picked, store_error, submit_label,
    textarea_field, DeleteTarget,
};
use crate::stores::{Bound, Stores};

/// Banners in display order with add, edit, activate and delete.
#[component]
pub fn BannersPage() -> impl IntoView {
    let Bound { store, state } = expect_context::<Stores>().banners;

    // Some(None) is the add form, Some(Some(banner)) the edit form.
    let editor = RwSignal::new(Option::<Option<Banner>>::None);
    let delete_target: DeleteTarget = RwSignal::new(None);

    let ordered = Memo::new(move |_| state.with(|s| sorted_by_order(&s.items)));

    let load = store.clone();
    leptos::task::spawn_local(async move {
        let _ = load.fetch_all().await;
    });

    let toggle_store = store.clone();
    let on_toggle = move |id: String, active: bool| {
        let store = toggle_store.clone();
        if store.snapshot().is_busy(&id) {
            return;
        }
        let patch = BannerPatch {
            is_active: Some(!active),
            ..BannerPatch::default()
        };
        leptos::task::spawn_local(async move {
            let _ = store.update(&id, &patch).await;
        });
    };

    let error = Signal::derive(move || state.with(|s| s.error.clone()));
    let clear_store = store.clone();

    view! {
        <div>
            <div class="flex justify-between items-center mb-6">
                <div>
                    <h2 class="text-2xl font-semibold">"Banners"</h2>
                    <p class="text-sm text-base-content/60 mt-1">"Shown on the app home screen, lowest order first"</p>
                </div>
                <button class="btn btn-primary" on:click=move |_| editor.set(Some(None))>
                    "+ Add Banner"
                </button>
            </div>

            {store_error(error, move || clear_store.clear_error())}

            {move || {
                if state.with(|s| s.loading && s.items.is_empty()) {
                    view! { <p class="text-base-content/60">"Loading…"</p> }.into_any()
                } else if ordered.with(Vec::is_empty) {
                    view! {
                        <div class="flex flex-col items-center justify-center py-16 text-center">
                            <h3>"No banners yet"</h3>
                        </div>
                    }.into_any()
                } else {
                    let on_toggle = on_toggle.clone();
                    view! {
                        <div class="grid grid-cols-3 gap-4">
                            {ordered.get().into_iter().map(|b| {
                                let on_toggle = on_toggle.clone();
                                let (toggle_id, active) = (b.id.clone(), b.is_active);
                                let (delete_id, title) = (b.id.clone(), b.title.clone());
                                let edit = b.clone();
                                view! {
                                    <div class="card bg-base-200">
                                        <figure><img src=b.image_url.clone() alt=b.title.clone() /></figure>
                                        <div class="card-body">
                                            <h3 class="card-title">
                                                {b.title}
                                                <span class="badge">{format!("#{}", b.order)}</span>
                                            </h3>
                                            <p class="text-sm">{b.description}</p>
                                            <p class="text-xs text-base-content/60">{b.target_url}</p>
                                            <div class="card-actions justify-end">
                                                <button
                                                    class="btn btn-xs"
                                                    disabled={
                                                        let id = b.id.clone();
                                                        move || state.with(|s| s.is_busy(&id))
                                                    }
                                                    on:click=move |_| on_toggle(toggle_id.clone(), active)
                                                >
                                                    {if active { "Deactivate" } else { "Activate" }}
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs"
                                                    on:click=move |_| editor.set(Some(Some(edit.clone())))
                                                >
                                                    "Edit"
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-xs text-error"
                                                    on:click=move |_| delete_target.set(Some((delete_id.clone(), title.clone())))
                                                >
                                                    "Delete"
                                                </button>
                                            </div>
                                        </div>
                                    </div>
                                }
                            }).collect_view()}
                        </div>
                    }.into_any()
                }
            }}

            {move || editor.get().map(|editing| view! { <BannerEditor editor=editor editing=editing /> })}

            {confirm_delete(store, delete_target)}
        </div>
    }
}

enum Save {
    Create(NewBanner),
    Update(String, BannerPatch),
}

#[component]
fn BannerEditor(editor: RwSignal<Option<Option<Banner>>>, editing: Option<Banner>) -> impl IntoView {
    let store = expect_context::<Stores>().banners.store;
    let edit_id = editing.as_ref().map(|b| b.id.clone());
    let is_edit = edit_id.is_some();

    let form = RwSignal::new(
        editing
            .as_ref()
            .map(BannerForm::from_banner)
            .unwrap_or_default(),
    );
    let errors = RwSignal::new(FieldErrors::new());
    let (busy, set_busy) = signal(false);

    let on_submit = move |_| {
        let store = store.clone();
        let current = form.get_untracked();
        let save = match &edit_id {
            Some(id) => current
                .validate_patch()
                .map(|patch| Save::Update(id.clone(), patch)),
            None => current.validate().map(Save::Create),
        };
        let save = match save {
            Ok(save) => save,
            Err(e) => {
                errors.set(e);
                return;
            }
        };
        errors.set(FieldErrors::new());
        set_busy.set(true);
        leptos::task::spawn_local(async move {
            let saved = match save {
                Save::Create(payload) => store.create(&payload).await.is_ok(),
                Save::Update(id, patch) => store.update(&id, &patch).await.is_ok(),
            };
            if saved {
                editor.set(None);
            }
            set_busy.set(false);
        });
    };

    view! {
        <div class="modal modal-open">
            <div class="modal-box">
                <h3 class="text-lg font-semibold mb-4">
                    {if is_edit { "Edit Banner" } else { "Add Banner" }}
                </h3>
                {input_field("Title", "text", form, errors, Field::Title,
                    |f| f.title.clone(), |f, v| f.title = v)}
                {textarea_field("Description", form, |f| f.description.clone(), |f, v| f.description = v)}
                {input_field("Target URL", "text", form, errors, Field::TargetUrl,
                    |f| f.target_url.clone(), |f, v| f.target_url = v)}
                {input_field("Order", "number", form, errors, Field::Order,
                    |f| f.order.clone(), |f, v| f.order = v)}
                <label class="label cursor-pointer mb-3">
                    <span>"Active"</span>
                    <input
                        type="checkbox"
                        class="toggle"
                        prop:checked=move || form.with(|f| f.is_active)
                        on:change=move |ev| form.update(|f| f.is_active = event_target_checked(&ev))
                    />
                </label>
                <fieldset class="fieldset mb-3">
                    <label class="fieldset-label">
                        {if is_edit { "Replace image (optional)" } else { "Image (max 5MB)" }}
                    </label>
                    <input
                        class="file-input file-input-bordered w-full"
                        type="file"
                        accept="image/*"
                        on:change=move |ev| read_picked(&ev, move |images| {
                            form.update(|f| f.image = images.into_iter().next());
                        })
                    />
                    {move || form.with(|f| f.image.as_ref().map(|img| {
                        format!("{} · {}", img.file_name, file_size(img.size()))
                    })).map(|line| view! { <p class="text-xs mt-1">{line}</p> })}
                    {field_error(errors, Field::Image)}
                </fieldset>
                <div class="modal-action">
                    <button class="btn btn-ghost" on:click=move |_| editor.set(None)>
                        "Cancel"
                    </button>
                    <button class="btn btn-primary" disabled=move || busy.get() on:click=on_submit>
                        {submit_label(busy, if is_edit { "Save" } else { "Create" })}
                    </button>
                </div>
            </div>
            <div class="modal-backdrop" on:click=move |_| editor.set(None)></div>
        </div>
    }
}
