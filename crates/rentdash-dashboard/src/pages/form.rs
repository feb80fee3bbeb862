//! Form and modal building blocks shared by the pages.

use leptos::prelude::*;

use rentdash_common::models::ImageUpload;
use rentdash_common::resource::Resource;
use rentdash_common::validation::{Field, FieldErrors};

use crate::api;
use crate::stores::Store;

/// Field error line under an input, if any.
pub fn field_error(errors: RwSignal<FieldErrors>, field: Field) -> impl IntoView {
    move || {
        errors
            .with(|e| e.get(field).map(str::to_string))
            .map(|msg| view! { <p class="text-error text-xs mt-1">{msg}</p> })
    }
}

/// Labelled `<input>` bound to one string field of a form signal.
pub fn input_field<F: Send + Sync + 'static>(
    label: &'static str,
    input_type: &'static str,
    form: RwSignal<F>,
    errors: RwSignal<FieldErrors>,
    field: Field,
    get: fn(&F) -> String,
    set: fn(&mut F, String),
) -> impl IntoView {
    view! {
        <fieldset class="fieldset mb-3">
            <label class="fieldset-label">{label}</label>
            <input
                class="input input-bordered w-full"
                type=input_type
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            />
            {field_error(errors, field)}
        </fieldset>
    }
}

pub fn textarea_field<F: Send + Sync + 'static>(
    label: &'static str,
    form: RwSignal<F>,
    get: fn(&F) -> String,
    set: fn(&mut F, String),
) -> impl IntoView {
    view! {
        <fieldset class="fieldset mb-3">
            <label class="fieldset-label">{label}</label>
            <textarea
                class="textarea textarea-bordered w-full"
                prop:value=move || form.with(get)
                on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
            ></textarea>
        </fieldset>
    }
}

/// Read every file picked in a file input, then hand the images over.
/// Files that cannot be read are skipped.
pub fn read_picked(ev: &web_sys::Event, apply: impl FnOnce(Vec<ImageUpload>) + 'static) {
    let files = api::selected_files(ev);
    leptos::task::spawn_local(async move {
        let mut images = Vec::with_capacity(files.len());
        for file in files {
            match api::read_image(file).await {
                Ok(image) => images.push(image),
                Err(e) => log::warn!("could not read picked file: {e}"),
            }
        }
        apply(images);
    });
}

pub fn submit_label(busy: ReadSignal<bool>, idle: &'static str) -> impl Fn() -> &'static str {
    move || if busy.get() { "Saving…" } else { idle }
}

// ── Delete confirmation ─────────────────────────────────────────────

/// `(id, label)` of the entity awaiting confirmation.
pub type DeleteTarget = RwSignal<Option<(String, String)>>;

/// Confirmation modal for deleting the entity in `target`. Closes once
/// the store reports success; on failure the store's notice explains why
/// and the modal stays open.
pub fn confirm_delete<E: Resource>(store: Store<E>, target: DeleteTarget) -> impl IntoView {
    let (busy, set_busy) = signal(false);

    move || {
        target.get().map(|(id, label)| {
            let store = store.clone();
            let on_confirm = move |_| {
                let store = store.clone();
                let id = id.clone();
                set_busy.set(true);
                leptos::task::spawn_local(async move {
                    if store.delete(&id).await.is_ok() {
                        target.set(None);
                    }
                    set_busy.set(false);
                });
            };
            view! {
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="text-lg font-semibold mb-4">{format!("Delete {}?", E::SINGULAR)}</h3>
                        <p class="mb-4">
                            <strong>{label}</strong>
                            " will be removed permanently."
                        </p>
                        <div class="modal-action">
                            <button class="btn btn-ghost" on:click=move |_| target.set(None)>
                                "Cancel"
                            </button>
                            <button
                                class="btn btn-error"
                                disabled=move || busy.get()
                                on:click=on_confirm
                            >
                                {move || if busy.get() { "Deleting…" } else { "Delete" }}
                            </button>
                        </div>
                    </div>
                    <div class="modal-backdrop" on:click=move |_| target.set(None)></div>
                </div>
            }
        })
    }
}

/// Banner shown when the store holds an error; dismissing clears it.
pub fn store_error(
    error: Signal<Option<String>>,
    clear: impl Fn() + Clone + Send + Sync + 'static,
) -> impl IntoView {
    move || {
        let clear = clear.clone();
        error.get().map(|e| {
            view! {
                <div class="alert alert-error text-sm mb-4">
                    <span>{e}</span>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| clear()>"✕"</button>
                </div>
            }
        })
    }
}
