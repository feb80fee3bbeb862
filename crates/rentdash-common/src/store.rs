//! Snapshot-publishing entity store.
//!
//! One `EntityStore<E, T>` owns the client-side view of one collection. Each
//! state transition produces a new immutable [`Snapshot`] that is pushed to
//! subscribers, so views never observe a half-applied update.
//!
//! Mutations are confirm-then-apply: nothing touches the collection until
//! the backend has answered with success. Reads (fetch, search, fetch by id)
//! carry a sequence number per slot; an answer to anything but the latest
//! request for that slot is dropped.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::cache::{self, KeyValueStore};
use crate::client::AdminClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::notify::{Notice, SharedNotifier};
use crate::publish::{Books, Loading, Publisher};
use crate::resource::{RequestPayload, Resource, Searchable};

/// Immutable view of a store at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<E> {
    pub items: Vec<E>,
    pub current: Option<E>,
    /// True while at least one action is awaiting the backend.
    pub loading: bool,
    pub error: Option<String>,
    /// Ids with an update or delete awaiting the backend.
    pub in_flight: BTreeSet<String>,
}

impl<E> Default for Snapshot<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            loading: false,
            error: None,
            in_flight: BTreeSet::new(),
        }
    }
}

impl<E: Clone> Loading for Snapshot<E> {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

impl<E: Resource> Snapshot<E> {
    pub fn find(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// `current`, but only when it holds `id`.
    pub fn current_for(&self, id: &str) -> Option<&E> {
        self.current.as_ref().filter(|c| c.id() == id)
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }
}

/// Services shared by every store of the app.
#[derive(Clone, Default)]
pub struct StoreContext {
    pub notifier: Option<SharedNotifier>,
    pub cache: Option<Arc<dyn KeyValueStore>>,
}

impl StoreContext {
    pub(crate) fn notify(&self, notice: Notice) {
        if let Some(n) = &self.notifier {
            n.notify(notice);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    FetchAll,
    FetchOne,
    Search,
    Create,
    Update,
    Delete,
}

impl Action {
    fn failure<E: Resource>(self) -> String {
        match self {
            Action::FetchAll => format!("Failed to fetch {}", E::PLURAL),
            Action::FetchOne => format!("Failed to fetch {}", E::SINGULAR),
            Action::Search => format!("Failed to search {}", E::PLURAL),
            Action::Create => format!("Failed to create {}", E::SINGULAR),
            Action::Update => format!("Failed to update {}", E::SINGULAR),
            Action::Delete => format!("Failed to delete {}", E::SINGULAR),
        }
    }

    fn success<E: Resource>(self) -> Option<String> {
        let verb = match self {
            Action::Create => "created",
            Action::Update => "updated",
            Action::Delete => "deleted",
            _ => return None,
        };
        Some(format!("{} {verb} successfully!", capitalized(E::SINGULAR)))
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    List,
    Current,
}

/// Latest read sequence per slot.
#[derive(Default)]
struct Seqs {
    list: u64,
    current: u64,
}

impl Seqs {
    fn get(&mut self, slot: Slot) -> &mut u64 {
        match slot {
            Slot::List => &mut self.list,
            Slot::Current => &mut self.current,
        }
    }
}

struct Inner<E, T> {
    client: Arc<AdminClient<T>>,
    ctx: StoreContext,
    publisher: Publisher<Snapshot<E>, Seqs>,
}

pub struct EntityStore<E, T> {
    inner: Arc<Inner<E, T>>,
}

impl<E, T> Clone for EntityStore<E, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

// ── Decoding helpers ────────────────────────────────────────────────

fn decode_list<E: Resource>(value: Value) -> Result<Vec<E>, ApiError> {
    match value {
        Value::Null => Ok(Vec::new()),
        v => Ok(serde_json::from_value(v)?),
    }
}

fn decode_one<E: Resource>(value: Value) -> Result<E, ApiError> {
    Ok(serde_json::from_value(value)?)
}

/// The entity a create answered with: the body itself, or a member object
/// of a `{ "message": ..., "<entity>": {..} }` wrapper.
fn find_created<E: Resource>(value: &Value) -> Option<E> {
    if let Ok(entity) = E::deserialize(value) {
        return Some(entity);
    }
    value
        .as_object()?
        .values()
        .filter(|v| v.is_object())
        .find_map(|v| E::deserialize(v).ok())
}

fn is_id(key: &str) -> bool {
    key == "id" || key == "_id"
}

/// The object in an update answer that describes `entry`: the body when it
/// shares a field with the entity, else the first member object that does.
/// Status-only bodies such as `{ "message": "ok" }` describe nothing.
fn entity_fields<'a, E: Resource>(
    entry: &E,
    returned: &'a Value,
) -> Option<&'a Map<String, Value>> {
    let base = serde_json::to_value(entry).ok()?;
    let known = base.as_object()?;
    let describes =
        |obj: &Map<String, Value>| obj.keys().any(|k| !is_id(k) && known.contains_key(k));

    let top = returned.as_object()?;
    if describes(top) {
        return Some(top);
    }
    top.values()
        .filter_map(Value::as_object)
        .find(|obj| describes(obj))
}

/// Overlay the entity's own fields from `fields` onto `entry`. Ids never
/// change through a merge; keys the entity does not carry are skipped.
fn merge<E: Resource>(entry: &E, fields: &Map<String, Value>) -> Option<E> {
    let mut base = serde_json::to_value(entry).ok()?;
    let obj = base.as_object_mut()?;
    for (k, v) in fields {
        if !is_id(k) && obj.contains_key(k) {
            obj.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(base).ok()
}

/// Best effort: merge the entity the backend described, else merge what we
/// sent, else keep the entry as it was.
fn reconcile<E: Resource>(entry: &E, returned: &Value, sent: &Value) -> E {
    entity_fields(entry, returned)
        .and_then(|fields| merge(entry, fields))
        .or_else(|| sent.as_object().and_then(|fields| merge(entry, fields)))
        .unwrap_or_else(|| entry.clone())
}

/// Append, or replace in place when the id is already present.
fn upsert<E: Resource>(items: &mut Vec<E>, entity: E) {
    match items.iter_mut().find(|e| e.id() == entity.id()) {
        Some(slot) => *slot = entity,
        None => items.push(entity),
    }
}

// ── Store ───────────────────────────────────────────────────────────

impl<E: Resource, T: Transport> EntityStore<E, T> {
    pub fn new(client: Arc<AdminClient<T>>, ctx: StoreContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                ctx,
                publisher: Publisher::new(Snapshot::default(), Seqs::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot<E>> {
        self.inner.publisher.snapshot()
    }

    /// Called with every new snapshot, starting from the next transition.
    pub fn subscribe(&self, listener: impl Fn(&Arc<Snapshot<E>>) + Send + Sync + 'static) {
        self.inner.publisher.subscribe(Arc::new(listener));
    }

    fn transition<R>(&self, f: impl FnOnce(&mut Books<Seqs>, &mut Snapshot<E>) -> R) -> R {
        self.inner.publisher.transition(f)
    }

    /// Mark a read in flight; returns the new sequence for `slot`.
    fn begin_read(&self, slot: Slot) -> u64 {
        self.transition(|books, snap| {
            books.pending += 1;
            snap.error = None;
            let seq = books.seq.get(slot);
            *seq += 1;
            *seq
        })
    }

    /// Mark a mutation in flight, tagging `id` as busy when given.
    fn begin_mutation(&self, id: Option<&str>) {
        self.transition(|books, snap| {
            books.pending += 1;
            snap.error = None;
            if let Some(id) = id {
                snap.in_flight.insert(id.to_string());
            }
        });
    }

    fn persist(&self) {
        let (Some(key), Some(store)) = (E::CACHE_KEY, self.inner.ctx.cache.as_deref()) else {
            return;
        };
        cache::save_collection(store, key, &self.snapshot().items);
    }

    /// Settle a read; answers to superseded requests are not applied.
    fn finish_read<V>(
        &self,
        slot: Slot,
        seq: u64,
        action: Action,
        result: Result<V, ApiError>,
        apply: impl FnOnce(&mut Snapshot<E>, V),
    ) -> Result<(), ApiError> {
        let fallback = action.failure::<E>();
        let (latest, err) = self.transition(|books, snap| {
            books.pending = books.pending.saturating_sub(1);
            if *books.seq.get(slot) != seq {
                return (false, result.err());
            }
            match result {
                Ok(v) => {
                    apply(snap, v);
                    (true, None)
                }
                Err(e) => {
                    snap.error = Some(e.user_message(&fallback));
                    (true, Some(e))
                }
            }
        });

        match (latest, err) {
            (false, err) => {
                log::debug!("{action:?} {}: dropping stale response #{seq}", E::PLURAL);
                err.map_or(Ok(()), Err)
            }
            (true, None) => {
                if matches!(slot, Slot::List) {
                    self.persist();
                }
                Ok(())
            }
            (true, Some(e)) => {
                log::warn!("{action:?} {}: {e}", E::PLURAL);
                self.inner.ctx.notify(Notice::error(e.user_message(&fallback)));
                Err(e)
            }
        }
    }

    /// Settle a mutation: apply on success, record and notify either way.
    fn finish_mutation<V>(
        &self,
        action: Action,
        id: Option<&str>,
        result: Result<V, ApiError>,
        apply: impl FnOnce(&mut Snapshot<E>, &V),
    ) -> Result<V, ApiError> {
        let fallback = action.failure::<E>();
        self.transition(|books, snap| {
            books.pending = books.pending.saturating_sub(1);
            if let Some(id) = id {
                snap.in_flight.remove(id);
            }
            match &result {
                Ok(v) => apply(snap, v),
                Err(e) => snap.error = Some(e.user_message(&fallback)),
            }
        });

        match &result {
            Ok(_) => {
                self.persist();
                if let Some(text) = action.success::<E>() {
                    self.inner.ctx.notify(Notice::success(text));
                }
            }
            Err(e) => {
                log::warn!("{action:?} {}: {e}", E::SINGULAR);
                self.inner.ctx.notify(Notice::error(e.user_message(&fallback)));
            }
        }
        result
    }

    /// Replace the collection with the backend's list.
    pub async fn fetch_all(&self) -> Result<(), ApiError> {
        let seq = self.begin_read(Slot::List);
        let result = match self.inner.client.get(E::COLLECTION, &[]).await {
            Ok(v) => decode_list::<E>(v),
            Err(e) => Err(e),
        };
        self.finish_read(Slot::List, seq, Action::FetchAll, result, |snap, items| {
            snap.items = items;
        })
    }

    /// Load one entity into the `current` slot.
    pub async fn fetch_by_id(&self, id: &str) -> Result<(), ApiError> {
        let seq = self.begin_read(Slot::Current);
        let result = match self.inner.client.get(&E::item_path(id), &[]).await {
            Ok(v) => decode_one::<E>(v),
            Err(e) => Err(e),
        };
        self.finish_read(Slot::Current, seq, Action::FetchOne, result, |snap, entity| {
            snap.current = Some(entity);
        })
    }

    /// Create on the backend, then append the entity it answered with.
    ///
    /// A success whose body carries no recognisable entity still counts as
    /// created; the collection is then reloaded and `None` returned.
    pub async fn create(&self, payload: &E::Create) -> Result<Option<E>, ApiError> {
        self.begin_mutation(None);
        let result = self
            .inner
            .client
            .post(E::CREATE_PATH, payload.to_body())
            .await
            .map(|v| find_created::<E>(&v));
        let created = self.finish_mutation(Action::Create, None, result, |snap, created| {
            if let Some(entity) = created {
                upsert(&mut snap.items, entity.clone());
            }
        })?;
        if created.is_none() {
            log::debug!("create {}: no entity in response, reloading", E::SINGULAR);
            // A failed reload is already recorded and notified.
            let _ = self.fetch_all().await;
        }
        Ok(created)
    }

    /// Patch on the backend, then merge the answer into the matching entry
    /// and into `current` when it holds the same id.
    pub async fn update(&self, id: &str, patch: &E::Patch) -> Result<(), ApiError> {
        self.begin_mutation(Some(id));
        let sent = patch.local_fields();
        let result = self
            .inner
            .client
            .patch(&E::item_path(id), patch.to_body())
            .await;
        self.finish_mutation(Action::Update, Some(id), result, |snap, returned| {
            for entry in snap.items.iter_mut().filter(|e| e.id() == id) {
                *entry = reconcile(entry, returned, &sent);
            }
            if let Some(current) = snap.current.as_mut().filter(|c| c.id() == id) {
                *current = reconcile(current, returned, &sent);
            }
        })
        .map(|_| ())
    }

    /// Delete on the backend, then drop the entry locally.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.begin_mutation(Some(id));
        let result = self.inner.client.delete(&E::item_path(id)).await;
        self.finish_mutation(Action::Delete, Some(id), result, |snap, _| {
            snap.items.retain(|e| e.id() != id);
            if snap.current.as_ref().is_some_and(|c| c.id() == id) {
                snap.current = None;
            }
        })
        .map(|_| ())
    }

    pub fn clear_error(&self) {
        self.transition(|_, snap| snap.error = None);
    }

    pub fn clear_current(&self) {
        self.transition(|_, snap| snap.current = None);
    }

    /// Seed an empty collection from the display cache.
    /// Returns whether anything was loaded.
    pub fn rehydrate(&self) -> bool {
        let (Some(key), Some(store)) = (E::CACHE_KEY, self.inner.ctx.cache.as_deref()) else {
            return false;
        };
        let Some(items) = cache::load_collection::<E>(store, key) else {
            return false;
        };
        self.transition(|_, snap| {
            if snap.items.is_empty() && !items.is_empty() {
                snap.items = items;
                true
            } else {
                false
            }
        })
    }
}

impl<E: Searchable, T: Transport> EntityStore<E, T> {
    /// Server-side search. A blank term reloads the full collection.
    pub async fn search(&self, term: &str) -> Result<(), ApiError> {
        let term = term.trim();
        if term.is_empty() {
            return self.fetch_all().await;
        }
        let seq = self.begin_read(Slot::List);
        let result = match self
            .inner
            .client
            .get(E::SEARCH_PATH, &[(E::SEARCH_PARAM, term)])
            .await
        {
            Ok(v) => decode_list::<E>(v),
            Err(e) => Err(e),
        };
        self.finish_read(Slot::List, seq, Action::Search, result, |snap, items| {
            snap.items = items;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::StaticToken;
    use crate::models::{Property, PropertyType};
    use crate::test_util::{property, MockTransport};
    use futures::executor::block_on;
    use serde_json::json;

    fn store() -> (EntityStore<Property, MockTransport>, MockTransport) {
        let transport = MockTransport::new();
        let client = AdminClient::new(
            transport.clone(),
            ApiConfig::new("https://api.test"),
            Arc::new(StaticToken(Some("tok".into()))),
        );
        (
            EntityStore::new(Arc::new(client), StoreContext::default()),
            transport,
        )
    }

    #[test]
    fn messages() {
        assert_eq!(
            Action::Delete.success::<Property>().as_deref(),
            Some("Property deleted successfully!")
        );
        assert_eq!(Action::Delete.failure::<Property>(), "Failed to delete property");
        assert_eq!(Action::FetchAll.failure::<Property>(), "Failed to fetch properties");
        assert!(Action::FetchAll.success::<Property>().is_none());
    }

    #[test]
    fn merge_ignores_id_and_keeps_untouched_fields() {
        let p = property("p1", "Lekki Flat", PropertyType::Flat);
        let fields = json!({ "_id": "zzz", "price": 99.0, "createdAt": "x" });
        let merged = merge(&p, fields.as_object().unwrap()).unwrap();
        assert_eq!(merged.id, "p1");
        assert_eq!(merged.price, 99.0);
        assert_eq!(merged.name, "Lekki Flat");
    }

    #[test]
    fn reconcile_falls_back_to_sent_fields() {
        let p = property("p1", "Lekki Flat", PropertyType::Flat);
        let out = reconcile(&p, &Value::Null, &json!({ "name": "Renamed" }));
        assert_eq!(out.name, "Renamed");
    }

    #[test]
    fn status_only_answer_describes_no_entity() {
        let p = property("p1", "Lekki Flat", PropertyType::Flat);
        assert!(entity_fields(&p, &json!({ "message": "Property updated" })).is_none());

        let out = reconcile(&p, &json!({ "message": "Property updated" }), &json!({ "price": 5.0 }));
        assert_eq!(out.price, 5.0);
        assert_eq!(out.name, "Lekki Flat");
    }

    #[test]
    fn wrapped_answer_is_unwrapped() {
        let p = property("p1", "Lekki Flat", PropertyType::Flat);
        let returned = json!({ "message": "ok", "property": { "_id": "p1", "price": 7.0 } });
        let fields = entity_fields(&p, &returned).unwrap();
        assert_eq!(fields.get("price"), Some(&json!(7.0)));

        let out = reconcile(&p, &returned, &json!({ "price": 5.0 }));
        assert_eq!(out.price, 7.0);
    }

    #[test]
    fn created_entity_found_bare_or_wrapped() {
        let bare = json!(property("p1", "A", PropertyType::Flat));
        assert_eq!(find_created::<Property>(&bare).map(|p| p.id), Some("p1".into()));

        let wrapped = json!({ "message": "Property created", "property": bare });
        assert_eq!(find_created::<Property>(&wrapped).map(|p| p.id), Some("p1".into()));

        assert!(find_created::<Property>(&json!({ "message": "done" })).is_none());
        assert!(find_created::<Property>(&Value::Null).is_none());
    }

    #[test]
    fn current_for_checks_the_id() {
        let snap = Snapshot {
            current: Some(property("p1", "A", PropertyType::Flat)),
            ..Snapshot::default()
        };
        assert!(snap.current_for("p1").is_some());
        assert!(snap.current_for("p2").is_none());
    }

    #[test]
    fn upsert_does_not_duplicate() {
        let mut items = vec![property("p1", "A", PropertyType::Flat)];
        upsert(&mut items, property("p1", "B", PropertyType::Flat));
        upsert(&mut items, property("p2", "C", PropertyType::House));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "B");
    }

    #[test]
    fn fetch_by_id_fills_current_only() {
        let (store, transport) = store();
        transport.push_json(200, json!(property("p7", "Ikoyi House", PropertyType::House)));
        block_on(store.fetch_by_id("p7")).unwrap();
        let snap = store.snapshot();
        assert!(snap.items.is_empty());
        assert_eq!(snap.current.as_ref().map(|p| p.id.as_str()), Some("p7"));
        assert_eq!(
            transport.requests()[0].url,
            "https://api.test/api/v1/admin/properties/p7"
        );

        store.clear_current();
        assert!(store.snapshot().current.is_none());
    }

    #[test]
    fn fetch_failure_keeps_previous_items() {
        let (store, transport) = store();
        transport.push_json(200, json!([property("p1", "A", PropertyType::Flat)]));
        block_on(store.fetch_all()).unwrap();

        transport.push_json(500, json!({}));
        assert!(block_on(store.fetch_all()).is_err());
        let snap = store.snapshot();
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.error.as_deref(), Some("Failed to fetch properties"));
        assert!(!snap.loading);

        store.clear_error();
        assert!(store.snapshot().error.is_none());
    }

    #[test]
    fn blank_search_is_a_full_fetch() {
        let (store, transport) = store();
        transport.push_json(200, json!([]));
        block_on(store.search("   ")).unwrap();
        assert_eq!(
            transport.requests()[0].url,
            "https://api.test/api/v1/admin/properties"
        );
    }
}
