//! Read-only earnings store, one year at a time.

use std::sync::Arc;

use crate::client::AdminClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::Earnings;
use crate::notify::Notice;
use crate::publish::{Books, Loading, Publisher};
use crate::store::StoreContext;

pub const EARNINGS_PATH: &str = "/earnings";

const FETCH_FAILED: &str = "Failed to fetch earnings";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsSnapshot {
    /// Year most recently requested.
    pub year: Option<String>,
    pub earnings: Option<Earnings>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Loading for EarningsSnapshot {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

struct Inner<T> {
    client: Arc<AdminClient<T>>,
    ctx: StoreContext,
    publisher: Publisher<EarningsSnapshot, u64>,
}

pub struct EarningsStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for EarningsStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> EarningsStore<T> {
    pub fn new(client: Arc<AdminClient<T>>, ctx: StoreContext) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                ctx,
                publisher: Publisher::new(EarningsSnapshot::default(), 0),
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<EarningsSnapshot> {
        self.inner.publisher.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&Arc<EarningsSnapshot>) + Send + Sync + 'static) {
        self.inner.publisher.subscribe(Arc::new(listener));
    }

    fn transition<R>(&self, f: impl FnOnce(&mut Books<u64>, &mut EarningsSnapshot) -> R) -> R {
        self.inner.publisher.transition(f)
    }

    /// Load one year's figures. Switching years quickly is safe: only the
    /// answer for the latest request is kept.
    pub async fn fetch(&self, year: &str) -> Result<(), ApiError> {
        let seq = self.transition(|books, snap| {
            books.pending += 1;
            books.seq += 1;
            snap.year = Some(year.to_string());
            snap.error = None;
            books.seq
        });

        let result = match self.inner.client.get(EARNINGS_PATH, &[("year", year)]).await {
            Ok(v) => serde_json::from_value::<Earnings>(v).map_err(ApiError::from),
            Err(e) => Err(e),
        };

        let outcome = self.transition(|books, snap| {
            books.pending = books.pending.saturating_sub(1);
            if books.seq != seq {
                return None;
            }
            Some(match result {
                Ok(earnings) => {
                    snap.earnings = Some(earnings);
                    Ok(())
                }
                Err(e) => {
                    snap.error = Some(e.user_message(FETCH_FAILED));
                    Err(e)
                }
            })
        });

        match outcome {
            None => {
                log::debug!("earnings {year}: dropping stale response #{seq}");
                Ok(())
            }
            Some(Err(e)) => {
                log::warn!("earnings {year}: {e}");
                self.inner.ctx.notify(Notice::error(e.user_message(FETCH_FAILED)));
                Err(e)
            }
            Some(Ok(())) => Ok(()),
        }
    }

    pub fn clear_error(&self) {
        self.transition(|_, snap| snap.error = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::StaticToken;
    use crate::test_util::{MockTransport, RecordingNotifier};
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    fn store() -> (EarningsStore<MockTransport>, MockTransport, RecordingNotifier) {
        let transport = MockTransport::new();
        let notifier = RecordingNotifier::default();
        let client = AdminClient::new(
            transport.clone(),
            ApiConfig::new("https://api.test"),
            Arc::new(StaticToken(Some("tok".into()))),
        );
        let ctx = StoreContext {
            notifier: Some(Arc::new(notifier.clone())),
            cache: None,
        };
        (EarningsStore::new(Arc::new(client), ctx), transport, notifier)
    }

    #[test]
    fn fetch_sends_year_and_stores_result() {
        let (store, transport, _) = store();
        transport.push_json(
            200,
            json!({ "year": "2024", "months": [{ "month": "Jan", "amount": 1000.0 }] }),
        );
        block_on(store.fetch("2024")).unwrap();

        let req = &transport.requests()[0];
        assert_eq!(req.url, "https://api.test/earnings");
        assert_eq!(req.query, vec![("year".into(), "2024".into())]);

        let snap = store.snapshot();
        assert_eq!(snap.year.as_deref(), Some("2024"));
        assert_eq!(snap.earnings.as_ref().map(|e| e.total()), Some(1000.0));
        assert!(!snap.loading);
    }

    #[test]
    fn failure_sets_error_and_notifies() {
        let (store, transport, notifier) = store();
        transport.push_json(503, json!({}));
        assert!(block_on(store.fetch("2023")).is_err());
        assert_eq!(store.snapshot().error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(notifier.notices(), vec![Notice::error(FETCH_FAILED)]);
    }

    #[test]
    fn slow_answer_for_previous_year_is_dropped() {
        let (store, transport, _) = store();
        let first = transport.hold();
        let second = transport.hold();

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        for year in ["2023", "2024"] {
            let s = store.clone();
            spawner
                .spawn_local(async move {
                    let _ = s.fetch(year).await;
                })
                .unwrap();
            pool.run_until_stalled();
        }
        assert!(store.snapshot().loading);

        second.respond(crate::http::ApiResponse::new(
            200,
            json!({ "year": "2024", "months": [] }).to_string(),
        ));
        pool.run_until_stalled();
        assert!(store.snapshot().loading);

        first.respond(crate::http::ApiResponse::new(
            200,
            json!({ "year": "2023", "months": [] }).to_string(),
        ));
        pool.run_until_stalled();

        let snap = store.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.earnings.as_ref().map(|e| e.year.as_str()), Some("2024"));
    }
}
