use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::cache::{FingerprintCache, make_cache_key};
use crate::error::GatewayError;
use crate::extract::parse_model_output;
use crate::generation::GenerationClient;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, GENERATION_FAILURES, GENERATION_LATENCY, VALIDATION_REJECTIONS,
};
use crate::models::{GenerationRequest, GenerationResult, NormalizedRequest};
use crate::normalize::normalize;
use crate::prompt::build_prompt;

// One-time channel back to a request waiting on someone else's generation
type Waiter = oneshot::Sender<Result<GenerationResult, GatewayError>>;

// The request-to-result pipeline:
// normalize, cache lookup, prompt, model call, extract, validate, store.
pub struct ContentService {
    cache: Arc<FingerprintCache>,
    client: Arc<dyn GenerationClient>,
    // Some when concurrent misses on one key should share a single model call
    in_flight: Option<DashMap<String, Vec<Waiter>>>,
}

enum Role {
    Leader,
    Follower(oneshot::Receiver<Result<GenerationResult, GatewayError>>),
}

// Owns the leader's in-flight slot. `complete` removes it and hands the
// outcome to every waiter; if the leader is dropped before that, the slot
// is removed on drop so followers get an error instead of waiting forever.
// The slot is removed exactly once, a later leader's slot is never touched.
struct FlightGuard<'a> {
    in_flight: &'a DashMap<String, Vec<Waiter>>,
    key: &'a str,
    armed: bool,
}

impl<'a> FlightGuard<'a> {
    fn new(in_flight: &'a DashMap<String, Vec<Waiter>>, key: &'a str) -> Self {
        Self {
            in_flight,
            key,
            armed: true,
        }
    }

    fn complete(&mut self, outcome: &Result<GenerationResult, GatewayError>) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Some((_, waiters)) = self.in_flight.remove(self.key) {
            for tx in waiters {
                let _ = tx.send(outcome.clone());
            }
        }
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.in_flight.remove(self.key);
        }
    }
}

impl ContentService {
    pub fn new(cache: Arc<FingerprintCache>, client: Arc<dyn GenerationClient>) -> Self {
        Self {
            cache,
            client,
            in_flight: None,
        }
    }

    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.in_flight = enabled.then(DashMap::new);
        self
    }

    pub async fn generate(&self, raw: GenerationRequest) -> Result<GenerationResult, GatewayError> {
        let req = normalize(raw).inspect_err(|e| {
            VALIDATION_REJECTIONS.inc();
            warn!(error = %e, "rejecting request");
        })?;

        let key = make_cache_key(&req);

        // check cache first
        if let Some(hit) = self.cache.get_by_key(&key) {
            CACHE_HITS.inc();
            info!(platform = %req.platform, topic = %req.topic, "cache hit");
            return Ok(hit);
        }
        CACHE_MISSES.inc();
        debug!(key = %key, "cache miss");

        match &self.in_flight {
            None => self.run(&req, key).await,
            Some(in_flight) => self.run_shared(in_flight, &req, key).await,
        }
    }

    async fn run_shared(
        &self,
        in_flight: &DashMap<String, Vec<Waiter>>,
        req: &NormalizedRequest,
        key: String,
    ) -> Result<GenerationResult, GatewayError> {
        let role = match in_flight.entry(key.clone()) {
            Entry::Occupied(mut waiters) => {
                let (tx, rx) = oneshot::channel();
                waiters.get_mut().push(tx);
                Role::Follower(rx)
            }
            Entry::Vacant(slot) => {
                slot.insert(Vec::new());
                Role::Leader
            }
        };

        match role {
            Role::Follower(rx) => {
                debug!(key = %key, "waiting on in-flight generation");
                rx.await.unwrap_or_else(|_| {
                    Err(GatewayError::Internal(
                        "la generación en curso fue cancelada".to_string(),
                    ))
                })
            }
            Role::Leader => {
                let mut guard = FlightGuard::new(in_flight, &key);
                let outcome = self.run(req, key.clone()).await;
                guard.complete(&outcome);
                outcome
            }
        }
    }

    // Single attempt against the model, no retry
    async fn run(&self, req: &NormalizedRequest, key: String) -> Result<GenerationResult, GatewayError> {
        let prompt = build_prompt(req);

        let start_time = Instant::now();
        let reply = self.client.generate(&prompt).await;
        let elapsed = start_time.elapsed();
        GENERATION_LATENCY.observe(elapsed.as_secs_f64());

        let outcome = reply.and_then(|text| {
            info!(elapsed_ms = elapsed.as_millis() as u64, chars = text.len(), "model replied");
            debug!(reply = %text, "raw model reply");
            parse_model_output(&text)
        });

        match outcome {
            Ok(result) => {
                // saving to cache
                self.cache.put_by_key(key, result.clone());
                Ok(result)
            }
            Err(e) => {
                GENERATION_FAILURES.with_label_values(&[e.kind()]).inc();
                match &e {
                    GatewayError::Transport(_) => {
                        error!(kind = e.kind(), error = %e, "generation call failed")
                    }
                    _ => warn!(kind = e.kind(), error = %e, "model reply unusable"),
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiter() -> (Waiter, oneshot::Receiver<Result<GenerationResult, GatewayError>>) {
        oneshot::channel()
    }

    #[test]
    fn completed_guard_leaves_next_leader_slot_alone() {
        let in_flight: DashMap<String, Vec<Waiter>> = DashMap::new();
        let key = "k".to_string();

        in_flight.insert(key.clone(), Vec::new());
        let (tx, mut first_rx) = waiter();
        in_flight.get_mut(&key).unwrap().push(tx);

        let mut first = FlightGuard::new(&in_flight, &key);
        first.complete(&Err(GatewayError::NoJsonFound));
        assert_eq!(first_rx.try_recv().unwrap(), Err(GatewayError::NoJsonFound));

        // a new leader claims the key and picks up a follower before the
        // first guard goes out of scope
        in_flight.insert(key.clone(), Vec::new());
        let (tx, mut second_rx) = waiter();
        in_flight.get_mut(&key).unwrap().push(tx);

        drop(first);

        assert_eq!(in_flight.get(&key).map(|w| w.len()), Some(1));
        assert!(matches!(
            second_rx.try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn dropped_guard_releases_its_waiters() {
        let in_flight: DashMap<String, Vec<Waiter>> = DashMap::new();
        let key = "k".to_string();

        in_flight.insert(key.clone(), Vec::new());
        let (tx, mut rx) = waiter();
        in_flight.get_mut(&key).unwrap().push(tx);

        drop(FlightGuard::new(&in_flight, &key));

        assert!(in_flight.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }
}
