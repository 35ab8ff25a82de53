#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use script_gateway::GatewayError;
use script_gateway::cache::{Clock, DEFAULT_TTL, FingerprintCache, ManualClock};
use script_gateway::generation::GenerationClient;
use script_gateway::service::ContentService;

pub const FULL_REPLY: &str = r#"{"script":{"gancho":"¿Tu café sabe amargo?","problema":"La mayoría hierve el agua de más.","solucion":"Usa agua a 92 grados y muele al momento.","cta":"Sígueme para más trucos de barista."},"recommendations":["Publica por la mañana","Usa audio en tendencia","Muestra el antes y después"],"viralityScore":8,"qualityScore":7,"reasons":["Gancho directo","Problema común","Solución accionable"]}"#;

// Generation client that replays canned replies and counts calls.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    fallback: Result<String, GatewayError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn always(reply: &str) -> Self {
        Self::with_fallback(Ok(reply.to_string()))
    }

    pub fn failing(err: GatewayError) -> Self {
        Self::with_fallback(Err(err))
    }

    fn with_fallback(fallback: Result<String, GatewayError>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn then(self, reply: Result<String, GatewayError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub struct Harness {
    pub client: Arc<ScriptedClient>,
    pub clock: Arc<ManualClock>,
    pub service: Arc<ContentService>,
}

pub fn harness(client: ScriptedClient) -> Harness {
    harness_with(client, false)
}

pub fn harness_with(client: ScriptedClient, single_flight: bool) -> Harness {
    let client = Arc::new(client);
    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(FingerprintCache::with_clock(
        DEFAULT_TTL,
        clock.clone() as Arc<dyn Clock>,
    ));
    let service =
        Arc::new(ContentService::new(cache, client.clone()).with_single_flight(single_flight));
    Harness {
        client,
        clock,
        service,
    }
}
