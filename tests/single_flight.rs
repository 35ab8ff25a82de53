// Concurrent identical misses, with and without request coalescing.

mod common;

use std::time::Duration;

use common::{FULL_REPLY, ScriptedClient, harness_with};
use script_gateway::{GatewayError, GenerationRequest};

fn request() -> GenerationRequest {
    GenerationRequest {
        platform: Some("Instagram".into()),
        content_type: Some("reel".into()),
        topic: Some("latte art".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn without_coalescing_concurrent_misses_each_call_the_model() {
    let h = harness_with(
        ScriptedClient::always(FULL_REPLY).with_delay(Duration::from_millis(50)),
        false,
    );

    let (a, b) = tokio::join!(h.service.generate(request()), h.service.generate(request()));
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(h.client.calls(), 2);
}

#[tokio::test]
async fn with_coalescing_followers_share_the_leader_result() {
    let h = harness_with(
        ScriptedClient::always(FULL_REPLY).with_delay(Duration::from_millis(50)),
        true,
    );

    let (a, b, c) = tokio::join!(
        h.service.generate(request()),
        h.service.generate(request()),
        h.service.generate(request())
    );
    assert_eq!(h.client.calls(), 1);
    let a = a.unwrap();
    assert_eq!(b.unwrap(), a);
    assert_eq!(c.unwrap(), a);

    // later request is a plain cache hit
    h.service.generate(request()).await.unwrap();
    assert_eq!(h.client.calls(), 1);
}

#[tokio::test]
async fn with_coalescing_failures_reach_every_waiter() {
    let h = harness_with(
        ScriptedClient::failing(GatewayError::Transport("timeout".into()))
            .with_delay(Duration::from_millis(50)),
        true,
    );

    let (a, b) = tokio::join!(h.service.generate(request()), h.service.generate(request()));
    assert_eq!(a, Err(GatewayError::Transport("timeout".into())));
    assert_eq!(b, Err(GatewayError::Transport("timeout".into())));
    assert_eq!(h.client.calls(), 1);

    // nothing left in flight, next request tries again
    let _ = h.service.generate(request()).await;
    assert_eq!(h.client.calls(), 2);
}

#[tokio::test]
async fn abandoned_leader_releases_followers() {
    let h = harness_with(
        ScriptedClient::always(FULL_REPLY).with_delay(Duration::from_millis(200)),
        true,
    );

    let leader = h.service.clone();
    let handle = tokio::spawn(async move { leader.generate(request()).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let follower = h.service.clone();
    let waiting = tokio::spawn(async move { follower.generate(request()).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    handle.abort();
    let outcome = waiting.await.unwrap();
    assert!(matches!(outcome, Err(GatewayError::Internal(_))));
}
