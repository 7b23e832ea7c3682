//! Subscribe and print a channel's chat.

use color_eyre::eyre::{bail, Result};
use std::future::Future;
use std::io::Write;
use uuid::Uuid;

use crate::{BridgeClient, SubscriptionOutcome};

/// What came of a tail run.
#[derive(Debug, Clone, PartialEq)]
pub enum TailOutcome {
    /// The user has to authorize at this path first
    AuthRequired { path: String },
    /// Streaming stopped; resume from this id
    Stopped { last_event_id: Option<i64> },
}

/// Subscribe, then write every message to `out` until the stream ends or
/// `shutdown` resolves.
pub async fn tail_channel<S, W>(
    client: &BridgeClient,
    channel: Uuid,
    last_event_id: Option<i64>,
    shutdown: S,
    mut out: W,
) -> Result<TailOutcome>
where
    S: Future<Output = ()> + Send + 'static,
    W: Write + Send,
{
    match client.subscribe(channel).await? {
        SubscriptionOutcome::Success | SubscriptionOutcome::AlreadySubscribed => {}
        SubscriptionOutcome::AuthRequired { path, .. } => {
            return Ok(TailOutcome::AuthRequired { path });
        }
        SubscriptionOutcome::Error { status } => {
            bail!("subscribe failed with HTTP {}", status);
        }
    }

    let session = client
        .session(channel, last_event_id)
        .on_error(|err| tracing::warn!(error = %err, "stream error"));
    let handle = session.handle();

    let closer = handle.clone();
    let watcher = tokio::spawn(async move {
        shutdown.await;
        closer.close();
    });

    let result = session
        .run(|message| {
            if let Err(e) = writeln!(out, "{}", message) {
                tracing::warn!(error = %e, "failed to write message");
            }
        })
        .await;
    watcher.abort();
    result?;

    let last_event_id = handle.last_delivered_id();
    tracing::info!(?last_event_id, "stream stopped");
    Ok(TailOutcome::Stopped { last_event_id })
}

/// Drop the subscription.
pub async fn unsubscribe_channel(client: &BridgeClient, channel: Uuid) -> Result<bool> {
    let removed = client.unsubscribe(channel).await?;
    if removed {
        tracing::info!(%channel, "unsubscribed");
    } else {
        tracing::info!(%channel, "no subscription to remove");
    }
    Ok(removed)
}
