//! Subcommand execution.

use std::time::Duration;

use beacon_common::{BeaconError, HostLifecycle, PresenceEvent};
use beacon_presence::PresenceClient;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::cli::Command;

pub async fn run(
    command: Command,
    client: &PresenceClient,
    host: &HostLifecycle,
) -> Result<(), BeaconError> {
    match command {
        Command::Get { person_id } => print_json(&client.get(&person_id).await?),
        Command::List { person_ids } => print_json(&client.list(&person_ids).await?),
        Command::Subscribe { person_ids } => print_json(&client.subscribe(&person_ids).await?),
        Command::Unsubscribe { person_id } => print_json(&client.unsubscribe(&person_id).await?),
        Command::SetStatus { status, ttl } => {
            let confirmed = client
                .set_status_with_ttl(&status, ttl.map(Duration::from_secs))
                .await?;
            match confirmed {
                Some(record) => print_json(&record),
                None => {
                    println!("status set to {status}");
                    Ok(())
                }
            }
        }
        Command::Watch { person_ids } => watch(client, host, &person_ids).await,
    }
}

async fn watch(
    client: &PresenceClient,
    host: &HostLifecycle,
    person_ids: &[String],
) -> Result<(), BeaconError> {
    for id in person_ids {
        client.enqueue(id)?;
    }
    let mut events = client.events();

    let state = client.initialize_worker().await;
    debug!(?state, "worker requested");
    host.trigger_ready();
    info!(watching = person_ids.len(), "watching presence, Ctrl-C to stop");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if let Some(line) = describe(&event) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(missed)) => warn!(missed, "presence events dropped"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    for id in person_ids {
        client.dequeue(id)?;
    }
    Ok(())
}

/// One output line per presence change; lifecycle events are not printed.
fn describe(event: &PresenceEvent) -> Option<String> {
    match event {
        PresenceEvent::Updated {
            person_id,
            status,
            last_active: Some(last_active),
        } => Some(format!("{person_id}\t{status}\t(last active {last_active})")),
        PresenceEvent::Updated {
            person_id, status, ..
        } => Some(format!("{person_id}\t{status}")),
        PresenceEvent::Evicted { person_id } => Some(format!("{person_id}\tgone")),
        PresenceEvent::WorkerStarted | PresenceEvent::WorkerStopped | PresenceEvent::Unknown => {
            None
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), BeaconError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BeaconError::Other(format!("failed to render output: {e}")))?;
    println!("{json}");
    Ok(())
}
