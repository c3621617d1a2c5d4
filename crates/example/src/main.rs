//! Example realtime chat room CLI.
//!
//! Creates a user, posts a few messages, edits and deletes one, and logs
//! every lifecycle event a connected client would receive.
//!
//! # Usage
//!
//! ```bash
//! chat [realtime-config.json]
//! ```
//!
//! The optional file holds a realtime configuration for the `messages`
//! service, e.g. `{ "eventMap": { "create": "posted" }, "emitOn": "background" }`.

use beacon_core_plugins::{TracingFormat, TracingPlugin};
use beacon_realtime::RealtimeConfig;
use beacon_service::{App, Params};
use example::register_chat;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::Level;

#[tokio::main]
async fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| RealtimeConfig::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: cannot load {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => RealtimeConfig::default(),
    };

    let mut app = App::new();
    if let Err(e) = app.configure(
        TracingPlugin::default()
            .with_level(Level::INFO)
            .with_format(TracingFormat::Compact),
    ) {
        eprintln!("Error: {e}");
    }
    if let Err(e) = register_chat(&mut app, config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let (Some(users), Some(messages)) = (app.service("users"), app.service("messages")) else {
        eprintln!("Error: chat services are missing");
        std::process::exit(1);
    };

    // Stand-in for a connected client.
    let mut clients = Vec::new();
    for service in [&users, &messages] {
        let mut events = service.events().subscribe();
        clients.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => tracing::info!(
                        service = %event.service,
                        event = %event.event,
                        payload = %event.payload,
                        "client received"
                    ),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "client fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }

    let script = async {
        let fred = users
            .create(json!({ "name": "Fred Flintstone" }), Params::default())
            .await?;
        for text in ["Yabba dabba doo!", "Wilma?"] {
            messages
                .create(json!({ "text": text, "userId": fred["id"] }), Params::default())
                .await?;
        }
        messages
            .patch(Some(1u64.into()), json!({ "text": "WILMA!" }), Params::default())
            .await?;
        messages.remove(Some(0u64.into()), Params::default()).await?;
        messages.find(Params::default()).await
    };

    match script.await {
        Ok(remaining) => tracing::info!(%remaining, "chat finished"),
        Err(e) => eprintln!("Error: {e}"),
    }

    // Dropping every handle closes the event channels once queued events are read.
    drop((users, messages, app));
    for client in clients {
        if let Err(e) = client.await {
            eprintln!("Error: client task failed: {e}");
        }
    }
}
