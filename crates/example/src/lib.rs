//! Example realtime chat room built with Beacon.
//!
//! Two in-memory services, `users` and `messages`, are wrapped with the
//! realtime layer. A validation hook guards message creation, a pair of hooks
//! records which transport posted each message, and every successful write
//! reaches subscribers of the service's event bus.

use beacon_realtime::{RealtimeConfig, RealtimePlugin};
use beacon_service::{
    App, AppError, HookRegistrationError, HookScope, MemoryService, Method, ServiceError,
};
use serde_json::Value;

fn setup_error(error: HookRegistrationError) -> AppError {
    AppError::Plugin {
        name: "chat".into(),
        source: Box::new(error),
    }
}

/// Builds the chat application with the given realtime settings for `messages`.
///
/// # Errors
///
/// Fails if a service or plugin cannot be registered.
pub fn chat_app(messages: RealtimeConfig) -> Result<App, AppError> {
    let mut app = App::new();
    register_chat(&mut app, messages)?;
    Ok(app)
}

/// Registers the chat services and their realtime wrappers on `app`.
///
/// Plugins configured on `app` beforehand (tracing) observe the installs.
///
/// # Errors
///
/// Fails if a service or plugin cannot be registered.
pub fn register_chat(app: &mut App, messages: RealtimeConfig) -> Result<(), AppError> {
    app.use_service("users", MemoryService::new())?
        .use_service("messages", MemoryService::new())?;

    if let Some(service) = app.service("messages") {
        service
            .hooks()
            .before(Method::Create, "require-text", |ctx| {
                let text = ctx
                    .call()
                    .data()
                    .and_then(|data| data.get("text"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                if text.trim().is_empty() {
                    return Err(ServiceError::bad_request("message text is required"));
                }
                Ok(())
            })
            .map_err(setup_error)?
            .before(Method::Create, "note-transport", |ctx| {
                let via = ctx.call().params().provider.clone();
                ctx.params_mut()
                    .extra
                    .insert("via".into(), Value::from(via.unwrap_or_else(|| "server".into())));
                Ok(())
            })
            .map_err(setup_error)?
            .after(HookScope::All, "strip-internal", |ctx| {
                if let Some(result) = ctx.result_object_mut() {
                    result.remove("internal");
                }
                Ok(())
            })
            .map_err(setup_error)?
            .after(Method::Create, "stamp-transport", |ctx| {
                let via = ctx.call().params().extra.get("via").cloned();
                if let (Some(via), Some(result)) = (via, ctx.result_object_mut()) {
                    result.insert("via".into(), via);
                }
                Ok(())
            })
            .map_err(setup_error)?;
    }

    app.configure(RealtimePlugin::new("users", RealtimeConfig::default()))?
        .configure(RealtimePlugin::new("messages", messages))?;
    Ok(())
}
