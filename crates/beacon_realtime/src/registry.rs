//! Service lookup.

use std::sync::Arc;

use beacon_service::{App, ServiceHandle, normalize_path};

use crate::error::InstallError;

/// Resolves the service registered under `path`.
///
/// # Errors
///
/// Returns [`InstallError::ServiceNotFound`] if nothing is registered there.
pub fn resolve(app: &App, path: &str) -> Result<Arc<dyn ServiceHandle>, InstallError> {
    app.service(path)
        .ok_or_else(|| InstallError::ServiceNotFound(normalize_path(path).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_service::MemoryService;

    #[test]
    fn resolves_registered_services_by_normalized_path() {
        let mut app = App::new();
        app.use_service("code", MemoryService::new()).unwrap();

        assert_eq!(resolve(&app, "/code").unwrap().path(), "code");
        assert!(matches!(
            resolve(&app, "/missing/"),
            Err(InstallError::ServiceNotFound(path)) if path == "missing"
        ));
    }
}
