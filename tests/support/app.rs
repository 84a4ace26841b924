//! Application builders for integration tests.

use skylift::domain::{AppGuid, Application, PackageState};

/// A minimal application with the given identity.
pub fn make_app(guid: &str, name: &str) -> Application {
    Application {
        guid: AppGuid::new(guid),
        name: name.into(),
        ..Application::default()
    }
}

/// An application whose package is still staging.
pub fn pending_app(guid: &str, name: &str) -> Application {
    Application {
        package_state: PackageState::Pending,
        ..make_app(guid, name)
    }
}

/// A staged application with the given desired instance count.
pub fn staged_app(guid: &str, name: &str, instances: i64) -> Application {
    Application {
        package_state: PackageState::Staged,
        instances,
        ..make_app(guid, name)
    }
}

/// An application whose staging failed with the given reason.
pub fn failed_app(guid: &str, name: &str, reason: &str) -> Application {
    Application {
        package_state: PackageState::Failed,
        staging_failed_reason: reason.into(),
        ..make_app(guid, name)
    }
}
