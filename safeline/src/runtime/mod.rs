//! Runtime wiring: store lifecycle plus controller construction.

pub mod options;

pub use options::SafelineOptions;

use std::sync::Arc;

use crate::contacts::ContactsScreen;
use crate::db::{ContactStore, Database};
use crate::dispatch::SmsDispatcher;
use crate::feedback::{Feedback, FeedbackHandle};
use crate::sos::{SosController, SosTimings};
use safeline_shared::errors::SafelineResult;

/// Application runtime: one shared store handle plus the controllers that
/// use it. Collaborator ports are injected at construction.
pub struct SafelineRuntime {
    options: SafelineOptions,
    store: ContactStore,
    feedback: FeedbackHandle,
    sos: SosController,
}

impl SafelineRuntime {
    /// Create a runtime with default countdown timings.
    pub fn new(
        options: SafelineOptions,
        feedback: Arc<dyn Feedback>,
        dispatcher: Arc<dyn SmsDispatcher>,
    ) -> SafelineResult<Self> {
        Self::with_timings(options, feedback, dispatcher, SosTimings::default())
    }

    /// Create a runtime with explicit countdown timings.
    ///
    /// Initialization is the readiness gate: when this returns, the store
    /// has either opened or been replaced by a disconnected handle, so the
    /// app is usable either way. A failed open is logged, not surfaced; a
    /// broken store then behaves like an empty one.
    pub fn with_timings(
        options: SafelineOptions,
        feedback: Arc<dyn Feedback>,
        dispatcher: Arc<dyn SmsDispatcher>,
        timings: SosTimings,
    ) -> SafelineResult<Self> {
        options.sanitize()?;
        let feedback = FeedbackHandle::new(feedback);

        let db_path = options.db_path();
        let store = match Database::open(&db_path) {
            Ok(db) => ContactStore::new(db),
            Err(e) => {
                tracing::error!(
                    path = %db_path.display(),
                    error = %e,
                    "Failed to open contact database, continuing with a disconnected store"
                );
                ContactStore::disconnected()
            }
        };

        let sos = SosController::new(
            store.clone(),
            dispatcher,
            feedback.clone(),
            timings,
            options.country_code.clone(),
        );

        Ok(Self {
            options,
            store,
            feedback,
            sos,
        })
    }

    pub fn options(&self) -> &SafelineOptions {
        &self.options
    }

    /// Shared contact store handle.
    pub fn store(&self) -> ContactStore {
        self.store.clone()
    }

    /// The SOS activation controller.
    pub fn sos(&self) -> &SosController {
        &self.sos
    }

    /// Build a contacts screen controller with a freshly loaded snapshot.
    pub fn contacts_screen(&self) -> ContactsScreen {
        let mut screen = ContactsScreen::new(self.store.clone(), self.feedback.clone());
        screen.refresh();
        screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::LogSmsDispatcher;
    use crate::feedback::LogFeedback;
    use tempfile::TempDir;

    fn runtime_in(dir: &TempDir) -> SafelineRuntime {
        let options = SafelineOptions {
            home_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        SafelineRuntime::new(
            options,
            Arc::new(LogFeedback),
            Arc::new(LogSmsDispatcher),
        )
        .unwrap()
    }

    #[test]
    fn test_runtime_opens_store() {
        let dir = TempDir::new().unwrap();
        let rt = runtime_in(&dir);
        assert!(rt.store().is_connected());
        assert!(rt.options().db_path().exists());
    }

    #[test]
    fn test_runtime_ready_despite_open_failure() {
        let dir = TempDir::new().unwrap();
        // A directory where the db file should be makes the open fail
        std::fs::create_dir(dir.path().join("safeline.db")).unwrap();

        let rt = runtime_in(&dir);
        assert!(!rt.store().is_connected());
        // Degraded, not dead: reads come back empty
        assert!(rt.store().list().is_empty());
    }

    #[test]
    fn test_runtime_rejects_invalid_options() {
        let dir = TempDir::new().unwrap();
        let options = SafelineOptions {
            home_dir: dir.path().to_path_buf(),
            country_code: "nine-one".to_string(),
            ..Default::default()
        };
        let result = SafelineRuntime::new(
            options,
            Arc::new(LogFeedback),
            Arc::new(LogSmsDispatcher),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_contacts_screen_sees_shared_store() {
        let dir = TempDir::new().unwrap();
        let rt = runtime_in(&dir);

        rt.store().add("Alice", "9000000001").unwrap();
        let screen = rt.contacts_screen();
        assert_eq!(screen.rows().len(), 1);
    }
}
