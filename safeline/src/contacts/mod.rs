//! Contacts screen controller.
//!
//! Mediates user CRUD gestures against the contact store and owns the
//! screen's in-memory snapshot. The per-row `selected` flag is cosmetic: it
//! is never persisted, resets on every reload, and does not affect which
//! contacts receive SOS messages.

use crate::db::{Contact, ContactStore};
use crate::feedback::FeedbackHandle;
use safeline_shared::errors::{SafelineError, SafelineResult};

/// One row of the screen snapshot.
#[derive(Debug, Clone)]
pub struct ContactRow {
    pub contact: Contact,
    pub selected: bool,
}

/// State of the add-contact entry form.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub name: String,
    pub mobile: String,
    pub open: bool,
}

/// Controller for the emergency contacts screen.
pub struct ContactsScreen {
    store: ContactStore,
    feedback: FeedbackHandle,
    rows: Vec<ContactRow>,
    form: EntryForm,
}

impl ContactsScreen {
    /// Create a controller with an empty snapshot; call [`refresh`] to load.
    ///
    /// [`refresh`]: ContactsScreen::refresh
    pub fn new(store: ContactStore, feedback: FeedbackHandle) -> Self {
        Self {
            store,
            feedback,
            rows: Vec::new(),
            form: EntryForm::default(),
        }
    }

    /// Reload the snapshot wholesale from the store.
    ///
    /// All selection flags reset to false; the snapshot is never assumed
    /// consistent with the store between refreshes.
    pub fn refresh(&mut self) {
        self.rows = self
            .store
            .list()
            .into_iter()
            .map(|contact| ContactRow {
                contact,
                selected: false,
            })
            .collect();
    }

    /// Current snapshot.
    pub fn rows(&self) -> &[ContactRow] {
        &self.rows
    }

    /// Number of rows currently marked selected.
    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|row| row.selected).count()
    }

    /// Current entry form state.
    pub fn entry_form(&self) -> &EntryForm {
        &self.form
    }

    /// Open the add-contact entry form.
    pub fn open_entry_form(&mut self) {
        self.feedback.notify();
        self.form.open = true;
    }

    /// Flip the in-memory selection flag on the identified row.
    ///
    /// Store state is untouched and the SOS fan-out is unaffected.
    pub fn toggle_selected(&mut self, id: i64) {
        self.feedback.notify();
        if let Some(row) = self.rows.iter_mut().find(|row| row.contact.id == id) {
            row.selected = !row.selected;
        }
    }

    /// Add a contact.
    ///
    /// Validates non-empty fields locally before delegating to the store
    /// (the store checks again). On success the entry form is cleared and
    /// closed and the snapshot refreshed; on failure the input is preserved
    /// in the form for correction.
    pub fn add_contact(&mut self, name: &str, mobile: &str) -> SafelineResult<()> {
        if name.trim().is_empty() || mobile.trim().is_empty() {
            self.feedback.error();
            self.form.name = name.to_string();
            self.form.mobile = mobile.to_string();
            return Err(SafelineError::Validation(
                "please fill in both name and phone number".to_string(),
            ));
        }

        match self.store.add(name, mobile) {
            Ok(()) => {
                self.feedback.success();
                self.form = EntryForm::default();
                self.refresh();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to add contact");
                self.feedback.error();
                self.form.name = name.to_string();
                self.form.mobile = mobile.to_string();
                Err(e)
            }
        }
    }

    /// Start deleting a contact.
    ///
    /// Destructive, so the caller gets a two-option prompt: [`DeletePrompt::confirm`]
    /// performs the deletion, [`DeletePrompt::cancel`] leaves everything as is.
    pub fn delete_contact(&mut self, id: i64) -> DeletePrompt<'_> {
        self.feedback.notify();
        DeletePrompt { screen: self, id }
    }

    fn confirm_delete(&mut self, id: i64) -> SafelineResult<()> {
        match self.store.delete(id) {
            Ok(()) => {
                self.feedback.success();
                self.rows.retain(|row| row.contact.id != id);
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to delete contact");
                self.feedback.error();
                Err(e)
            }
        }
    }
}

/// Pending destructive deletion, resolved by the user's prompt choice.
#[must_use = "the deletion only happens on confirm()"]
pub struct DeletePrompt<'a> {
    screen: &'a mut ContactsScreen,
    id: i64,
}

impl DeletePrompt<'_> {
    /// Keep the contact.
    pub fn cancel(self) {}

    /// Remove the contact from the store and drop it from the snapshot.
    pub fn confirm(self) -> SafelineResult<()> {
        self.screen.confirm_delete(self.id)
    }
}
