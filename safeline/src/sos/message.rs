//! Emergency alert message body.

use chrono::{DateTime, Local};

/// Banner line at the top of every alert.
pub const ALERT_BANNER: &str = "\u{1F6A8} EMERGENCY SOS ALERT \u{1F6A8}";

/// Location line placeholder; GPS attachment is out of scope.
pub const LOCATION_PLACEHOLDER: &str = "[GPS coordinates will be added]";

/// Used when a stored contact has an empty name.
const NAME_FALLBACK: &str = "your emergency contact";

/// Build the alert body sent to one contact.
///
/// The contact's own name is interpolated into the template, matching the
/// message each recipient historically received.
pub fn alert_body(contact_name: &str, sent_at: DateTime<Local>) -> String {
    let name = if contact_name.trim().is_empty() {
        NAME_FALLBACK
    } else {
        contact_name
    };

    format!(
        "{ALERT_BANNER}\n\n\
         This is an emergency alert from {name}.\n\n\
         I need immediate assistance. Please respond or call emergency services if needed.\n\n\
         Location: {LOCATION_PLACEHOLDER}\n\
         Time: {}",
        sent_at.format("%Y-%m-%d %H:%M:%S")
    )
}
