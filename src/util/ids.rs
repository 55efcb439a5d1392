//! Identifier aliases shared by the data model.

/// Opaque class session identifier.
pub type SessionId = String;
/// Opaque user identifier, owned by the authentication collaborator.
pub type UserId = String;
/// Row identifier for enrollments and waitlist entries.
pub type EntryId = String;

/// Generate a fresh random row identifier.
pub fn new_entry_id() -> EntryId {
    uuid::Uuid::new_v4().to_string()
}
