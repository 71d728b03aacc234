//! The flatten/rehydrate contract between a container and whatever persists it.
//!
//! Each container keeps a runtime structure tuned for its day-to-day operations
//! and can project it onto a linear, order-preserving record. The record is the
//! only thing a persistence layer ever sees:
//!
//! ```text
//! runtime state --flatten--> Record --(serde / host storage)--> Record --rehydrate--> runtime state
//! ```
//!
//! All `Serialize`/`Deserialize` impls in this module tree go through the
//! record, so any serde format acts as the host.

/// Two-way projection between a container and its persisted record.
pub trait Persist {
    /// Linear representation handed to the persistence layer.
    type Record;

    /// Project the current runtime state onto a fresh record.
    ///
    /// Must not modify runtime state.
    fn flatten(&self) -> Self::Record;

    /// Replace runtime state with the content of `record`.
    ///
    /// Structurally invalid records are healed (cells re-defaulted, duplicate
    /// or keyless entries dropped) instead of rejected.
    fn rehydrate(&mut self, record: Self::Record);

    /// Build a fresh container from a record.
    fn from_record(record: Self::Record) -> Self
    where
        Self: Default,
    {
        let mut container = Self::default();
        container.rehydrate(record);
        container
    }
}
