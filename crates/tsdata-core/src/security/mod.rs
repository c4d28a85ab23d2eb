//! Security validation for archive entries.

pub mod quota;
pub mod validator;

pub use quota::QuotaTracker;
pub use validator::EntryValidator;
pub use validator::ValidatedEntry;
