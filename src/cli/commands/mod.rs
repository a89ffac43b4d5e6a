//! Command implementations.

/// Translation command handler.
pub mod translate;

/// Version report.
pub mod version;
