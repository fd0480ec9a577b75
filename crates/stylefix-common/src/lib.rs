//! Common utilities for stylefix.
//!
//! This crate provides the pieces shared by the CSS crate and the CLI:
//! - **Location Resolver** - derive protocol, origin, and directory path from a document URL
//! - **Location Providers** - explicit stand-ins for an ambient "current page location"
//! - **Errors** - the invalid-input error raised when no document URL is available
//! - **Warning System** - deduplicated warnings routed through `tracing`

pub mod error;
pub mod location;
pub mod warning;

pub use error::FixUrlsError;
pub use location::{
    CURRENT_URL_ENV, DocumentLocation, EnvLocation, FixedLocation, LocationProvider, NoLocation,
    resolve_current,
};
