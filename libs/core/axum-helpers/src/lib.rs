//! # Axum Helpers
//!
//! Shared utilities for building Axum web applications.
//!
//! ## Modules
//!
//! - **[`errors`]**: wire-format error bodies and fallback handlers
//! - **[`extractors`]**: strict JSON body extractor
//! - **[`server`]**: router assembly, server startup, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;
pub mod shutdown;

pub use errors::{ErrorBody, FieldViolation, ViolationsBody};
pub use extractors::JsonBody;
pub use server::{create_app, create_production_app, create_router};
pub use shutdown::{shutdown_signal, ShutdownCoordinator};
