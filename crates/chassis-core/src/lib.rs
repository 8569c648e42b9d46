//! Core infrastructure for the chassis runtime.
//!
//! This crate provides the foundational building blocks shared by the
//! application shell and all chassis modules: a publish/subscribe mediator,
//! the module lifecycle contract, the application registry, and the logging
//! subsystem.

pub mod logging;
pub mod mediator;
pub mod module;
pub mod registry;
