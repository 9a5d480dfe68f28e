//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the simulation:
//! - Math types and small vector helpers
//! - Logging initialisation

pub mod math;
pub mod logging;
