//! Common utilities and types shared across the ecommerce bridge crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT pre-parse utilities (size limit, unverified claim reads)
pub mod jwt;
