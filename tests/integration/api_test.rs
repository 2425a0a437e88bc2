//! Relay endpoint integration tests
//!
//! Drives the full router against a stubbed completion provider.

#![allow(dead_code)]

mod common;
mod invariants;
mod messages;
