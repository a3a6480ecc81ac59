//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod http;
pub mod memory;
