//! Shared helpers for integration tests.

pub mod vm_server;
