//! Durable key/value storage abstraction for Chatline.
//!
//! Defines the device-storage trait used by the identity store, plus an
//! in-memory implementation. The file-backed implementation lives in
//! chatline-infra.

pub mod kv_store;
pub mod memory;
