//! relance-storage
//!
//! Durable row storage. Rows are JSON objects in an S3 bucket; this crate is
//! a thin wrapper around the AWS S3 SDK plus the typed [`rows::RowStore`]
//! seam the engine and sweeps are written against. [`memory`] provides an
//! in-process implementation for tests and local development.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod rows;
