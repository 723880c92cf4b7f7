#![doc = "journey-publish-core: core logic library for journey-publish."]

//! This crate contains all data models, contracts and pipeline logic for publishing a
//! versioned journey asset bundle to an object-storage bucket. Transport construction
//! (the concrete S3 client) and CLI glue live in the binary crate.
//!
//! # Usage
//! Add this as a dependency for the publish pipeline, the storage contract, and the
//! URL-manifest builder. Bring your own [`contract::ObjectStore`] implementation.

pub mod config;
pub mod contract;
pub mod guard;
pub mod latest;
pub mod publish;
pub mod upload;
pub mod urls;
