//! Core types for the Scenaria architecture language.
//!
//! This crate holds the intermediate representation produced by the Scenaria
//! compiler front-end together with the small amount of logic that operates
//! on it directly:
//!
//! - [`identifier`] - interned identifiers
//! - [`model`] - the [`SystemModel`](model::SystemModel) and its entities
//! - [`ids`] - deterministic channel and data-flow identifiers
//! - [`annotations`] - merging annotation properties into actors

pub mod annotations;
pub mod identifier;
pub mod ids;
pub mod model;
