//! System model types.
//!
//! These types are the output of the compiler front-end: every identifier has
//! been resolved, every relationship has been type checked and every entity
//! knows the container it lives in.
//!
//! - [`element`] - [`Actor`], [`Channel`], [`DataFlow`], [`Annotation`], [`Container`]
//! - [`scenario`] - [`Scenario`] and its [`Step`]s
//! - [`system`] - [`SystemModel`], the root of the model

pub mod element;
pub mod scenario;
pub mod system;

pub use element::*;
pub use scenario::*;
pub use system::*;
