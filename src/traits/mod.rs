//! Trait abstractions for the external content API.

pub mod api;

pub use api::ContentApi;
