//! # BLEST Core
//!
//! Core types for the BLEST batch dispatch engine.
//!
//! This crate provides the foundational types shared by the registry and the
//! dispatch engine:
//!
//! - [`Object`] - Order-preserving JSON object, the shape of params, results,
//!   and context entries
//! - [`Context`] - Per-request mutable context derived fresh for every batch
//!   item
//! - [`BlestError`] / [`ErrorObject`] - The error taxonomy and the uniform
//!   wire-level error envelope
//! - [`RequestEnvelope`] / [`ResponseEnvelope`] - One correlated unit of a
//!   batch request or response
//! - [`Selector`] - Client-specified recursive projection of result fields

#![doc(html_root_url = "https://docs.rs/blest-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod envelope;
mod error;
mod selector;
mod value;

pub use context::Context;
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use error::{BlestError, BlestResult, ErrorObject};
pub use selector::{Selector, SelectorEntry};
pub use value::Object;
