//! Core types and trait definitions for the CollegeSpace resource portal.
//!
//! No HTTP or database code lives here. The crate holds the resource model,
//! the filter predicate engine, the filter state controller and the
//! query-string synchroniser, plus the traits storage backends implement.

// Native `async fn` in traits; the `Send` bound advisory does not apply to the
// explicit `impl Future + Send` signatures used below.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod controller;
pub mod error;
pub mod filter;
pub mod query;
pub mod resource;
pub mod storage;

#[cfg(test)]
pub(crate) mod sample;

pub use error::{Error, Result};
