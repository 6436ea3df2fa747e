//! Core types and trait definitions for Astra, the child-facing mentor app.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Backends implement [`gateway::IdentityProvider`], [`gateway::ProfileStore`]
//! and [`model::ChatModel`]; the web layer only ever talks to them through a
//! [`gateway::Gateway`] and the pure policy in [`navigation`].

// We intentionally use native `async fn` in trait impls (stabilised in Rust
// 1.75). Suppress the advisory lint about `Send` bounds on returned futures.
#![allow(async_fn_in_trait)]

pub mod chat;
pub mod error;
pub mod gateway;
pub mod model;
pub mod navigation;
pub mod persona;
pub mod profile;
pub mod progress;
pub mod user;

pub use error::{Error, Result};
