//! Provider specific [`ClientWrapper`](crate::client_wrapper::ClientWrapper) implementations.
//!
//! Each submodule offers a concrete client that speaks a particular vendor's API while
//! conforming to the uniform chorusllm contract. [`scripted`] holds the deterministic,
//! network-free client used by tests and offline demos.

pub mod common;

pub mod claude;
pub mod grok;
pub mod openai;
pub mod scripted;
