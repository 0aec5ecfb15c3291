// src/chorusllm/mod.rs

pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod orchestrator;
pub mod prompt_builder;
pub mod role_selection;
pub mod roles;
pub mod run;

// Let's explicitly export Orchestrator so we don't have to access it via chorusllm::orchestrator::Orchestrator
// and instead as chorusllm::Orchestrator
pub use orchestrator::Orchestrator;
