//! Bazaar Cache Core Logic
//!
//! This crate provides the offline caching core: request classification
//! into caching strategies, the versioned-bucket lifecycle (install,
//! activate, intercept), and the network seam the backends plug into.

pub mod error;
pub mod fetch;
pub mod strategy;
pub mod worker;

pub use error::CoreError;
pub use fetch::{FetchError, FetchedResponse, Network, Request};
pub use strategy::{RequestClassifier, Strategy, StrategyRules};
pub use worker::{OfflineWorker, Served, WorkerConfig, WorkerState};
