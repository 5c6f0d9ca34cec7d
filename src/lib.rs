//! Alertix: streaming indicator engine with threshold alerts.
//!
//! A single ingestion task turns a live kline feed into RSI/MACD snapshots,
//! and every connected subscriber runs its own alert evaluation loop against
//! the latest snapshot.

pub mod alerts;
pub mod config;
pub mod core;
pub mod db;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
