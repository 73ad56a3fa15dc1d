//! # Módulo de Métricas
//! src/metrics/mod.rs
//!
//! Observabilidad del servidor: contadores de requests y workers activos,
//! expuestos en JSON por el endpoint `/metrics`.

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
