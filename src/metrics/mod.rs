//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas HTTP del servidor:
//! - Contadores de requests por status y por ruta
//! - Latencias (promedio, p50, p95)
//! - Conexiones activas

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
