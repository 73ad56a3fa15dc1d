//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Workers actualmente ejecutando una tarea
    active_workers: u64,
}

/// Snapshot de métricas (para el endpoint /metrics)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub active_workers: u64,
    pub uptime_secs: u64,
    pub status_codes: HashMap<u16, u64>,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                active_workers: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra un request atendido con su código de estado
    pub fn record_request(&self, status_code: u16) {
        let mut data = self.inner.lock().unwrap();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
    }

    /// Incrementa el contador de workers activos
    pub fn increment_active_workers(&self) {
        let mut data = self.inner.lock().unwrap();
        data.active_workers += 1;
    }

    /// Decrementa el contador de workers activos
    pub fn decrement_active_workers(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.active_workers > 0 {
            data.active_workers -= 1;
        }
    }

    /// Obtiene el número de workers activos
    pub fn active_workers(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.active_workers
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();

        MetricsSnapshot {
            total_requests: data.total_requests,
            active_workers: data.active_workers,
            uptime_secs: self.start_time.elapsed().as_secs(),
            status_codes: data.status_codes.clone(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector() {
        let collector = MetricsCollector::new();

        collector.record_request(200);
        collector.record_request(200);
        collector.record_request(404);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.status_codes.get(&200), Some(&2));
        assert_eq!(snapshot.status_codes.get(&404), Some(&1));
    }

    #[test]
    fn test_active_workers_tracking() {
        let collector = MetricsCollector::new();

        assert_eq!(collector.active_workers(), 0);

        collector.increment_active_workers();
        assert_eq!(collector.active_workers(), 1);

        collector.increment_active_workers();
        assert_eq!(collector.active_workers(), 2);

        collector.decrement_active_workers();
        assert_eq!(collector.active_workers(), 1);

        collector.decrement_active_workers();
        assert_eq!(collector.active_workers(), 0);
    }

    #[test]
    fn test_active_workers_no_negative() {
        let collector = MetricsCollector::new();

        collector.decrement_active_workers();
        collector.decrement_active_workers();

        assert_eq!(collector.active_workers(), 0);
    }

    #[test]
    fn test_uptime_increases() {
        let collector = MetricsCollector::new();

        let snapshot1 = collector.snapshot();
        std::thread::sleep(std::time::Duration::from_millis(100));
        let snapshot2 = collector.snapshot();

        assert!(snapshot2.uptime_secs >= snapshot1.uptime_secs);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let collector = MetricsCollector::new();
        collector.record_request(200);

        let json = serde_json::to_string(&collector.snapshot()).unwrap();
        assert!(json.contains("\"total_requests\":1"));
        assert!(json.contains("\"200\":1"));
    }
}
