//! # Almacén de Resultados
//! src/jobs/store.rs
//!
//! Mapa en memoria `id -> resultado`, compartido entre workers y handlers.
//! No tiene límite de tamaño ni expiración: los resultados viven lo que
//! vive el proceso.

use crate::jobs::types::{JobId, JobResult};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Store thread-safe de resultados
///
/// Los clones comparten el mismo mapa.
#[derive(Clone, Default)]
pub struct JobStore {
    results: Arc<RwLock<HashMap<JobId, JobResult>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Guarda el resultado de un job
    ///
    /// Los IDs son únicos, así que en la práctica nunca se sobrescribe.
    pub fn put(&self, result: JobResult) {
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        results.insert(result.id, result);
    }

    /// Obtiene el resultado de un job, `None` si todavía no terminó
    pub fn get(&self, id: JobId) -> Option<JobResult> {
        let results = self.results.read().unwrap_or_else(PoisonError::into_inner);
        results.get(&id).cloned()
    }

    /// Número de resultados almacenados
    pub fn len(&self) -> usize {
        self.results.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn result(id: JobId) -> JobResult {
        JobResult {
            id,
            processed: format!("processed: {}", id),
        }
    }

    #[test]
    fn test_get_missing() {
        let store = JobStore::new();
        assert!(store.get(1).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_and_get() {
        let store = JobStore::new();
        store.put(result(5));

        assert_eq!(store.get(5), Some(result(5)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let store = JobStore::new();
        store.put(result(3));

        assert_eq!(store.get(3), store.get(3));
    }

    #[test]
    fn test_visible_across_clones_and_threads() {
        let store = JobStore::new();

        let writers: Vec<_> = (1..=8)
            .map(|id| {
                let store = store.clone();
                thread::spawn(move || store.put(result(id)))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        for id in 1..=8 {
            assert_eq!(store.get(id).unwrap().processed, format!("processed: {}", id));
        }
    }
}
