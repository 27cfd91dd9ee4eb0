//! # Pool de Workers
//! src/jobs/worker.rs
//!
//! Número fijo de threads que consumen la cola, procesan cada job y
//! guardan el resultado en el store. No hay reintentos: si la función de
//! procesamiento hace panic, el job se pierde y el worker sigue vivo.

use crate::jobs::processor::Processor;
use crate::jobs::queue::JobQueue;
use crate::jobs::store::JobStore;
use crate::jobs::types::{Job, JobResult};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Contadores compartidos por todos los workers
#[derive(Debug, Default)]
pub struct WorkerStats {
    processed: AtomicU64,
    lost: AtomicU64,
}

impl WorkerStats {
    /// Jobs procesados con resultado guardado
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Jobs perdidos por un panic durante el procesamiento
    pub fn lost(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }
}

/// Pool fijo de workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl WorkerPool {
    /// Inicia `count` workers sobre la cola y el store dados
    pub fn spawn(
        count: usize,
        queue: JobQueue,
        store: JobStore,
        processor: Arc<dyn Processor>,
    ) -> io::Result<Self> {
        let stats = Arc::new(WorkerStats::default());
        let mut handles = Vec::with_capacity(count);

        for i in 0..count {
            let name = format!("worker-{}", i);
            let queue = queue.clone();
            let store = store.clone();
            let processor = Arc::clone(&processor);
            let stats = Arc::clone(&stats);

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker_loop(name, queue, store, processor, stats))?;
            handles.push(handle);
        }

        Ok(Self { handles, stats })
    }

    /// Número de workers del pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Contadores del pool, compartidos con los workers
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Espera a que terminen todos los workers
    ///
    /// Sólo retorna después de que la cola fue cerrada y vaciada.
    pub fn join(self) {
        for handle in self.handles {
            if handle.join().is_err() {
                tracing::error!("worker thread terminated abnormally");
            }
        }
    }
}

/// Loop principal del worker
fn worker_loop(
    name: String,
    queue: JobQueue,
    store: JobStore,
    processor: Arc<dyn Processor>,
    stats: Arc<WorkerStats>,
) {
    tracing::debug!(worker = %name, "worker started");

    while let Some(job) = queue.dequeue() {
        tracing::debug!(worker = %name, job_id = job.id, "picked up job");

        match process_job(&job, processor.as_ref()) {
            Some(result) => {
                store.put(result);
                stats.processed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(worker = %name, job_id = job.id, "completed job");
            }
            None => {
                stats.lost.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    tracing::debug!(worker = %name, "queue closed, worker stopping");
}

/// Ejecuta el procesador aislando un posible panic
fn process_job(job: &Job, processor: &dyn Processor) -> Option<JobResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| processor.process(&job.data))) {
        Ok(processed) => Some(JobResult {
            id: job.id,
            processed,
        }),
        Err(panic_info) => {
            let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };

            tracing::error!(job_id = job.id, panic_msg = %message, "processing panicked, job lost");
            None
        }
    }
}
