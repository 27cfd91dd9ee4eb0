//! # Gestor Central de Jobs
//! src/jobs/manager.rs
//!
//! Dueño único de los tres recursos compartidos: el contador de IDs, la
//! cola y el store de resultados (más el pool de workers que los conecta).
//! Se construye una vez y los handlers lo reciben por `Arc`.

use crate::error::JobError;
use crate::jobs::processor::{PrefixProcessor, Processor};
use crate::jobs::queue::JobQueue;
use crate::jobs::store::JobStore;
use crate::jobs::types::{Job, JobId, JobResult};
use crate::jobs::worker::{WorkerPool, WorkerStats};
use serde::Serialize;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Configuración del Job Manager
#[derive(Debug, Clone)]
pub struct JobManagerConfig {
    /// Número de workers
    pub workers: usize,

    /// Capacidad máxima de la cola
    pub queue_capacity: usize,

    /// Espera máxima para encolar con la cola llena (`None` = sin límite)
    pub enqueue_timeout: Option<Duration>,
}

impl Default for JobManagerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 100,
            enqueue_timeout: None,
        }
    }
}

impl JobManagerConfig {
    /// Crea una configuración desde el Config principal
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            workers: config.workers,
            queue_capacity: config.queue_capacity,
            enqueue_timeout: config.enqueue_timeout(),
        }
    }
}

/// Foto del estado del sistema de jobs
#[derive(Debug, Clone, Serialize)]
pub struct ManagerStats {
    pub queue_len: usize,
    pub queue_capacity: usize,
    pub workers: usize,
    pub issued: JobId,
    pub stored: usize,
    /// `true` después de `shutdown`
    pub closed: bool,
    pub processed: u64,
    pub lost: u64,
}

/// Gestor central de jobs
pub struct JobManager {
    config: JobManagerConfig,

    /// Último ID asignado (0 = ninguno todavía)
    last_id: Mutex<JobId>,

    queue: JobQueue,
    store: JobStore,

    /// `None` después de `shutdown`
    pool: Mutex<Option<WorkerPool>>,
    worker_stats: Arc<WorkerStats>,
    workers: usize,
}

impl JobManager {
    /// Crea un Job Manager con el procesador por defecto e inicia los workers
    pub fn new(config: JobManagerConfig) -> io::Result<Self> {
        Self::with_processor(config, Arc::new(PrefixProcessor::default()))
    }

    /// Crea un Job Manager con una función de procesamiento propia
    pub fn with_processor(
        config: JobManagerConfig,
        processor: Arc<dyn Processor>,
    ) -> io::Result<Self> {
        let queue = JobQueue::new(config.queue_capacity);
        let store = JobStore::new();
        let pool = WorkerPool::spawn(config.workers, queue.clone(), store.clone(), processor)?;

        tracing::info!(
            workers = pool.size(),
            queue_capacity = queue.capacity(),
            "job workers started"
        );

        Ok(Self {
            workers: pool.size(),
            worker_stats: pool.stats(),
            pool: Mutex::new(Some(pool)),
            config,
            last_id: Mutex::new(0),
            queue,
            store,
        })
    }

    /// Encola un nuevo job y retorna el job creado
    ///
    /// El ID se asigna antes de encolar y no se devuelve aunque el encolado
    /// falle. Con la cola llena bloquea hasta que haya espacio, o hasta el
    /// timeout configurado.
    pub fn submit_job(&self, data: String) -> Result<Job, JobError> {
        // Incremento y construcción en un solo paso atómico
        let job = {
            let mut last_id = self.last_id.lock().unwrap_or_else(PoisonError::into_inner);
            *last_id += 1;
            Job::new(*last_id, data)
        };

        let enqueued = match self.config.enqueue_timeout {
            Some(timeout) => self.queue.enqueue_timeout(job.clone(), timeout),
            None => self.queue.enqueue(job.clone()),
        };

        if let Err(e) = enqueued {
            tracing::warn!(job_id = job.id, error = %e, "failed to enqueue job");
            return Err(e);
        }

        tracing::debug!(job_id = job.id, queue_len = self.queue.len(), "job enqueued");
        Ok(job)
    }

    /// Obtiene el resultado de un job, `None` si todavía no está listo
    ///
    /// Un ID nunca emitido también retorna `None`.
    pub fn get_result(&self, id: JobId) -> Option<JobResult> {
        self.store.get(id)
    }

    /// Último ID asignado
    pub fn last_id(&self) -> JobId {
        *self.last_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Obtiene estadísticas de cola, workers y store
    pub fn stats(&self) -> ManagerStats {
        ManagerStats {
            queue_len: self.queue.len(),
            queue_capacity: self.queue.capacity(),
            workers: self.workers,
            issued: self.last_id(),
            stored: self.store.len(),
            closed: self.queue.is_closed(),
            processed: self.worker_stats.processed(),
            lost: self.worker_stats.lost(),
        }
    }

    /// Cierra la cola y espera a que los workers terminen lo pendiente
    ///
    /// Después de esto `submit_job` falla con `JobError::Closed`. Llamarlo
    /// más de una vez no tiene efecto.
    pub fn shutdown(&self) {
        self.queue.close();

        let pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(pool) = pool {
            pool.join();
            tracing::info!("job workers stopped");
        }
    }
}
