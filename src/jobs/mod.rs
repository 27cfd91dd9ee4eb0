//! # Sistema de Jobs
//!
//! Productor/consumidor en memoria: los requests encolan jobs, un pool fijo
//! de workers los procesa y deja el resultado en un store que se consulta
//! por ID.
//!
//! ## Endpoints
//!
//! - `POST /enqueue` - Encolar job (`{"Data": "..."}`)
//! - `GET /result?id=JOBID` - Obtener resultado (202 si no está listo)
//! - `GET /stats` - Estado de cola, workers y store

pub mod handlers;
pub mod manager;
pub mod processor;
pub mod queue;
pub mod store;
pub mod types;
pub mod worker;

pub use manager::{JobManager, JobManagerConfig};
pub use processor::{PrefixProcessor, Processor};
pub use types::{Job, JobId, JobResult};
