//! # Job Queue
//! src/lib.rs
//!
//! Cola de trabajos en memoria expuesta por HTTP/1.0: los clientes encolan
//! payloads con `POST /enqueue` y consultan el resultado con
//! `GET /result?id=N` mientras un pool fijo de workers los procesa.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing y construcción de mensajes HTTP/1.0
//! - `server`: Listener TCP, un thread por conexión
//! - `router`: Enrutamiento `(método, path)` a handlers
//! - `jobs`: Cola acotada, workers, store de resultados y handlers
//! - `metrics`: Contadores y latencias de requests
//! - `config`: Flags de CLI y variables de entorno
//! - `telemetry`: Inicialización de logging
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use job_queue::config::Config;
//! use job_queue::jobs::{JobManager, JobManagerConfig};
//! use job_queue::server::Server;
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let manager = Arc::new(JobManager::new(JobManagerConfig::from_config(&config)).unwrap());
//! let server = Server::bind(&config, manager).unwrap();
//! server.run().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod jobs;
pub mod metrics;
pub mod router;
pub mod server;
pub mod telemetry;
