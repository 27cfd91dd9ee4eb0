//! # Errores del Sistema de Jobs
//! src/error.rs
//!
//! Errores tipados que cruzan los límites entre cola, servicio y handlers.
//! Los handlers los traducen a códigos HTTP; nada se propaga más allá.

use thiserror::Error;

/// Errores del sistema de jobs
#[derive(Error, Debug)]
pub enum JobError {
    /// La cola siguió llena durante todo el tiempo de espera configurado
    #[error("queue is full (capacity: {capacity})")]
    QueueFull { capacity: usize },

    /// La cola fue cerrada; ya no acepta jobs
    #[error("queue is closed")]
    Closed,

    /// El body no se pudo decodificar como payload de job
    #[error("bad payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// El parámetro `id` no es un entero válido
    #[error("bad id: {0:?}")]
    InvalidId(String),

    /// Falta el parámetro `id`
    #[error("missing required parameter: id")]
    MissingId,
}

impl JobError {
    /// Indica si el error es culpa del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            JobError::InvalidPayload(_) | JobError::InvalidId(_) | JobError::MissingId
        )
    }
}

/// Errores de configuración detectados al arrancar
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("workers must be >= 1")]
    NoWorkers,

    #[error("queue capacity must be >= 1")]
    ZeroCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(JobError::MissingId.is_client_error());
        assert!(JobError::InvalidId("abc".to_string()).is_client_error());
        assert!(!JobError::Closed.is_client_error());
        assert!(!JobError::QueueFull { capacity: 1 }.is_client_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            JobError::QueueFull { capacity: 100 }.to_string(),
            "queue is full (capacity: 100)"
        );
        assert_eq!(JobError::InvalidId("x".to_string()).to_string(), "bad id: \"x\"");
        assert_eq!(ConfigError::NoWorkers.to_string(), "workers must be >= 1");
    }
}
