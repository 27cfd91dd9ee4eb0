//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración de la cola de jobs con soporte para argumentos CLI y
//! variables de entorno. Cada opción se puede dar por cualquiera de los dos.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./job_queue --port 9000 --workers 4 --queue-capacity 100
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! PORT=9000 JOB_WORKERS=8 ENQUEUE_TIMEOUT_MS=2000 ./job_queue
//! ```

use crate::error::ConfigError;
use clap::Parser;
use std::time::Duration;

/// Configuración del servidor de jobs
#[derive(Debug, Clone, Parser)]
#[command(name = "job_queue")]
#[command(about = "Cola de jobs asíncrona: encolar datos y consultar el resultado procesado")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9000", env = "PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    // === Workers y cola ===

    /// Número de workers que consumen la cola
    #[arg(short, long, default_value = "4", env = "JOB_WORKERS")]
    pub workers: usize,

    /// Capacidad máxima de la cola de jobs pendientes
    #[arg(long = "queue-capacity", default_value = "100", env = "JOB_QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Espera máxima (ms) para encolar cuando la cola está llena.
    /// 0 = esperar indefinidamente
    #[arg(long = "enqueue-timeout", default_value = "0", env = "ENQUEUE_TIMEOUT_MS")]
    pub enqueue_timeout_ms: u64,

    // === Logging ===

    /// Emitir logs en formato JSON
    #[arg(long = "log-json", env = "LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// Crea una configuración parseando argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use job_queue::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:9000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tiempo de espera al encolar, `None` si se espera sin límite
    pub fn enqueue_timeout(&self) -> Option<Duration> {
        match self.enqueue_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            enqueue_timeout_ms = self.enqueue_timeout_ms,
            "job queue configuration"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 9000,
            host: "0.0.0.0".to_string(),
            workers: 4,
            queue_capacity: 100,
            enqueue_timeout_ms: 0,
            log_json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.workers, 4);
        assert_eq!(config.queue_capacity, 100);
        assert!(config.enqueue_timeout().is_none());
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_parse_cli_args() {
        let config = Config::try_parse_from([
            "job_queue",
            "--port",
            "8081",
            "--workers",
            "2",
            "--queue-capacity",
            "10",
            "--enqueue-timeout",
            "250",
        ])
        .unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.workers, 2);
        assert_eq!(config.queue_capacity, 10);
        assert_eq!(config.enqueue_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(Config::try_parse_from(["job_queue", "--port", "not-a-port"]).is_err());
    }

    #[test]
    fn test_validate_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_workers() {
        let mut config = Config::default();
        config.workers = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = Config::default();
        config.queue_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }
}
