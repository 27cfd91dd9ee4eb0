//! # Función de Procesamiento
//! src/jobs/processor.rs
//!
//! La transformación que aplican los workers a los datos de cada job.
//! Es intercambiable: cualquier closure `Fn(&str) -> String` sirve.

/// Transforma los datos de un job en su resultado
///
/// Debe ser determinista: los mismos datos producen el mismo resultado.
pub trait Processor: Send + Sync {
    fn process(&self, data: &str) -> String;
}

impl<F> Processor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn process(&self, data: &str) -> String {
        self(data)
    }
}

/// Procesador por defecto: antepone un prefijo fijo a los datos
#[derive(Debug, Clone)]
pub struct PrefixProcessor {
    prefix: String,
}

impl PrefixProcessor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for PrefixProcessor {
    fn default() -> Self {
        Self::new("processed: ")
    }
}

impl Processor for PrefixProcessor {
    fn process(&self, data: &str) -> String {
        format!("{}{}", self.prefix, data)
    }
}
