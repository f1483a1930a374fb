//! Token de cancelación cooperativa.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Se consulta en cada tick de espera del proceso externo; al cancelarse el
/// proceso se mata y la corrida devuelve `EngineError::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self { Self::default() }
    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::Relaxed) }
    pub fn cancel(&self) { self.cancelled.store(true, Ordering::Relaxed); }
}
