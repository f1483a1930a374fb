//! Contrato del facade de servicio que consume el host de serving.
//! El host entrega lotes JSON y espera un lote de salida con la misma
//! convención (ver `batch`).
use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ServiceError;

#[async_trait]
pub trait ToxicityService: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// `batched_input[0]` es la lista de requests `{"input": "<smiles>"}`;
    /// la salida es un lote de un solo elemento con la lista de resultados.
    async fn predict(&self, batched_input: Vec<Value>) -> Result<Vec<Value>, ServiceError>;
}
