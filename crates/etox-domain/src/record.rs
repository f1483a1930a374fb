use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DomainError;

/// Resultado de predicción para una fila de salida: nombre de columna (tal
/// como viene en el header del CSV) → valor. Conserva el orden de columnas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionRecord {
    fields: IndexMap<String, f64>,
}

impl PredictionRecord {
    pub fn new() -> Self { Self::default() }

    /// Constructor encadenable.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) { self.fields.insert(name.to_string(), value); }
    pub fn get(&self, name: &str) -> Option<f64> { self.fields.get(name).copied() }
    pub fn len(&self) -> usize { self.fields.len() }
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
    pub fn field_names(&self) -> impl Iterator<Item = &str> { self.fields.keys().map(String::as_str) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> { self.fields.iter().map(|(k, v)| (k.as_str(), *v)) }

    /// Objeto JSON `{"<campo>": valor, ...}`.
    pub fn to_json(&self) -> Result<Value, DomainError> { Ok(serde_json::to_value(self)?) }
}
