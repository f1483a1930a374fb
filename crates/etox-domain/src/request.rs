//! Lote ordenado de SMILES a predecir.
//!
//! La posición `i` de cada entrada define su identificador sintético `mol<i>`
//! durante una corrida; ese id sólo vive en el archivo de entrada del
//! predictor externo y no se propaga al resultado.
use serde::{Deserialize, Serialize};

use crate::{DomainError, Smiles};

/// Prefijo del identificador sintético asignado por posición.
pub const MOL_ID_PREFIX: &str = "mol";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    smiles: Vec<Smiles>,
}

impl PredictionRequest {
    pub fn new(smiles: Vec<Smiles>) -> Self { Self { smiles } }

    /// Construye el lote validando cada cadena.
    pub fn from_strings<I, S>(raw: I) -> Result<Self, DomainError>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let smiles = raw.into_iter()
                        .map(|s| Smiles::new(s.as_ref()))
                        .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { smiles })
    }

    pub fn len(&self) -> usize { self.smiles.len() }
    pub fn is_empty(&self) -> bool { self.smiles.is_empty() }
    pub fn smiles(&self) -> &[Smiles] { &self.smiles }

    /// Pares `(smiles, molN)` en orden de entrada.
    pub fn entries(&self) -> impl Iterator<Item = (&Smiles, String)> + '_ {
        self.smiles.iter().enumerate().map(|(i, s)| (s, mol_id(i)))
    }
}

/// Identificador sintético para la posición `index`.
pub fn mol_id(index: usize) -> String { format!("{MOL_ID_PREFIX}{index}") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_assign_positional_ids() {
        let req = PredictionRequest::from_strings(["CCO", "c1ccccc1"]).unwrap();
        let ids: Vec<(String, String)> = req.entries().map(|(s, id)| (s.to_string(), id)).collect();
        assert_eq!(ids,
                   vec![("CCO".to_string(), "mol0".to_string()), ("c1ccccc1".to_string(), "mol1".to_string())]);
    }

    #[test]
    fn from_strings_fails_on_first_invalid() {
        let err = PredictionRequest::from_strings(["CCO", "C\nC"]).unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[test]
    fn empty_request() {
        let req = PredictionRequest::from_strings(Vec::<String>::new()).unwrap();
        assert!(req.is_empty());
        assert_eq!(req.entries().count(), 0);
    }
}
