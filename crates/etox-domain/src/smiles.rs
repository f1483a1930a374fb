use serde::{Deserialize, Serialize};
use std::fmt;

use crate::DomainError;

/// Cadena SMILES opaca. No se interpreta químicamente: el predictor externo
/// es quien la parsea.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Smiles(String);

impl Smiles {
    /// Acepta cualquier texto salvo separadores que romperían el archivo
    /// tabulado de entrada (TAB, CR, LF).
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        if let Some(c) = raw.chars().find(|c| matches!(c, '\t' | '\r' | '\n')) {
            return Err(DomainError::ValidationError(format!("SMILES contiene separador no permitido {:?}: {:?}", c, raw)));
        }
        Ok(Smiles(raw.to_string()))
    }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for Smiles {
    type Error = DomainError;
    fn try_from(value: String) -> Result<Self, Self::Error> { Smiles::new(&value) }
}

impl From<Smiles> for String {
    fn from(value: Smiles) -> Self { value.0 }
}

impl fmt::Display for Smiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_opaque_text() {
        let s = Smiles::new("not really a molecule [Xx]").unwrap();
        assert_eq!(s.as_str(), "not really a molecule [Xx]");
        assert!(Smiles::new("").is_ok());
    }

    #[test]
    fn rejects_tab_and_newlines() {
        assert!(Smiles::new("CC\tO").is_err());
        assert!(Smiles::new("CCO\n").is_err());
        assert!(Smiles::new("CCO\r").is_err());
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: Smiles = serde_json::from_str("\"c1ccccc1\"").unwrap();
        assert_eq!(ok.to_string(), "c1ccccc1");
        assert!(serde_json::from_str::<Smiles>("\"C\\tC\"").is_err());
    }
}
