//! Convención de lotes del host de serving: la entrada llega envuelta en un
//! lote cuyo primer elemento es la lista de requests, y la salida se devuelve
//! como lote de un elemento.
use etox_domain::{PredictionRecord, PredictionRequest};
use serde_json::Value;

use crate::errors::ServiceError;

/// Campo de cada request que lleva el SMILES.
pub const INPUT_FIELD: &str = "input";

pub fn extract_request(batched_input: &[Value]) -> Result<PredictionRequest, ServiceError> {
    let first = batched_input.first()
                             .ok_or_else(|| ServiceError::InvalidRequest("lote vacío".into()))?;
    let items = first.as_array()
                     .ok_or_else(|| ServiceError::InvalidRequest("el primer elemento del lote debe ser una lista".into()))?;
    let raw = items.iter()
                   .enumerate()
                   .map(|(i, item)| {
                       item.get(INPUT_FIELD).and_then(Value::as_str).ok_or_else(|| {
                           ServiceError::InvalidRequest(format!("request {i} sin campo '{INPUT_FIELD}' de tipo string"))
                       })
                   })
                   .collect::<Result<Vec<&str>, _>>()?;
    Ok(PredictionRequest::from_strings(raw)?)
}

pub fn wrap_output(records: &[PredictionRecord]) -> Result<Vec<Value>, ServiceError> {
    let items = records.iter().map(PredictionRecord::to_json).collect::<Result<Vec<_>, _>>()?;
    Ok(vec![Value::Array(items)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_inputs_in_order() {
        let batch = vec![json!([{"input": "CCO"}, {"input": "c1ccccc1", "extra": 1}])];
        let req = extract_request(&batch).unwrap();
        let smiles: Vec<String> = req.smiles().iter().map(|s| s.to_string()).collect();
        assert_eq!(smiles, vec!["CCO", "c1ccccc1"]);
    }

    #[test]
    fn one_bad_item_fails_whole_batch() {
        let batch = vec![json!([{"input": "CCO"}, {"smiles": "CC"}])];
        let err = extract_request(&batch).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(ref m) if m.contains("request 1")));
        let batch = vec![json!([{"input": 42}])];
        assert!(extract_request(&batch).is_err());
        let batch = vec![json!([{"input": "C\tC"}])];
        assert!(matches!(extract_request(&batch).unwrap_err(), ServiceError::Domain(_)));
    }

    #[test]
    fn malformed_batches() {
        assert!(extract_request(&[]).is_err());
        assert!(extract_request(&[json!({"input": "CCO"})]).is_err());
        assert!(extract_request(&[json!([])]).unwrap().is_empty());
    }

    #[test]
    fn output_is_single_element_batch() {
        let out = wrap_output(&[PredictionRecord::new().with("tox", 0.1).with("other", 0.9)]).unwrap();
        assert_eq!(out, vec![json!([{"tox": 0.1, "other": 0.9}])]);
        assert_eq!(wrap_output(&[]).unwrap(), vec![json!([])]);
    }
}
