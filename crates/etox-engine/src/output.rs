//! Parser del CSV producido por el predictor externo.
//!
//! Formato esperado: fila header con al menos 4 columnas; de cada fila de
//! datos se leen las columnas 2 y 3 (base 0) como `f64`, nombradas según el
//! header. El orden de salida es el orden de filas del archivo.
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use etox_domain::PredictionRecord;

use crate::EngineError;

const FIRST_VALUE_COLUMN: usize = 2;
const SECOND_VALUE_COLUMN: usize = 3;

pub fn parse_predictions(path: &Path) -> Result<Vec<PredictionRecord>, EngineError> {
    let file = File::open(path)?;
    parse_reader(file)
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<PredictionRecord>, EngineError> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    if headers.len() <= SECOND_VALUE_COLUMN {
        return Err(EngineError::MalformedOutput(format!("header con {} columnas, se esperaban al menos {}",
                                                        headers.len(),
                                                        SECOND_VALUE_COLUMN + 1)));
    }
    let first = &headers[FIRST_VALUE_COLUMN];
    let second = &headers[SECOND_VALUE_COLUMN];

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let line = i + 1;
        let record = PredictionRecord::new().with(first, cell(&row, line, FIRST_VALUE_COLUMN, first)?)
                                            .with(second, cell(&row, line, SECOND_VALUE_COLUMN, second)?);
        records.push(record);
    }
    Ok(records)
}

fn cell(row: &StringRecord, line: usize, index: usize, column: &str) -> Result<f64, EngineError> {
    let raw = row.get(index).unwrap_or_default();
    raw.trim().parse::<f64>().map_err(|_| EngineError::InvalidValue { row: line,
                                                                      column: column.to_string(),
                                                                      value: raw.to_string() })
}
