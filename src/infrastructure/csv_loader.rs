// CSV loader - Decodes uploaded bytes into a Dataset

use crate::domain::dataset::{Column, Dataset, DatasetError, Value};
use csv::ReaderBuilder;

fn parse_cell(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    Value::Text(raw.to_string())
}

/// Parse comma-separated bytes with a header row into a Dataset.
/// Malformed or empty input is an error, never a partial dataset.
pub fn load_csv(bytes: &[u8]) -> Result<Dataset, DatasetError> {
    let text = std::str::from_utf8(bytes).map_err(|_| DatasetError::Encoding)?;

    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(DatasetError::Empty);
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (i, cells) in columns.iter_mut().enumerate() {
            cells.push(record.get(i).map(parse_cell).unwrap_or(Value::Null));
        }
    }

    Dataset::from_columns(
        headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_typed_columns() {
        let csv = "id,amount,region\n1,10.5,north\n2,20,south\n3,,north\n";
        let dataset = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.column_names(), vec!["id", "amount", "region"]);

        let amount = dataset.column("amount").unwrap();
        assert_eq!(amount.values[0], Value::Float(10.5));
        assert_eq!(amount.values[1], Value::Int(20));
        assert_eq!(amount.values[2], Value::Null);
        assert_eq!(
            dataset.column("region").unwrap().values[0],
            Value::Text("north".to_string())
        );
    }

    #[test]
    fn test_header_only_csv_is_an_error() {
        let result = load_csv(b"id,amount,region\n");
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(load_csv(b"").is_err());
    }

    #[test]
    fn test_duplicate_headers_rejected() {
        let result = load_csv(b"a,a\n1,2\n");
        assert!(matches!(result, Err(DatasetError::DuplicateColumn(_))));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = load_csv(b"a,b\n1,2\n3\n");
        assert!(matches!(result, Err(DatasetError::Parse(_))));
    }

    #[test]
    fn test_non_utf8_rejected() {
        assert!(matches!(
            load_csv(&[0x61, 0xff, 0xfe]),
            Err(DatasetError::Encoding)
        ));
    }
}
