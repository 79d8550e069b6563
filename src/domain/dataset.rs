// In-memory tabular dataset domain model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("CSV contains no data rows")]
    Empty,
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
    #[error("columns have unequal lengths")]
    UnequalColumns,
    #[error("failed to parse CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("uploaded file is not valid UTF-8")]
    Encoding,
}

/// A single cell. Numeric cells keep their parsed representation so the
/// classifier never has to re-probe raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Display form used for category labels, date probing and row digests.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Null => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::json!(i),
            Value::Float(f) => serde_json::json!(f),
            Value::Text(s) => serde_json::json!(s),
            Value::Null => serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: String, values: Vec<Value>) -> Self {
        Self { name, values }
    }

    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// All non-null values interpreted as f64, in row order.
    /// Text values are excluded, not coerced.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// True when the column holds at least one value and every non-null
    /// value is numeric. This is the "declared element type" check.
    pub fn is_numeric(&self) -> bool {
        let mut any = false;
        for v in self.non_null() {
            if v.as_f64().is_none() {
                return false;
            }
            any = true;
        }
        any
    }
}

/// Ordered named columns of equal length, built once per request from the
/// uploaded bytes and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
        if row_count == 0 {
            return Err(DatasetError::Empty);
        }
        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if col.values.len() != row_count {
                return Err(DatasetError::UnequalColumns);
            }
            if !seen.insert(col.name.clone()) {
                return Err(DatasetError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn total_null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    /// Number of rows that are exact duplicates of an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = 0;
        for row in 0..self.row_count {
            let key: Vec<String> = self
                .columns
                .iter()
                .map(|c| match &c.values[row] {
                    Value::Int(i) => format!("i{i}"),
                    Value::Float(f) => format!("f{}", f.to_bits()),
                    Value::Text(s) => format!("t{s}"),
                    Value::Null => "n".to_string(),
                })
                .collect();
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        duplicates
    }
}

/// Role assigned to a column by the classifier. Downstream services branch
/// on this closed enum instead of re-inspecting raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Numeric,
    Categorical,
    Datetime,
}

/// Disjoint role lists covering every column exactly once, each in the
/// dataset's original column order.
#[derive(Debug, Clone, Default)]
pub struct ColumnPartition {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
}

impl ColumnPartition {
    pub fn first_numeric(&self) -> Option<&str> {
        self.numeric.first().map(String::as_str)
    }

    pub fn first_categorical(&self) -> Option<&str> {
        self.categorical.first().map(String::as_str)
    }

    pub fn first_datetime(&self) -> Option<&str> {
        self.datetime.first().map(String::as_str)
    }
}
