use serde::Serialize;
use std::fmt;

/// Column type as reported by the executed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    Decimal,
    Boolean,
    Text,
    Temporal,
    Other(String),
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float | ColumnType::Decimal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// Rows returned by one query, in the order the database produced them.
///
/// Rows are stored positionally against `columns`. Nothing checks that each
/// row has as many values as there are columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Builds a result set from named rows, inferring column types from the
    /// values: a column is numeric when it has at least one non-null value and
    /// every non-null value is a number.
    pub fn from_records(names: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, name)| Column {
                name: name.to_string(),
                column_type: infer_type(rows.iter().filter_map(|row| row.get(i))),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Value of column `name` in row `row`.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    /// Renders the whole result set as a markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push('|');
        for column in &self.columns {
            out.push_str(&format!(" {} |", escape_cell(&column.name)));
        }
        out.push_str("\n|");
        for _ in &self.columns {
            out.push_str("---|");
        }
        out.push('\n');

        for row in &self.rows {
            out.push('|');
            for value in row {
                out.push_str(&format!(" {} |", escape_cell(&value.to_string())));
            }
            out.push('\n');
        }

        out
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn infer_type<'a>(values: impl Iterator<Item = &'a Value>) -> ColumnType {
    let mut inferred: Option<ColumnType> = None;

    for value in values {
        let this = match value {
            Value::Null => continue,
            Value::Boolean(_) => ColumnType::Boolean,
            Value::Integer(_) => ColumnType::Integer,
            Value::Float(_) => ColumnType::Float,
            Value::Text(_) => ColumnType::Text,
        };

        inferred = Some(match (inferred, this) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(a), b) if a.is_numeric() && b.is_numeric() => ColumnType::Float,
            _ => ColumnType::Text,
        });
    }

    inferred.unwrap_or(ColumnType::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_infers_numeric_columns() {
        let results = ResultSet::from_records(
            &["region", "sales", "ratio", "note"],
            vec![
                vec!["East".into(), 100.into(), Value::Null, "a".into()],
                vec!["West".into(), 150.into(), 0.5.into(), 3.into()],
            ],
        );

        let types: Vec<_> = results.columns.iter().map(|c| c.column_type.clone()).collect();
        assert_eq!(
            types,
            vec![ColumnType::Text, ColumnType::Integer, ColumnType::Float, ColumnType::Text]
        );
        assert_eq!(results.get(1, "sales"), Some(&Value::Integer(150)));
        assert_eq!(results.get(0, "missing"), None);
    }

    #[test]
    fn all_null_column_is_not_numeric() {
        let results = ResultSet::from_records(&["x"], vec![vec![Value::Null]]);
        assert!(!results.columns[0].column_type.is_numeric());
    }

    #[test]
    fn markdown_table_lists_every_row() {
        let results = ResultSet::from_records(
            &["artist", "tracks"],
            vec![
                vec!["Iron Maiden".into(), 213.into()],
                vec!["AC|DC".into(), Value::Null],
            ],
        );

        assert_eq!(
            results.to_markdown(),
            "| artist | tracks |\n|---|---|\n| Iron Maiden | 213 |\n| AC\\|DC | NULL |\n"
        );
    }

    #[test]
    fn serializes_columns_and_positional_rows() {
        let results = ResultSet::from_records(&["region", "sales"], vec![vec!["East".into(), 100.into()]]);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "columns": [
                    {"name": "region", "type": "text"},
                    {"name": "sales", "type": "integer"}
                ],
                "rows": [["East", 100]]
            })
        );
    }
}
