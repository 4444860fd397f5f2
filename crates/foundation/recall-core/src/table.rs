//! Tabular projection of the NHTSA `results` array.
//!
//! Recall records are loosely shaped: keys come and go between entries, some
//! values are booleans, a few are nested. The table flattens every record into
//! one row over the union of all columns (first-seen order), filling gaps with
//! [`Cell::Missing`]. Booleans become text here so later string steps never see
//! a raw boolean.

use crate::series::YearlyCountSeries;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

/// Text shown for an absent value
pub const PLACEHOLDER: &str = "N/A";

static MISSING: Cell = Cell::Missing;

/// One value in the recall table
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Missing,
}

impl Cell {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Text(b.to_string()),
            Value::Number(n) => n
                .as_f64()
                .map(Cell::Number)
                .unwrap_or_else(|| Cell::Text(n.to_string())),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }

    /// Display text, with [`PLACEHOLDER`] for missing values
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s),
            Cell::Number(n) => Cow::Owned(format_number(*n)),
            Cell::Missing => Cow::Borrowed(PLACEHOLDER),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Flat, ordered view of a recall response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Cell>>,
}

impl RecallTable {
    /// Project a `results` array into a table, one row per entry, API order kept.
    pub fn from_results(results: &[Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut flattened = Vec::with_capacity(results.len());

        for record in results {
            let mut flat = Vec::new();
            if let Value::Object(_) = record {
                flatten("", record, &mut flat);
            }
            for (key, _) in &flat {
                if !index.contains_key(key) {
                    index.insert(key.clone(), columns.len());
                    columns.push(key.clone());
                }
            }
            flattened.push(flat);
        }

        let rows = flattened
            .into_iter()
            .map(|flat| {
                let mut row = vec![Cell::Missing; columns.len()];
                for (key, cell) in flat {
                    row[index[&key]] = cell;
                }
                row
            })
            .collect();

        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Cells of one column in row order. An unknown column reads as all missing.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.index.get(name).copied();
        self.rows
            .iter()
            .map(move |row| idx.map_or(&MISSING, |i| &row[i]))
    }

    /// Display text of a single cell
    pub fn text(&self, row: usize, name: &str) -> Cow<'_, str> {
        let cell = self
            .index
            .get(name)
            .and_then(|&i| self.rows.get(row).map(|r| &r[i]))
            .unwrap_or(&MISSING);
        cell.display()
    }

    /// Frequency of each distinct value, most frequent first.
    ///
    /// Ties keep first-seen order. Missing cells are not counted.
    pub fn value_counts(&self, name: &str) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for cell in self.column(name).filter(|c| !c.is_missing()) {
            let key = cell.display().into_owned();
            match positions.get(&key) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(key.clone(), counts.len());
                    counts.push((key, 1));
                }
            }
        }

        // stable sort keeps first-seen order for equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Character length of each row's display text for a column
    pub fn text_lengths(&self, name: &str) -> Vec<usize> {
        self.column(name)
            .map(|cell| cell.display().chars().count())
            .collect()
    }

    /// Recalls per report year; rows with unparseable dates are skipped
    pub fn yearly_counts(&self) -> YearlyCountSeries {
        YearlyCountSeries::from_dates(
            self.column(crate::columns::REPORT_RECEIVED_DATE)
                .filter_map(Cell::as_text),
        )
    }

    /// Rows as ` | `-joined display text, one line per record
    pub fn to_delimited(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.display())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Cell)>) {
    let Value::Object(map) = value else {
        out.push((prefix.to_string(), Cell::from_json(value)));
        return;
    };

    for (key, child) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match child {
            Value::Object(inner) if !inner.is_empty() => flatten(&name, child, out),
            Value::Object(_) => out.push((name, Cell::Missing)),
            _ => out.push((name, Cell::from_json(child))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Value> {
        vec![
            json!({"Component": "BRAKES", "parkIt": false, "ReportReceivedDate": "26/01/2016"}),
            json!({"Component": "BRAKES", "Summary": "Brake fluid may leak."}),
            json!({"Component": "AIRBAG", "parkIt": true, "ModelYear": 2016}),
        ]
    }

    #[test]
    fn test_projection_keeps_order_and_union_of_columns() {
        let table = RecallTable::from_results(&sample());

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.columns(),
            &["Component", "parkIt", "ReportReceivedDate", "Summary", "ModelYear"]
        );
        assert_eq!(table.text(0, "Component"), "BRAKES");
        assert_eq!(table.text(2, "Component"), "AIRBAG");
    }

    #[test]
    fn test_missing_values_use_placeholder() {
        let table = RecallTable::from_results(&sample());

        assert_eq!(table.text(0, "Summary"), PLACEHOLDER);
        assert_eq!(table.text(1, "parkIt"), PLACEHOLDER);
        assert_eq!(table.text(0, "NoSuchColumn"), PLACEHOLDER);
        assert!(table.column("NoSuchColumn").all(Cell::is_missing));
    }

    #[test]
    fn test_booleans_become_text() {
        let table = RecallTable::from_results(&sample());
        let cells: Vec<_> = table.column("parkIt").cloned().collect();

        assert_eq!(cells[0], Cell::Text("false".into()));
        assert_eq!(cells[1], Cell::Missing);
        assert_eq!(cells[2], Cell::Text("true".into()));
    }

    #[test]
    fn test_numbers_display_without_fraction() {
        let table = RecallTable::from_results(&sample());
        assert_eq!(table.text(2, "ModelYear"), "2016");
    }

    #[test]
    fn test_nested_objects_flatten_with_dots() {
        let results = vec![json!({"Component": "ENGINE", "Detail": {"Code": "E1", "Tags": ["a", "b"]}})];
        let table = RecallTable::from_results(&results);

        assert!(table.has_column("Detail.Code"));
        assert_eq!(table.text(0, "Detail.Code"), "E1");
        assert_eq!(table.text(0, "Detail.Tags"), r#"["a","b"]"#);
    }

    #[test]
    fn test_value_counts_component_scenario() {
        let results = vec![
            json!({"Component": "BRAKES"}),
            json!({"Component": "BRAKES"}),
            json!({"Component": "AIRBAG"}),
        ];
        let table = RecallTable::from_results(&results);

        assert_eq!(
            table.value_counts("Component"),
            vec![("BRAKES".to_string(), 2), ("AIRBAG".to_string(), 1)]
        );
    }

    #[test]
    fn test_value_counts_ties_keep_first_seen_and_skip_missing() {
        let results = vec![
            json!({"Manufacturer": "Kia"}),
            json!({"Manufacturer": "Ford"}),
            json!({"Other": 1}),
            json!({"Manufacturer": "Ford"}),
            json!({"Manufacturer": "Kia"}),
            json!({"Manufacturer": "Audi"}),
        ];
        let table = RecallTable::from_results(&results);

        assert_eq!(
            table.value_counts("Manufacturer"),
            vec![
                ("Kia".to_string(), 2),
                ("Ford".to_string(), 2),
                ("Audi".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_text_lengths_count_placeholder() {
        let table = RecallTable::from_results(&sample());
        assert_eq!(table.text_lengths("Summary"), vec![3, 21, 3]);
    }

    #[test]
    fn test_to_delimited() {
        let results = vec![
            json!({"Component": "BRAKES", "parkIt": false}),
            json!({"Component": "AIRBAG"}),
        ];
        let table = RecallTable::from_results(&results);

        assert_eq!(table.to_delimited(), "BRAKES | false\nAIRBAG | N/A");
    }

    #[test]
    fn test_non_object_entry_is_all_missing_row() {
        let results = vec![json!({"Component": "BRAKES"}), json!("garbage")];
        let table = RecallTable::from_results(&results);

        assert_eq!(table.len(), 2);
        assert_eq!(table.text(1, "Component"), PLACEHOLDER);
    }

    #[test]
    fn test_empty_results() {
        let table = RecallTable::from_results(&[]);
        assert!(table.is_empty());
        assert!(table.value_counts("Component").is_empty());
        assert!(table.yearly_counts().is_empty());
        assert_eq!(table.to_delimited(), "");
    }
}
