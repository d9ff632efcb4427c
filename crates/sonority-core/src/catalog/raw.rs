use std::io::Read;

use crate::error::Result;

/// An untyped table: a header row plus string records.
///
/// This is the boundary between CSV ingestion and the typed catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    #[must_use]
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// Read a CSV document with a header row. Cells are whitespace-trimmed;
    /// records with a different field count than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, records })
    }

    /// Position of a column in the header row.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The cell at (`row`, `column`), or `""` if the record is short.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.records
            .get(row)
            .and_then(|record| record.get(column))
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_trims_cells() {
        let data = "track_name, energy\n Song A , 0.5\n";
        let table = RawTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["track_name", "energy"]);
        assert_eq!(table.cell(0, 0), "Song A");
        assert_eq!(table.cell(0, 1), "0.5");
    }

    #[test]
    fn test_from_reader_rejects_ragged_records() {
        let data = "a,b\n1,2\n3\n";
        let result = RawTable::from_reader(data.as_bytes());
        assert!(matches!(result, Err(crate::Error::Csv(_))));
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let table = RawTable::new(vec!["a".to_string()], vec![vec!["1".to_string()]]);
        assert_eq!(table.cell(0, 5), "");
        assert_eq!(table.cell(3, 0), "");
        assert_eq!(table.column_index("a"), Some(0));
        assert_eq!(table.column_index("b"), None);
    }
}
