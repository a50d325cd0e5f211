use std::collections::HashMap;
use std::io::Read;

/// Import/export figures for one country, kept as the raw strings from
/// the dataset so display formatting round-trips unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub name: String,
    pub import: String,
    pub export: String,
}

/// Trade dataset keyed by boundary feature id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeTable {
    rows: HashMap<String, TradeRecord>,
}

#[derive(Debug)]
pub enum TradeTableError {
    Csv(csv::Error),
    MissingColumn { name: &'static str },
}

impl std::fmt::Display for TradeTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeTableError::Csv(err) => write!(f, "CSV error: {err}"),
            TradeTableError::MissingColumn { name } => {
                write!(f, "trade data is missing the {name} column")
            }
        }
    }
}

impl std::error::Error for TradeTableError {}

impl TradeTable {
    pub fn from_reader(reader: impl Read) -> Result<Self, TradeTableError> {
        let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
        let headers = csv_reader.headers().map_err(TradeTableError::Csv)?.clone();
        let id_col = column_index(&headers, "ID")?;
        let name_col = column_index(&headers, "Name")?;
        let import_col = column_index(&headers, "Import")?;
        let export_col = column_index(&headers, "Export")?;

        let mut rows = HashMap::new();
        for result in csv_reader.records() {
            let record = result.map_err(TradeTableError::Csv)?;
            let id = record.get(id_col).unwrap_or("").trim().to_string();
            if id.is_empty() {
                continue;
            }
            rows.insert(
                id,
                TradeRecord {
                    name: record.get(name_col).unwrap_or("").trim().to_string(),
                    import: record.get(import_col).unwrap_or("").trim().to_string(),
                    export: record.get(export_col).unwrap_or("").trim().to_string(),
                },
            );
        }
        Ok(Self { rows })
    }

    pub fn get(&self, id: &str) -> Option<&TradeRecord> {
        self.rows.get(id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Folds `other` into this table. Later rows win on id collisions.
    pub fn merge(&mut self, other: TradeTable) {
        self.rows.extend(other.rows);
    }
}

fn column_index(
    headers: &csv::StringRecord,
    name: &'static str,
) -> Result<usize, TradeTableError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(TradeTableError::MissingColumn { name })
}

#[cfg(test)]
mod tests {
    use super::{TradeTable, TradeTableError};

    #[test]
    fn looks_up_figures_by_feature_id() {
        let csv = "ID,Name,Import,Export\n004,Afghanistan,10,5\n250,France,9,12\n";
        let table = TradeTable::from_reader(csv.as_bytes()).expect("parse trade table");

        let afghanistan = table.get("004").expect("row for 004");
        assert_eq!(afghanistan.name, "Afghanistan");
        assert_eq!(afghanistan.import, "10");
        assert_eq!(afghanistan.export, "5");
        assert!(table.get("999").is_none());
    }

    #[test]
    fn skips_rows_without_an_id() {
        let csv = "ID,Name,Import,Export\n,Nowhere,1,2\n250,France,9,12\n";
        let table = TradeTable::from_reader(csv.as_bytes()).expect("parse trade table");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn trims_whitespace_around_values() {
        let csv = "ID,Name,Import,Export\n 004 , Afghanistan , 10 , 5 \n";
        let table = TradeTable::from_reader(csv.as_bytes()).expect("parse trade table");
        let row = table.get("004").expect("row for 004");
        assert_eq!(row.name, "Afghanistan");
        assert_eq!(row.import, "10");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "ID,Name,Import\n004,Afghanistan,10\n";
        let err = TradeTable::from_reader(csv.as_bytes()).expect_err("expect column error");
        match err {
            TradeTableError::MissingColumn { name } => assert_eq!(name, "Export"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn merge_prefers_rows_from_the_later_table() {
        let base = "ID,Name,Import,Export\n004,Afghanistan,10,5\n";
        let patch = "ID,Name,Import,Export\n004,Afghanistan,11,6\n008,Albania,3,4\n";
        let mut table = TradeTable::from_reader(base.as_bytes()).expect("parse base");
        table.merge(TradeTable::from_reader(patch.as_bytes()).expect("parse patch"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("004").expect("row for 004").import, "11");
    }
}
