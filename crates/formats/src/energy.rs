use std::collections::HashMap;
use std::io::Read;

/// Electricity exchange figures for one country, bucketed by direction.
/// Each entry is a raw `Units` string in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyProfile {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Energy dataset keyed by country display name. Only rows typed
/// `electricity` are kept; the source files mix in other carriers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyTable {
    rows: HashMap<String, EnergyProfile>,
}

#[derive(Debug)]
pub enum EnergyTableError {
    Csv(csv::Error),
    MissingColumn { name: &'static str },
}

impl std::fmt::Display for EnergyTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyTableError::Csv(err) => write!(f, "CSV error: {err}"),
            EnergyTableError::MissingColumn { name } => {
                write!(f, "energy data is missing the {name} column")
            }
        }
    }
}

impl std::error::Error for EnergyTableError {}

impl EnergyTable {
    pub fn from_reader(reader: impl Read) -> Result<Self, EnergyTableError> {
        let mut csv_reader = csv::ReaderBuilder::new().from_reader(reader);
        let headers = csv_reader.headers().map_err(EnergyTableError::Csv)?.clone();
        let country_col = column_index(&headers, "Country")?;
        let direction_col = column_index(&headers, "ImportExport")?;
        let type_col = column_index(&headers, "Type")?;
        let units_col = column_index(&headers, "Units")?;

        let mut rows: HashMap<String, EnergyProfile> = HashMap::new();
        for result in csv_reader.records() {
            let record = result.map_err(EnergyTableError::Csv)?;
            let energy_type = record.get(type_col).unwrap_or("").trim();
            if !energy_type.eq_ignore_ascii_case("electricity") {
                continue;
            }
            let country = record.get(country_col).unwrap_or("").trim();
            if country.is_empty() {
                continue;
            }

            let units = record.get(units_col).unwrap_or("").trim().to_string();
            let direction = record.get(direction_col).unwrap_or("").trim();
            let profile = rows.entry(country.to_string()).or_default();
            if direction.eq_ignore_ascii_case("import") {
                profile.imports.push(units);
            } else if direction.eq_ignore_ascii_case("export") {
                profile.exports.push(units);
            }
        }
        Ok(Self { rows })
    }

    pub fn get(&self, country: &str) -> Option<&EnergyProfile> {
        self.rows.get(country)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Folds `other` into this table. Later profiles win on name collisions.
    pub fn merge(&mut self, other: EnergyTable) {
        self.rows.extend(other.rows);
    }
}

fn column_index(
    headers: &csv::StringRecord,
    name: &'static str,
) -> Result<usize, EnergyTableError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or(EnergyTableError::MissingColumn { name })
}
