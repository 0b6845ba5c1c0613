//! Dropdown options built from the reference dataset.

use crate::error::ResourceLoadError;
use crate::types::CATEGORICAL_COLUMNS;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::{fs::File, io::Read, path::Path};
use tracing::info;

// Cell values read as missing. Same set pandas.read_csv treats as NaN.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Sorted distinct values with missing cells dropped.
pub fn unique_values<'a, I>(cells: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    cells
        .into_iter()
        .flatten()
        .filter(|c| !is_missing(c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DropdownCatalogue {
    options: BTreeMap<String, Vec<String>>,
}

impl DropdownCatalogue {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ResourceLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ResourceLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path).map_err(|source| ResourceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalogue = Self::from_reader(file)?;
        info!(
            path = %path.display(),
            columns = catalogue.populated_columns(),
            "dropdown options extracted"
        );
        Ok(catalogue)
    }

    /// Read a headered CSV and collect options for every categorical column.
    /// Columns the file lacks get an empty list.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ResourceLoadError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let index: Vec<(&str, Option<usize>)> = CATEGORICAL_COLUMNS
            .iter()
            .map(|col| (*col, headers.iter().position(|h| h == *col)))
            .collect();

        let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;

        let options = index
            .into_iter()
            .map(|(col, idx)| {
                let values = match idx {
                    Some(i) => unique_values(rows.iter().map(|r| r.get(i))),
                    None => Vec::new(),
                };
                (col.to_string(), values)
            })
            .collect();
        Ok(Self { options })
    }

    pub fn get(&self, column: &str) -> &[String] {
        self.options.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of columns with at least one option.
    pub fn populated_columns(&self) -> usize {
        self.options.values().filter(|v| !v.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.options.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unique_values_sorted_dedup_no_missing() {
        let cells = [
            Some("Toyota"),
            Some("Honda"),
            None,
            Some("Toyota"),
            Some(""),
            Some("NaN"),
            Some("Audi"),
            Some("Honda"),
        ];
        assert_eq!(unique_values(cells), vec!["Audi", "Honda", "Toyota"]);
    }

    #[test]
    fn test_unique_values_empty() {
        assert!(unique_values(Vec::<Option<&str>>::new()).is_empty());
        assert!(unique_values([None, Some("NA")]).is_empty());
    }

    #[test]
    fn test_from_reader() {
        let csv = "make,model,year,fuel,price\n\
                   Toyota,Camry,2020,Gasoline,25000\n\
                   Ford,F-150,2019,,30000\n\
                   Toyota,Corolla,2021,Hybrid,22000\n\
                   Ford,F-150,2018,Gasoline,28000\n";
        let cat = DropdownCatalogue::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(cat.get("make"), ["Ford", "Toyota"]);
        assert_eq!(cat.get("model"), ["Camry", "Corolla", "F-150"]);
        assert_eq!(cat.get("fuel"), ["Gasoline", "Hybrid"]);
        // absent from the file
        assert!(cat.get("drivetrain").is_empty());
        // not a categorical column
        assert!(cat.get("year").is_empty());
        assert!(!cat.is_empty());
        assert_eq!(cat.populated_columns(), 3);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = DropdownCatalogue::from_path("/nonexistent/featured_data.csv").unwrap_err();
        assert!(matches!(err, ResourceLoadError::NotFound { .. }));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "make,body\nKia,SUV\nKia,Sedan").unwrap();
        let cat = DropdownCatalogue::from_path(file.path()).unwrap();
        assert_eq!(cat.get("make"), ["Kia"]);
        assert_eq!(cat.get("body"), ["SUV", "Sedan"]);
    }

    #[test]
    fn test_default_is_empty() {
        let cat = DropdownCatalogue::default();
        assert!(cat.is_empty());
        assert_eq!(cat.populated_columns(), 0);
        assert!(cat.get("make").is_empty());
    }
}
