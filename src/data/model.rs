use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Column names the view engine knows about (after normalisation).
pub const MAKE: &str = "make";
pub const MODEL: &str = "model";
pub const YEAR: &str = "year";
pub const HORSEPOWER: &str = "horsepower";
pub const FUEL_TYPE: &str = "fuel_type";

/// Columns coerced to numbers by the loader.
pub const NUMERIC_COLUMNS: [&str; 5] = [YEAR, HORSEPOWER, "torque", "top_speed", "acceleration"];

/// Image-reference columns, checked in this order. First hit wins.
pub const IMAGE_COLUMNS: [&str; 4] = ["image_url", "img_link", "photo", "picture"];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// One cleaned cell. Numeric columns only ever hold `Number` or `Missing`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            // Whole numbers (years, hp) read better without a trailing ".0".
            CellValue::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one vehicle row
// ---------------------------------------------------------------------------

/// A single vehicle entry keyed by normalised column name.
/// Columns absent from the row are treated the same as `Missing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub cells: BTreeMap<String, CellValue>,
}

static MISSING: CellValue = CellValue::Missing;

impl Record {
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&MISSING)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).as_str()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }

    pub fn make(&self) -> Option<&str> {
        self.text(MAKE)
    }

    pub fn model(&self) -> Option<&str> {
        self.text(MODEL)
    }

    pub fn year(&self) -> Option<f64> {
        self.number(YEAR)
    }

    pub fn horsepower(&self) -> Option<f64> {
        self.number(HORSEPOWER)
    }

    pub fn fuel_type(&self) -> Option<&str> {
        self.text(FUEL_TYPE)
    }

    /// First non-missing value among [`IMAGE_COLUMNS`], if it looks like a URL.
    pub fn image_reference(&self) -> Option<&str> {
        IMAGE_COLUMNS
            .iter()
            .find_map(|col| self.text(col))
            .filter(|v| v.starts_with("http"))
    }
}

// ---------------------------------------------------------------------------
// Dataset – the cleaned table
// ---------------------------------------------------------------------------

/// The cleaned, immutable vehicle table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Normalised column names in source order.
    pub columns: Vec<String>,
    /// All rows that survived cleaning.
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { columns, records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn has_image_column(&self) -> bool {
        IMAGE_COLUMNS.iter().any(|c| self.has_column(c))
    }

    /// Sorted distinct brands across the whole (unfiltered) dataset.
    pub fn brands(&self) -> BTreeSet<&str> {
        self.records.iter().filter_map(Record::make).collect()
    }

    /// Sorted distinct models offered for `brand`.
    pub fn models_for(&self, brand: &str) -> BTreeSet<&str> {
        self.records
            .iter()
            .filter(|r| r.make() == Some(brand))
            .filter_map(Record::model)
            .collect()
    }

    /// Sorted distinct fuel types, or `None` if there is no fuel column.
    pub fn fuel_types(&self) -> Option<BTreeSet<&str>> {
        if !self.has_column(FUEL_TYPE) {
            return None;
        }
        Some(self.records.iter().filter_map(Record::fuel_type).collect())
    }

    /// Observed `(min, max)` of a numeric column.
    /// `None` when the column is absent or holds no numbers at all.
    pub fn numeric_bounds(&self, column: &str) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.number(column))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        Record {
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn image_reference_takes_first_present_candidate() {
        let r = record(&[
            ("image_url", CellValue::Missing),
            ("photo", text("https://cdn.example/a.jpg")),
            ("picture", text("https://cdn.example/b.jpg")),
        ]);
        assert_eq!(r.image_reference(), Some("https://cdn.example/a.jpg"));
    }

    #[test]
    fn image_reference_requires_http_prefix() {
        let r = record(&[("image_url", text("images/a.jpg")), ("photo", text("http://x/b.png"))]);
        // The first non-missing candidate decides; a local path is not a URL.
        assert_eq!(r.image_reference(), None);
    }

    #[test]
    fn brands_and_models_are_sorted_and_distinct() {
        let ds = Dataset::new(
            vec![MAKE.into(), MODEL.into()],
            vec![
                record(&[(MAKE, text("Toyota")), (MODEL, text("Yaris"))]),
                record(&[(MAKE, text("BMW")), (MODEL, text("M3"))]),
                record(&[(MAKE, text("Toyota")), (MODEL, text("Corolla"))]),
                record(&[(MAKE, text("Toyota")), (MODEL, text("Corolla"))]),
            ],
        );
        assert_eq!(ds.brands().into_iter().collect::<Vec<_>>(), ["BMW", "Toyota"]);
        assert_eq!(
            ds.models_for("Toyota").into_iter().collect::<Vec<_>>(),
            ["Corolla", "Yaris"]
        );
        assert!(ds.models_for("Audi").is_empty());
    }

    #[test]
    fn numeric_bounds_skip_missing_and_absent_columns() {
        let ds = Dataset::new(
            vec![YEAR.into()],
            vec![
                record(&[(YEAR, CellValue::Number(2018.0))]),
                record(&[(YEAR, CellValue::Missing)]),
                record(&[(YEAR, CellValue::Number(2021.0))]),
            ],
        );
        assert_eq!(ds.numeric_bounds(YEAR), Some((2018.0, 2021.0)));
        assert_eq!(ds.numeric_bounds(HORSEPOWER), None);
        assert!(ds.fuel_types().is_none());
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(2020.0).to_string(), "2020");
        assert_eq!(CellValue::Number(6.5).to_string(), "6.5");
    }
}
