use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Record, FUEL_TYPE, HORSEPOWER, MAKE, YEAR};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` bound on a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// Build a range; bounds given the wrong way round are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        NumericRange { min, max }.normalized()
    }

    /// Swap inverted bounds and open up NaN bounds.
    pub fn normalized(self) -> Self {
        let min = if self.min.is_nan() { f64::NEG_INFINITY } else { self.min };
        let max = if self.max.is_nan() { f64::INFINITY } else { self.max };
        if min > max {
            NumericRange { min: max, max: min }
        } else {
            NumericRange { min, max }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The user's current selection.
///
/// `None` for a range or the fuel set means "no constraint". Ranges and the
/// fuel set are also ignored when the dataset has no data for that column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub brand: String,
    pub model: String,
    pub year: Option<NumericRange>,
    pub horsepower: Option<NumericRange>,
    pub fuel_types: Option<BTreeSet<String>>,
}

impl FilterSpec {
    /// Defaults: first brand, its first model, full observed ranges and
    /// every observed fuel type.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let brand = dataset.brands().into_iter().next().unwrap_or_default().to_string();
        let model = first_model(dataset, &brand);
        FilterSpec {
            year: full_range(dataset, YEAR),
            horsepower: full_range(dataset, HORSEPOWER),
            fuel_types: dataset
                .fuel_types()
                .map(|set| set.into_iter().map(str::to_string).collect()),
            brand,
            model,
        }
    }
}

/// First model (alphabetically) listed for `brand`, or empty.
pub fn first_model(dataset: &Dataset, brand: &str) -> String {
    dataset
        .models_for(brand)
        .into_iter()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Observed bounds of `column` as a range.
pub fn full_range(dataset: &Dataset, column: &str) -> Option<NumericRange> {
    dataset
        .numeric_bounds(column)
        .map(|(lo, hi)| NumericRange::new(lo, hi))
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub distinct_brands: usize,
    pub distinct_models: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub year: f64,
    pub horsepower: f64,
    pub fuel_type: Option<String>,
}

/// Everything the presentation layer draws for one [`FilterSpec`].
///
/// Row sets are indices into the dataset the view was computed from.
/// Aggregates are `None` when the underlying column is not available,
/// as opposed to `Some` but empty when filters exclude every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredView {
    /// Rows passing the range and fuel predicates (the working subset).
    pub working: Vec<usize>,
    /// Rows of `working` matching brand and model exactly.
    pub selected: Vec<usize>,
    pub image_reference: Option<String>,
    /// Whether the dataset carries any image-reference column at all.
    pub has_image_column: bool,
    pub counts: Counts,
    pub horsepower_distribution: Option<Vec<f64>>,
    pub fuel_type_distribution: Option<BTreeMap<String, usize>>,
    pub make_distribution: Option<BTreeMap<String, usize>>,
    pub year_vs_horsepower: Option<Vec<ScatterPoint>>,
}

impl FilteredView {
    /// Callers must show a "no matching data" notice when this is true.
    pub fn has_no_selection(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected_records<'a>(
        &'a self,
        dataset: &'a Dataset,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.selected.iter().map(move |&i| &dataset.records[i])
    }
}

/// Order a distribution for display: highest count first, then by name.
pub fn by_count(distribution: &BTreeMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = distribution
        .iter()
        .map(|(k, &v)| (k.as_str(), v))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Apply `spec` to `dataset` and derive every chart-ready view.
///
/// A record with a missing value fails any active range predicate, and a
/// record without a fuel type fails an active fuel predicate.
pub fn compute_view(dataset: &Dataset, spec: &FilterSpec) -> FilteredView {
    let has_year = dataset.numeric_bounds(YEAR).is_some();
    let has_hp = dataset.numeric_bounds(HORSEPOWER).is_some();
    let has_fuel = dataset.has_column(FUEL_TYPE);
    let has_make = dataset.has_column(MAKE);

    let year = spec.year.filter(|_| has_year).map(NumericRange::normalized);
    let horsepower = spec.horsepower.filter(|_| has_hp).map(NumericRange::normalized);
    let fuel_types = spec.fuel_types.as_ref().filter(|_| has_fuel);

    let passes = |r: &Record| {
        in_range(year, r.year())
            && in_range(horsepower, r.horsepower())
            && fuel_types.map_or(true, |set| r.fuel_type().is_some_and(|f| set.contains(f)))
    };

    let working: Vec<usize> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| passes(*r))
        .map(|(i, _)| i)
        .collect();
    let working_records: Vec<&Record> = working.iter().map(|&i| &dataset.records[i]).collect();
    let rows = || working_records.iter().copied();

    let selected: Vec<usize> = working
        .iter()
        .copied()
        .filter(|&i| {
            let r = &dataset.records[i];
            r.make() == Some(spec.brand.as_str()) && r.model() == Some(spec.model.as_str())
        })
        .collect();

    let image_reference = selected
        .first()
        .and_then(|&i| dataset.records[i].image_reference())
        .map(str::to_string);

    let counts = Counts {
        total: working.len(),
        distinct_brands: rows().filter_map(Record::make).collect::<BTreeSet<_>>().len(),
        distinct_models: rows().filter_map(Record::model).collect::<BTreeSet<_>>().len(),
    };

    let horsepower_distribution = has_hp.then(|| rows().filter_map(Record::horsepower).collect());
    let fuel_type_distribution = has_fuel.then(|| tally(rows().filter_map(Record::fuel_type)));
    let make_distribution = has_make.then(|| tally(rows().filter_map(Record::make)));
    let year_vs_horsepower = (has_year && has_hp).then(|| {
        rows()
            .filter_map(|r| {
                Some(ScatterPoint {
                    year: r.year()?,
                    horsepower: r.horsepower()?,
                    fuel_type: r.fuel_type().map(str::to_string),
                })
            })
            .collect()
    });

    log::debug!(
        "View for {} {}: {} working rows, {} selected",
        spec.brand,
        spec.model,
        working.len(),
        selected.len()
    );

    FilteredView {
        working,
        selected,
        image_reference,
        has_image_column: dataset.has_image_column(),
        counts,
        horsepower_distribution,
        fuel_type_distribution,
        make_distribution,
        year_vs_horsepower,
    }
}

fn in_range(range: Option<NumericRange>, value: Option<f64>) -> bool {
    match (range, value) {
        (None, _) => true,
        (Some(r), Some(v)) => r.contains(v),
        (Some(_), None) => false,
    }
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, MODEL};

    fn vehicle(make: &str, model: &str, year: Option<f64>, hp: Option<f64>, fuel: Option<&str>) -> Record {
        let num = |v: Option<f64>| v.map_or(CellValue::Missing, CellValue::Number);
        let mut cells = BTreeMap::new();
        cells.insert(MAKE.to_string(), CellValue::Text(make.to_string()));
        cells.insert(MODEL.to_string(), CellValue::Text(model.to_string()));
        cells.insert(YEAR.to_string(), num(year));
        cells.insert(HORSEPOWER.to_string(), num(hp));
        cells.insert(
            FUEL_TYPE.to_string(),
            fuel.map_or(CellValue::Missing, |f| CellValue::Text(f.to_string())),
        );
        Record { cells }
    }

    fn columns(with_fuel: bool) -> Vec<String> {
        let mut cols: Vec<String> = [MAKE, MODEL, YEAR, HORSEPOWER].map(String::from).to_vec();
        if with_fuel {
            cols.push(FUEL_TYPE.to_string());
        }
        cols
    }

    fn fleet() -> Dataset {
        Dataset::new(
            columns(true),
            vec![
                vehicle("Toyota", "Corolla", Some(2020.0), Some(130.0), Some("Petrol")),
                vehicle("Toyota", "Corolla", None, Some(140.0), Some("Petrol")),
                vehicle("Toyota", "Prius", Some(2019.0), Some(121.0), Some("Hybrid")),
                vehicle("Tesla", "Model 3", Some(2021.0), Some(283.0), Some("Electric")),
                vehicle("BMW", "M3", Some(2018.0), None, Some("Petrol")),
                vehicle("BMW", "330e", Some(2020.0), Some(288.0), None),
            ],
        )
    }

    fn toyota_corolla() -> FilterSpec {
        FilterSpec {
            brand: "Toyota".into(),
            model: "Corolla".into(),
            ..FilterSpec::default()
        }
    }

    #[test]
    fn missing_year_is_excluded_by_year_range() {
        let ds = fleet();
        let spec = FilterSpec {
            year: Some(NumericRange::new(2019.0, 2021.0)),
            ..toyota_corolla()
        };
        let view = compute_view(&ds, &spec);

        assert_eq!(view.selected, [0]);
        assert!(!view.working.contains(&1));
    }

    #[test]
    fn inverted_range_is_swapped() {
        let ds = fleet();
        let straight = compute_view(
            &ds,
            &FilterSpec {
                horsepower: Some(NumericRange::new(120.0, 200.0)),
                ..toyota_corolla()
            },
        );
        let inverted = compute_view(
            &ds,
            &FilterSpec {
                horsepower: Some(NumericRange { min: 200.0, max: 120.0 }),
                ..toyota_corolla()
            },
        );
        assert_eq!(straight, inverted);
        assert_eq!(straight.working, [0, 1, 2]);
    }

    #[test]
    fn selected_rows_satisfy_every_active_predicate() {
        let ds = fleet();
        let specs = [
            FilterSpec::for_dataset(&ds),
            FilterSpec {
                year: Some(NumericRange::new(2018.0, 2020.0)),
                horsepower: Some(NumericRange::new(100.0, 135.0)),
                fuel_types: Some(["Petrol".to_string()].into()),
                ..toyota_corolla()
            },
            FilterSpec {
                brand: "BMW".into(),
                model: "330e".into(),
                fuel_types: Some(BTreeSet::new()),
                ..FilterSpec::default()
            },
        ];

        for spec in &specs {
            let view = compute_view(&ds, spec);
            for r in view.selected_records(&ds) {
                assert_eq!(r.make(), Some(spec.brand.as_str()));
                assert_eq!(r.model(), Some(spec.model.as_str()));
                assert!(in_range(spec.year, r.year()));
                assert!(in_range(spec.horsepower, r.horsepower()));
                if let Some(fuels) = &spec.fuel_types {
                    assert!(fuels.contains(r.fuel_type().unwrap()));
                }
            }
            assert_eq!(view.counts.total, view.working.len());
            assert!(view.counts.distinct_brands <= view.counts.total);
        }
    }

    #[test]
    fn defaults_cover_observed_ranges_and_fuels() {
        let ds = fleet();
        let spec = FilterSpec::for_dataset(&ds);

        assert_eq!(spec.brand, "BMW");
        assert_eq!(spec.model, "330e");
        assert_eq!(spec.year, Some(NumericRange::new(2018.0, 2021.0)));
        assert_eq!(spec.horsepower, Some(NumericRange::new(121.0, 288.0)));
        assert_eq!(spec.fuel_types.as_ref().map(BTreeSet::len), Some(3));

        // Rows with a missing year, horsepower or fuel type drop out.
        let view = compute_view(&ds, &spec);
        assert_eq!(view.working, [0, 2, 3]);
        assert!(view.has_no_selection());
    }

    #[test]
    fn no_brand_model_match_gives_empty_selection() {
        let ds = fleet();
        let spec = FilterSpec {
            brand: "Lada".into(),
            model: "Niva".into(),
            ..FilterSpec::default()
        };
        let view = compute_view(&ds, &spec);

        assert!(view.has_no_selection());
        assert_eq!(view.image_reference, None);
        assert_eq!(view.counts.total, ds.len());
    }

    #[test]
    fn aggregates_follow_working_subset() {
        let ds = fleet();
        let spec = FilterSpec {
            fuel_types: Some(["Petrol".to_string(), "Hybrid".to_string()].into()),
            ..toyota_corolla()
        };
        let view = compute_view(&ds, &spec);

        assert_eq!(
            view.counts,
            Counts {
                total: 4,
                distinct_brands: 2,
                distinct_models: 3,
            }
        );
        assert_eq!(view.horsepower_distribution, Some(vec![130.0, 140.0, 121.0]));

        let fuels = view.fuel_type_distribution.unwrap();
        assert_eq!(by_count(&fuels), [("Petrol", 3), ("Hybrid", 1)]);

        let makes = view.make_distribution.unwrap();
        assert_eq!(by_count(&makes), [("Toyota", 3), ("BMW", 1)]);

        let points = view.year_vs_horsepower.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].fuel_type.as_deref(), Some("Hybrid"));
    }

    #[test]
    fn absent_fuel_column_skips_fuel_filter_and_distribution() {
        let mut ds = fleet();
        ds.columns = columns(false);
        for r in &mut ds.records {
            r.cells.remove(FUEL_TYPE);
        }
        let spec = FilterSpec {
            fuel_types: Some(["Diesel".to_string()].into()),
            ..toyota_corolla()
        };
        let view = compute_view(&ds, &spec);

        assert!(view.fuel_type_distribution.is_none());
        assert_eq!(view.working.len(), ds.len());
        assert_eq!(view.selected, [0, 1]);
    }

    #[test]
    fn entirely_missing_numeric_column_is_not_applicable() {
        let ds = Dataset::new(
            columns(true),
            vec![
                vehicle("Kia", "Rio", Some(2015.0), None, Some("Petrol")),
                vehicle("Kia", "Ceed", Some(2017.0), None, Some("Diesel")),
            ],
        );
        let spec = FilterSpec {
            brand: "Kia".into(),
            model: "Rio".into(),
            horsepower: Some(NumericRange::new(100.0, 200.0)),
            ..FilterSpec::default()
        };
        assert_eq!(FilterSpec::for_dataset(&ds).horsepower, None);

        let view = compute_view(&ds, &spec);
        assert_eq!(view.working, [0, 1]);
        assert!(view.horsepower_distribution.is_none());
        assert!(view.year_vs_horsepower.is_none());
    }

    #[test]
    fn image_reference_comes_from_first_selected_row() {
        let mut ds = fleet();
        ds.columns.push("image_url".to_string());
        ds.records[0]
            .cells
            .insert("image_url".into(), CellValue::Text("https://img.example/corolla.jpg".into()));
        ds.records[1]
            .cells
            .insert("image_url".into(), CellValue::Text("https://img.example/other.jpg".into()));

        let view = compute_view(&ds, &toyota_corolla());
        assert!(view.has_image_column);
        assert_eq!(view.image_reference.as_deref(), Some("https://img.example/corolla.jpg"));
    }
}
