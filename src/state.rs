use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::cache::DatasetCache;
use crate::data::filter::{compute_view, first_model, FilterSpec, FilteredView, NumericRange};
use crate::data::loader::FileError;
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Datasets loaded during this session, keyed by path.
    pub cache: DatasetCache,

    /// Dataset currently on screen (None until a file loads).
    pub dataset: Option<Arc<Dataset>>,

    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Current user selection.
    pub filter: FilterSpec,

    /// View derived from `dataset` + `filter` (recomputed on every change).
    pub view: FilteredView,

    /// Fuel type → colour, shared by the fuel chart and the scatter plot.
    pub fuel_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load `path` through the session cache and make it current.
    pub fn open(&mut self, path: &Path) -> Result<(), FileError> {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::info!("Showing {} vehicles from {}", dataset.len(), path.display());
                log::debug!("{} dataset(s) cached this session", self.cache.len());
                if dataset.is_empty() {
                    log::warn!("{} contains no usable vehicles", path.display());
                }
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a dataset, reset filters to their defaults and recompute.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filter = FilterSpec::for_dataset(&dataset);
        self.fuel_colors = dataset.fuel_types().map(ColorMap::new);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the view after a filter change.
    pub fn refilter(&mut self) {
        self.view = match &self.dataset {
            Some(ds) => compute_view(ds, &self.filter),
            None => FilteredView::default(),
        };
    }

    /// Switch brand; the model resets to the brand's first model.
    pub fn select_brand(&mut self, brand: &str) {
        if let Some(ds) = &self.dataset {
            self.filter.model = first_model(ds, brand);
        }
        self.filter.brand = brand.to_string();
        self.refilter();
    }

    pub fn select_model(&mut self, model: &str) {
        self.filter.model = model.to_string();
        self.refilter();
    }

    pub fn set_year_range(&mut self, min: f64, max: f64) {
        self.filter.year = Some(NumericRange::new(min, max));
        self.refilter();
    }

    pub fn set_horsepower_range(&mut self, min: f64, max: f64) {
        self.filter.horsepower = Some(NumericRange::new(min, max));
        self.refilter();
    }

    /// Toggle a single fuel type in the accepted set.
    pub fn toggle_fuel_type(&mut self, fuel: &str) {
        let selected = self.filter.fuel_types.get_or_insert_with(Default::default);
        if !selected.remove(fuel) {
            selected.insert(fuel.to_string());
        }
        self.refilter();
    }

    /// Accept every observed fuel type.
    pub fn select_all_fuel_types(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filter.fuel_types = ds
                .fuel_types()
                .map(|set| set.into_iter().map(str::to_string).collect());
            self.refilter();
        }
    }

    /// Accept no fuel type at all (empties the working subset).
    pub fn select_no_fuel_types(&mut self) {
        if let Some(ds) = &self.dataset {
            if ds.fuel_types().is_some() {
                self.filter.fuel_types = Some(Default::default());
                self.refilter();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn fixture() -> NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().expect("temp file");
        write!(
            file,
            "Make,Model,Year,Horsepower,Fuel Type,Image URL\n\
             Toyota,Corolla,2020,130,Petrol,https://img.example/corolla.jpg\n\
             Toyota,Yaris,2018,90,Hybrid,\n\
             Audi,A4,2019,190,Diesel,not-a-url\n\
             Audi,e-tron,2021,402,Electric,\n"
        )
        .unwrap();
        file
    }

    #[test]
    fn opening_resets_filters_to_defaults() {
        let file = fixture();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();

        assert_eq!(state.filter.brand, "Audi");
        assert_eq!(state.filter.model, "A4");
        assert_eq!(state.view.counts.total, 4);
        assert_eq!(state.view.selected.len(), 1);
        assert_eq!(state.view.image_reference, None);
        assert!(state.view.has_image_column);
        assert!(state.fuel_colors.is_some());
    }

    #[test]
    fn brand_change_picks_first_model_of_brand() {
        let file = fixture();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();

        state.select_brand("Toyota");
        assert_eq!(state.filter.model, "Corolla");
        assert_eq!(
            state.view.image_reference.as_deref(),
            Some("https://img.example/corolla.jpg")
        );

        state.select_model("Yaris");
        assert_eq!(state.view.selected.len(), 1);
        assert_eq!(state.view.image_reference, None);
    }

    #[test]
    fn range_and_fuel_changes_recompute_the_view() {
        let file = fixture();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();

        state.set_horsepower_range(400.0, 100.0);
        assert_eq!(state.view.counts.total, 2);

        state.set_year_range(2020.0, 2021.0);
        assert_eq!(state.view.counts.total, 1);
        assert!(state.view.has_no_selection());

        state.select_all_fuel_types();
        state.toggle_fuel_type("Petrol");
        assert_eq!(state.view.counts.total, 0);

        state.toggle_fuel_type("Petrol");
        assert_eq!(state.view.counts.total, 1);

        state.select_no_fuel_types();
        assert_eq!(state.view.counts.total, 0);
    }

    #[test]
    fn reopening_a_path_hits_the_cache() {
        let file = fixture();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        let first = state.dataset.clone().unwrap();

        state.open(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, state.dataset.as_ref().unwrap()));
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let file = fixture();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();

        assert!(state.open(Path::new("/missing/vehicles.csv")).is_err());
        assert!(state.status_message.is_some());
        assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(4));
    }
}
