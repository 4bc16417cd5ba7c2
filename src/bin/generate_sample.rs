//! Writes a synthetic `data/vehicles.csv` for trying out the dashboard.
//!
//! The file deliberately looks like a scraped dataset: mixed-case headers
//! with spaces, a few unparsable numbers, rows without a model and
//! missing fuel types.

use std::path::Path;

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct ModelSpec {
    make: &'static str,
    model: &'static str,
    hp: (f64, f64),
    fuels: &'static [&'static str],
}

const CATALOGUE: &[ModelSpec] = &[
    ModelSpec { make: "Toyota", model: "Corolla", hp: (120.0, 170.0), fuels: &["Petrol", "Hybrid"] },
    ModelSpec { make: "Toyota", model: "Prius", hp: (110.0, 125.0), fuels: &["Hybrid"] },
    ModelSpec { make: "Toyota", model: "Hilux", hp: (150.0, 204.0), fuels: &["Diesel"] },
    ModelSpec { make: "BMW", model: "M3", hp: (420.0, 510.0), fuels: &["Petrol"] },
    ModelSpec { make: "BMW", model: "330e", hp: (250.0, 292.0), fuels: &["Hybrid"] },
    ModelSpec { make: "BMW", model: "i4", hp: (335.0, 536.0), fuels: &["Electric"] },
    ModelSpec { make: "Tesla", model: "Model 3", hp: (283.0, 510.0), fuels: &["Electric"] },
    ModelSpec { make: "Tesla", model: "Model Y", hp: (299.0, 456.0), fuels: &["Electric"] },
    ModelSpec { make: "Volkswagen", model: "Golf", hp: (110.0, 320.0), fuels: &["Petrol", "Diesel"] },
    ModelSpec { make: "Volkswagen", model: "ID.3", hp: (150.0, 204.0), fuels: &["Electric"] },
    ModelSpec { make: "Ford", model: "Mustang", hp: (310.0, 480.0), fuels: &["Petrol"] },
    ModelSpec { make: "Ford", model: "Ranger", hp: (170.0, 288.0), fuels: &["Diesel", "Petrol"] },
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = Path::new("data/vehicles.csv");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    writer.write_record([
        "Make", "Model", "Year", "Horsepower", "Torque", "Top Speed", "Acceleration", "Fuel Type",
        "Image URL",
    ])?;

    let mut rows = 0usize;
    for spec in CATALOGUE {
        for year in 2015..=2024 {
            if rng.chance(0.3) {
                continue;
            }
            let hp = rng.range(spec.hp.0, spec.hp.1).round();
            let torque = (hp * rng.range(1.2, 1.8)).round();
            let top_speed = (150.0 + hp * 0.25).min(305.0).round();
            let acceleration = (12.0 - hp / 60.0).max(2.8);
            let fuel = spec.fuels[(rng.next_u64() % spec.fuels.len() as u64) as usize];

            let year_cell = if rng.chance(0.04) { "unknown".to_string() } else { year.to_string() };
            let hp_cell = if rng.chance(0.04) { "n/a".to_string() } else { hp.to_string() };
            let fuel_cell = if rng.chance(0.05) { "" } else { fuel };
            let model_cell = if rng.chance(0.02) { "" } else { spec.model };
            let image = if rng.chance(0.5) {
                format!(
                    "https://images.example.com/{}/{}.jpg",
                    spec.make.to_lowercase(),
                    spec.model.to_lowercase().replace(' ', "-")
                )
            } else {
                String::new()
            };

            writer.write_record([
                spec.make,
                model_cell,
                year_cell.as_str(),
                hp_cell.as_str(),
                torque.to_string().as_str(),
                top_speed.to_string().as_str(),
                format!("{acceleration:.1}").as_str(),
                fuel_cell,
                image.as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} vehicles to {}", output_path.display());
    Ok(())
}
