use anyhow::Result;
use chrono::{Duration, NaiveDate};

// ---------------------------------------------------------------------------
// Sample outbreak dataset generator
// ---------------------------------------------------------------------------
//
// Writes `sample_outbreak.csv`: 365 days of synthetic daily counts for five
// regions plus a "World" aggregate, in the long CSV layout the viewer loads
// (location, date, one column per measure). Deterministic output, seed 42.

/// Epidemic wave: gaussian-shaped expected daily incidence.
fn wave(day: f64, peak: f64, width: f64, amplitude: f64) -> f64 {
    amplitude * (-(day - peak).powi(2) / (2.0 * width.powi(2))).exp()
}

/// Region parameters: name and two overlapping waves (peak, width, amplitude).
const REGIONS: [(&str, [(f64, f64, f64); 2]); 5] = [
    ("Africa", [(90.0, 30.0, 180.0), (240.0, 45.0, 120.0)]),
    ("Americas", [(120.0, 25.0, 90.0), (270.0, 40.0, 60.0)]),
    ("Asia", [(150.0, 35.0, 70.0), (300.0, 30.0, 40.0)]),
    ("Europe", [(100.0, 20.0, 50.0), (230.0, 35.0, 35.0)]),
    ("Oceania", [(170.0, 30.0, 12.0), (310.0, 25.0, 8.0)]),
];

/// Fraction of confirmed cases that end fatal, lagged by two weeks.
const FATALITY: f64 = 0.03;
const DEATH_LAG_DAYS: f64 = 14.0;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform integer in [lo, hi).
    fn range(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_f64() * (hi - lo) as f64) as usize
    }
}

/// Noisy non-negative count around an expected incidence.
fn noisy_count(rng: &mut SimpleRng, expected: f64) -> f64 {
    rng.gauss(expected, expected.sqrt() + 0.5).round().max(0.0)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let days = 365usize;

    // Each region gets one reporting gap: a run of days with empty cells.
    let gaps: Vec<(usize, usize)> = REGIONS
        .iter()
        .map(|_| {
            let gap_start = rng.range(30, days - 20);
            (gap_start, gap_start + rng.range(3, 11))
        })
        .collect();

    let mut writer = csv::Writer::from_path("sample_outbreak.csv")?;
    writer.write_record([
        "location",
        "date",
        "confirmed_cases",
        "suspected_cases",
        "confirmed_deaths",
    ])?;

    for day in 0..days {
        let date = (start + Duration::days(day as i64)).to_string();
        let mut world = [0.0f64; 3];
        let mut world_reported = false;

        for (region_idx, &(name, waves)) in REGIONS.iter().enumerate() {
            let (gap_start, gap_end) = gaps[region_idx];
            if (gap_start..gap_end).contains(&day) {
                writer.write_record([name, date.as_str(), "", "", ""])?;
                continue;
            }

            let expected: f64 = waves
                .iter()
                .map(|&(peak, width, amp)| wave(day as f64, peak, width, amp))
                .sum();
            let lagged: f64 = waves
                .iter()
                .map(|&(peak, width, amp)| {
                    wave(day as f64 - DEATH_LAG_DAYS, peak, width, amp)
                })
                .sum();

            let confirmed = noisy_count(&mut rng, expected);
            let suspected = noisy_count(&mut rng, expected * 2.4);
            let deaths = noisy_count(&mut rng, lagged * FATALITY);

            world[0] += confirmed;
            world[1] += suspected;
            world[2] += deaths;
            world_reported = true;

            let cells = [
                format!("{confirmed:.0}"),
                format!("{suspected:.0}"),
                format!("{deaths:.0}"),
            ];
            writer.write_record([
                name,
                date.as_str(),
                cells[0].as_str(),
                cells[1].as_str(),
                cells[2].as_str(),
            ])?;
        }

        // World aggregates whatever was reported that day.
        if world_reported {
            let cells = [
                format!("{:.0}", world[0]),
                format!("{:.0}", world[1]),
                format!("{:.0}", world[2]),
            ];
            writer.write_record([
                "World",
                date.as_str(),
                cells[0].as_str(),
                cells[1].as_str(),
                cells[2].as_str(),
            ])?;
        }
    }

    writer.flush()?;
    println!("Wrote sample_outbreak.csv ({days} days, {} regions + World)", REGIONS.len());
    Ok(())
}
