//! Writes three sample spreadsheets for manual dashboard runs:
//! `sample_sla.csv`, `sample_FNB_CARD_DRIVERS.csv`, and
//! `sample_GROUP_CRIME_DRIVERS.csv`. Deterministic (fixed seed).

use chrono::NaiveDate;

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
}

/// Daily cost: a base level plus a gentle trend plus noise, floored at zero.
fn cost(rng: &mut SimpleRng, base: f64, trend: f64, day: usize, noise: f64) -> f64 {
    (base + trend * day as f64 + rng.gauss(0.0, noise)).max(0.0)
}

fn write_csv(
    path: &str,
    columns: &[(&str, f64, f64, f64)],
    dates: &[NaiveDate],
    rng: &mut SimpleRng,
) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");

    let mut header = vec!["Date".to_string()];
    header.extend(columns.iter().map(|(name, ..)| name.to_string()));
    writer.write_record(&header).expect("Failed to write header");

    for (day, date) in dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for &(_, base, trend, noise) in columns {
            record.push(format!("{:.2}", cost(rng, base, trend, day, noise)));
        }
        writer.write_record(&record).expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush");
    println!("Wrote {} rows to {path}", dates.len());
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // 90 daily rows starting 2024-01-01.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    let dates: Vec<NaiveDate> = (0..90)
        .map(|i| start + chrono::Days::new(i))
        .collect();

    write_csv(
        "sample_sla.csv",
        &[
            ("FNB Cards", 1200.0, 4.0, 90.0),
            ("Group Crime", 450.0, -1.0, 40.0),
            ("ATM", 760.0, 0.5, 55.0),
            ("Branch Ops", 980.0, 2.0, 70.0),
        ],
        &dates,
        &mut rng,
    );

    write_csv(
        "sample_FNB_CARD_DRIVERS.csv",
        &[
            ("Card Fraud", 520.0, 2.5, 60.0),
            ("Chargebacks", 380.0, 1.0, 35.0),
            ("Skimming", 160.0, 0.2, 25.0),
        ],
        &dates,
        &mut rng,
    );

    write_csv(
        "sample_GROUP_CRIME_DRIVERS.csv",
        &[
            ("Robbery", 210.0, -0.5, 30.0),
            ("Burglary", 120.0, 0.0, 20.0),
            ("Fraud Syndicates", 95.0, 0.3, 15.0),
        ],
        &dates,
        &mut rng,
    );
}
