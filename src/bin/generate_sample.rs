use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use grouplist::{Record, RecordFormat};

/// Write a sample record asset shaped like the bundled `hiring.json`.
#[derive(Parser, Debug)]
struct Args {
    /// Output file; `.csv` writes CSV, anything else JSON.
    #[arg(long, default_value = "assets/hiring.json")]
    out: PathBuf,
    #[arg(long, default_value_t = 1000)]
    count: u64,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    /// Uniform in `0..n`; `n` must be non-zero.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

fn generate(count: u64, seed: u64) -> Vec<Record> {
    let mut rng = SimpleRng::new(seed);

    // Shuffle ids so the asset is not pre-sorted.
    let mut ids: Vec<i64> = (0..count as i64).collect();
    for i in (1..ids.len()).rev() {
        let j = rng.below(i as u64 + 1) as usize;
        ids.swap(i, j);
    }

    ids.into_iter()
        .map(|id| {
            let group_key = rng.below(4) as i64 + 1;
            let label = match rng.below(6) {
                0 | 1 => None,
                2 => Some(String::new()),
                _ => Some(format!("Item {id}")),
            };
            Record {
                id,
                group_key,
                label,
            }
        })
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let records = generate(args.count, args.seed);

    let name = args.out.to_string_lossy();
    let bytes = match RecordFormat::from_name(&name) {
        Ok(RecordFormat::Csv) => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for record in &records {
                writer.serialize(record).context("encoding CSV row")?;
            }
            writer.into_inner().context("flushing CSV")?
        }
        _ => serde_json::to_vec_pretty(&records).context("encoding JSON")?,
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("writing {}", args.out.display()))?;

    println!("Wrote {} records to {}", records.len(), args.out.display());
    Ok(())
}
