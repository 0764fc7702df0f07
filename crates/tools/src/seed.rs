use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Where the generator seed came from, kept so it can be reported back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Generated(u64),
}

static DRAWS: AtomicU64 = AtomicU64::new(0);

impl SeedChoice {
    pub fn resolve(cli_seed: Option<u64>) -> Self {
        cli_seed.map_or_else(Self::fresh, Self::Cli)
    }

    /// Clock nanoseconds, pid and a per-process draw counter, folded into
    /// one word and finished with the splitmix64 avalanche step.
    fn fresh() -> Self {
        let nanos =
            SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |since| since.as_nanos());
        let draw = DRAWS.fetch_add(1, Ordering::Relaxed);
        let folded = (nanos as u64 ^ (nanos >> 64) as u64)
            .wrapping_add(u64::from(process::id()) << 32)
            .wrapping_add(draw.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        let mut z = folded;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        Self::Generated(z ^ (z >> 31))
    }

    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Generated(seed) => seed,
        }
    }
}
