use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const ELDERLY_NAMES: [&str; 15] = [
    "Tan Ah Kow", "Lim Beng Hock", "Ng Mei Ling", "Ong Siew Hoon", "Chong Ah Leong",
    "Foo Ah Kow", "Lee Bee Hua", "Goh Cheng Siong", "Halimah Yusof", "Raj Kumar",
    "Thomas Ng", "Sophia Tan", "Muthu Rajan", "Ali Bin Hassan", "Jessica Lim",
];

pub const CAREGIVER_NAMES: [&str; 15] = [
    "John Lim", "Melissa Tan", "Raymond Chua", "Elena Koh", "David Ong",
    "Stephanie Ng", "Jason Teo", "Michelle Wong", "Ahmad Ismail", "Vincent Lau",
    "Sharon Ho", "Daniel Goh", "Rachel Chong", "Samuel Toh", "Farah Binte Yusoff",
];

/// Source of every random choice made while synthesizing particulars.
///
/// Each method returns a raw draw; formatting lives in the registration service
/// so a stub only has to supply numbers and names.
pub trait ParticularsGenerator: Send + Sync {
    fn elderly_name(&self) -> &'static str;
    fn caregiver_name(&self) -> &'static str;
    /// Floor in 2..=25
    fn unit_floor(&self) -> u8;
    /// Unit in 1000..=3999
    fn unit_number(&self) -> u16;
    /// Seven digits, 1000000..=9999999
    fn phone_suffix(&self) -> u32;
    /// Four digits, 1000..=9999
    fn password_suffix(&self) -> u16;
}

/// `StdRng`-backed generator. Seed it for reproducible tests.
pub struct RandomGenerator {
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic mid-draw leaves the RNG in a usable state
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *rng)
    }

    fn pick(&self, names: &'static [&'static str]) -> &'static str {
        self.with_rng(|rng| names.choose(rng).copied().unwrap_or(names[0]))
    }
}

impl ParticularsGenerator for RandomGenerator {
    fn elderly_name(&self) -> &'static str {
        self.pick(&ELDERLY_NAMES)
    }

    fn caregiver_name(&self) -> &'static str {
        self.pick(&CAREGIVER_NAMES)
    }

    fn unit_floor(&self) -> u8 {
        self.with_rng(|rng| rng.gen_range(2..=25))
    }

    fn unit_number(&self) -> u16 {
        self.with_rng(|rng| rng.gen_range(1000..=3999))
    }

    fn phone_suffix(&self) -> u32 {
        self.with_rng(|rng| rng.gen_range(1_000_000..=9_999_999))
    }

    fn password_suffix(&self) -> u16 {
        self.with_rng(|rng| rng.gen_range(1000..=9999))
    }
}
