use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;

/// Seeded random number generator for reproducible field generation
#[derive(Clone)]
pub struct FieldRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl FieldRng {
    /// Create a new FieldRng with an optional seed
    /// If seed is None, generates a random seed
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use rand::thread_rng;
            thread_rng().gen()
        });

        let rng = ChaCha8Rng::seed_from_u64(seed);
        FieldRng { rng, seed }
    }

    /// Get the seed used for this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random integer in range [0, max)
    pub fn random_below(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..max)
    }
}
