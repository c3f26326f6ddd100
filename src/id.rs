//! Short reference-name suffixes.
//!
//! Identifiers are eight characters drawn from an alphabet without vowels or
//! visually ambiguous glyphs (`0/O`, `1/l/I`, `5/S`, ...), so generated names
//! never spell words and survive being read aloud or retyped.

use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Characters an identifier may contain.
pub const ALPHABET: &[u8] = b"6789BCDFGHJKLMNPQRTWbcdfghjkmnpqrtwz";

/// Length of every generated identifier.
pub const ID_LENGTH: usize = 8;

/// A source of reference-name suffixes.
///
/// Implementations must not hand out the same id twice within one editing
/// session.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random identifier generator that remembers what it already issued.
pub struct IdGenerator {
    rng: StdRng,
    issued: AHashSet<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// A generator with reproducible output, for tests and tooling.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            issued: AHashSet::new(),
        }
    }

    fn draw(&mut self) -> String {
        (0..ID_LENGTH)
            .map(|_| ALPHABET[self.rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> String {
        loop {
            let id = self.draw();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }
}

/// One-off identifier from the thread-local RNG. No session bookkeeping.
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns `true` if `id` has the length and alphabet of a generated id.
pub fn is_generated_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| ALPHABET.contains(&b))
}

/// Builds a reference name by suffixing a fresh id onto a readable prefix.
pub fn reference_name(prefix: &str, ids: &mut dyn IdSource) -> String {
    format!("{}_{}", prefix, ids.next_id())
}
