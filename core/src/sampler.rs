use crate::catalog::Catalog;
use crate::models::{CategoryFilter, Video};

/// Source of randomness for grid sampling and the demo counters.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform-ish integer in `0..bound`; `bound` of 0 yields 0.
    fn below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (self.next_u64() % bound as u64) as usize
    }
}

/// xorshift64 generator; deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        Self { state: seed.wrapping_add(0x9E37_79B9_7F4A_7C15) | 1 }
    }

    pub fn from_entropy() -> Self {
        let mut buf = [0u8; 8];
        let seed = match getrandom::getrandom(&mut buf) {
            Ok(()) => u64::from_le_bytes(buf),
            Err(e) => {
                log::warn!("getrandom failed ({}), seeding from clock", e);
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or_default()
            }
        };
        Self::new(seed)
    }
}

impl RandomSource for XorShift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// Fisher-Yates shuffle.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}

/// Up to `count` distinct catalog entries matching `filter`, in sampled order.
pub fn sample<'a>(catalog: &'a Catalog, count: usize, filter: &CategoryFilter, rng: &mut dyn RandomSource) -> Vec<&'a Video> {
    let mut pool: Vec<&Video> = catalog.filtered(filter).collect();
    shuffle(&mut pool, rng);
    pool.truncate(count);
    pool
}

/// Up to `count` entries other than `current_id`.
pub fn sample_related<'a>(catalog: &'a Catalog, current_id: &str, count: usize, rng: &mut dyn RandomSource) -> Vec<&'a Video> {
    let mut pool: Vec<&Video> = catalog.videos().iter().filter(|v| v.id != current_id).collect();
    shuffle(&mut pool, rng);
    pool.truncate(count);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_with_small_count_is_distinct() {
        let mut rng = XorShift64::new(7);
        let picked = sample(Catalog::builtin(), 5, &CategoryFilter::All, &mut rng);
        assert_eq!(picked.len(), 5);
        let ids: HashSet<_> = picked.iter().map(|v| &v.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn oversized_count_returns_every_entry_once() {
        let mut rng = XorShift64::new(99);
        let picked = sample(Catalog::builtin(), 50, &CategoryFilter::All, &mut rng);
        assert_eq!(picked.len(), Catalog::builtin().len());
        let ids: HashSet<_> = picked.iter().map(|v| &v.id).collect();
        assert_eq!(ids.len(), Catalog::builtin().len());
    }

    #[test]
    fn category_filter_is_exact() {
        let mut rng = XorShift64::new(3);
        let tech = CategoryFilter::Only("Tech".into());
        let picked = sample(Catalog::builtin(), 5, &tech, &mut rng);
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|v| v.category == "Tech"));
        assert!(sample(Catalog::builtin(), 5, &CategoryFilter::Only("tech".into()), &mut rng).is_empty());
    }

    #[test]
    fn sample_outlives_the_filter() {
        let mut rng = XorShift64::new(5);
        let picked = {
            let filter = CategoryFilter::from_tag("History");
            sample(Catalog::builtin(), 5, &filter, &mut rng)
        };
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().all(|v| v.category == "History"));
    }

    #[test]
    fn same_seed_same_sample() {
        let a: Vec<_> = sample(Catalog::builtin(), 6, &CategoryFilter::All, &mut XorShift64::new(42)).iter().map(|v| v.id.clone()).collect();
        let b: Vec<_> = sample(Catalog::builtin(), 6, &CategoryFilter::All, &mut XorShift64::new(42)).iter().map(|v| v.id.clone()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn related_excludes_current() {
        let mut rng = XorShift64::new(1);
        let picked = sample_related(Catalog::builtin(), "v4", 20, &mut rng);
        assert_eq!(picked.len(), 11);
        assert!(picked.iter().all(|v| v.id != "v4"));
    }
}
