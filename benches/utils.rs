use rand::{Rng, SeedableRng, rngs::StdRng};

/// Generate n prefixes of `source`, cut at random points
pub fn generate_random_prefixes(source: &str, n: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(42); // Fixed seed for reproducibility
    let mut prefixes = Vec::with_capacity(n);

    for _ in 0..n {
        let mut end = rng.random_range(0..=source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        prefixes.push(source.get(..end).unwrap_or_default().to_owned());
    }

    prefixes
}
