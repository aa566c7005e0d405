use rand::RngCore;

/// endless stream of uniformly random words
pub fn random_words<'r>(mut rng: impl RngCore + 'r) -> impl Iterator<Item = u8> + 'r {
    std::iter::from_fn(move || Some(rng.next_u32())).flat_map(u32::to_le_bytes)
}

/// uniform pick in `0..=bound` by masked rejection sampling
pub fn next_bound(bound: usize, mut rng: impl RngCore, max_tries: usize) -> usize {
    if bound == 0 {
        return 0;
    }
    let mask = (1usize << (bound.ilog2() + 1)) - 1;
    for _ in 0..max_tries {
        let pick = rng.next_u64() as usize & mask;
        if pick <= bound {
            return pick;
        }
    }
    panic!("too many tries for bound {bound}");
}

#[cfg(test)]
pub fn seeded_rng() -> ([u8; 32], rand::rngs::StdRng) {
    use rand::SeedableRng;
    let mut seed = [0; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    (seed, rand::rngs::StdRng::from_seed(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_bound_stays_in_range() {
        let (seed, mut rng) = seeded_rng();
        for bound in [0, 1, 4, 13, 100] {
            for _ in 0..1000 {
                let pick = next_bound(bound, &mut rng, usize::MAX);
                assert!(pick <= bound, "{pick} > {bound} with seed {seed:?}");
            }
        }
    }

    #[test]
    fn random_words_are_not_constant() {
        let (seed, rng) = seeded_rng();
        let words: Vec<u8> = random_words(rng).take(64).collect();
        assert!(words.iter().any(|&word| word != words[0]), "seed {seed:?}");
    }
}
