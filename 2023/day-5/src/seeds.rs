use itertools::Itertools;
use miette::*;
use std::ops::Range;

/// Reads the seed line as `start length` pairs, yielding half-open ranges.
pub fn seed_ranges(seeds: &[u64]) -> Result<Vec<Range<u64>>> {
    if let [unpaired] = seeds.chunks_exact(2).remainder() {
        bail!(
            help = "seed ranges are written as `start length` pairs",
            "odd number of seed values, {unpaired} has no length"
        );
    }

    seeds
        .iter()
        .copied()
        .tuples()
        .map(|(start, length)| {
            start
                .checked_add(length)
                .map(|end| start..end)
                .ok_or_else(|| miette!("seed range {start} {length} overflows a 64-bit value"))
        })
        .collect()
}
