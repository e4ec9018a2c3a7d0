use indicatif::MultiProgress;
use miette::*;

use crate::almanac::Almanac;
use crate::search;
use crate::seeds::seed_ranges;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let almanac = Almanac::parse(input)?;
    let ranges = seed_ranges(almanac.seeds())?;
    let lowest = search::inverse_scan(&almanac, &ranges)
        .ok_or_else(|| miette!("no location maps back into a seed range"))?;
    Ok(lowest.to_string())
}

/// Same answer as [`process`], found by pushing every seed forward with one
/// worker per seed range. Slow on real inputs.
#[tracing::instrument(skip(progress))]
pub fn process_brute_force(input: &str, progress: &MultiProgress) -> Result<String> {
    let almanac = Almanac::parse(input)?;
    let ranges = seed_ranges(almanac.seeds())?;
    let lowest = search::brute_force(&almanac, &ranges, progress)?
        .ok_or_else(|| miette!("every seed range is empty"))?;
    Ok(lowest.to_string())
}
