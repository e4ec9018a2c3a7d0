use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use miette::*;
use rayon::prelude::*;
use std::ops::Range;
use std::time::Instant;

use crate::almanac::Almanac;

/// How many seeds (or locations) pass between progress updates.
const PROGRESS_STEP: u64 = 1_000_000;

/// Lowest location over a flat list of seeds.
pub fn flat_minimum(almanac: &Almanac) -> Option<u64> {
    almanac
        .seeds()
        .iter()
        .map(|&seed| almanac.location_of(seed))
        .min()
}

/// Pushes every seed of every range through the tables, one rayon task per
/// range, and keeps the overall lowest location.
#[tracing::instrument(skip(almanac, progress))]
pub fn brute_force(
    almanac: &Almanac,
    ranges: &[Range<u64>],
    progress: &MultiProgress,
) -> Result<Option<u64>> {
    let style = ProgressStyle::with_template(
        "{prefix:>24} [{elapsed_precise}] {wide_bar:.cyan/blue} {human_pos}/{human_len} ({eta})",
    )
    .into_diagnostic()?;

    let bars = ranges
        .iter()
        .map(|range| {
            let bar = ProgressBar::new(range.end.saturating_sub(range.start))
                .with_style(style.clone())
                .with_prefix(format!("{}..{}", range.start, range.end));
            progress.add(bar)
        })
        .collect::<Vec<_>>();

    let minimum = ranges
        .par_iter()
        .zip(bars.par_iter())
        .filter_map(|(range, bar)| scan_range(almanac, range.clone(), bar))
        .min();

    Ok(minimum)
}

fn scan_range(almanac: &Almanac, range: Range<u64>, bar: &ProgressBar) -> Option<u64> {
    let started = Instant::now();
    let mut minimum: Option<u64> = None;

    for seed in range.clone() {
        let location = almanac.location_of(seed);
        minimum = Some(minimum.map_or(location, |lowest| lowest.min(location)));

        if (seed - range.start + 1) % PROGRESS_STEP == 0 {
            bar.inc(PROGRESS_STEP);
        }
    }

    bar.finish();
    tracing::info!(
        start = range.start,
        end = range.end,
        ?minimum,
        elapsed = ?started.elapsed(),
        "seed range scanned"
    );
    minimum
}

/// Counts locations up from zero and returns the first one whose inverse
/// lands inside a seed range and maps forward onto that same location.
///
/// Inverting picks the first row whose destination covers a value, so only
/// one preimage per location is tried. A value outside every destination
/// passes back unchanged even when a source row would move it forward, which
/// is why each candidate seed is pushed forward again before it counts.
/// Tables with colliding destinations can still hide the true answer;
/// [`stride_scan`] has no such restriction.
#[tracing::instrument(skip(almanac))]
pub fn inverse_scan(almanac: &Almanac, ranges: &[Range<u64>]) -> Option<u64> {
    let highest_seed = ranges
        .iter()
        .filter(|range| !range.is_empty())
        .map(|range| range.end)
        .max()?;
    // Identity keeps a value where it is and every row shifts below its own
    // destination end, so no location can reach this.
    let ceiling = highest_seed.max(almanac.location_ceiling());

    (0..ceiling).find(|&location| {
        if location % PROGRESS_STEP == 0 {
            tracing::debug!(millions = location / PROGRESS_STEP, "inverse scan");
        }
        let seed = almanac.seed_for(location);
        ranges.iter().any(|range| range.contains(&seed))
            && almanac.location_of(seed) == location
    })
}

/// Exact forward scan that visits one seed per run of seeds sharing the same
/// rows through every table. Within a run locations grow with the seed, so
/// the run's first seed is its lowest.
#[tracing::instrument(skip(almanac))]
pub fn stride_scan(almanac: &Almanac, ranges: &[Range<u64>]) -> Option<u64> {
    ranges
        .iter()
        .filter_map(|range| {
            let mut seed = range.start;
            let mut minimum: Option<u64> = None;
            while seed < range.end {
                let (location, run) = almanac.location_run(seed);
                minimum = Some(minimum.map_or(location, |lowest| lowest.min(location)));
                seed = seed.saturating_add(run);
            }
            minimum
        })
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    use indicatif::ProgressDrawTarget;
    use rstest::rstest;

    use crate::seeds::seed_ranges;

    const SAMPLE: &str = include_str!("../input2.txt");

    const OVERLAPPING: &str = "seeds: 5 35 90 25

seed-to-soil map:
100 10 10
200 5 10
0 30 3

soil-to-fertilizer map:
5 100 4
300 205 3

humidity-to-location map:
1 210 5
";

    fn hidden() -> MultiProgress {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn enumerate(almanac: &Almanac, ranges: &[Range<u64>]) -> Option<u64> {
        ranges
            .iter()
            .flat_map(|range| range.clone())
            .map(|seed| almanac.location_of(seed))
            .min()
    }

    #[test]
    fn flat_sample() -> Result<()> {
        let almanac = Almanac::parse(SAMPLE)?;
        assert_eq!(flat_minimum(&almanac), Some(35));
        Ok(())
    }

    #[test]
    fn strategies_agree_on_sample() -> Result<()> {
        let almanac = Almanac::parse(SAMPLE)?;
        let ranges = seed_ranges(almanac.seeds())?;
        assert_eq!(brute_force(&almanac, &ranges, &hidden())?, Some(46));
        assert_eq!(inverse_scan(&almanac, &ranges), Some(46));
        assert_eq!(stride_scan(&almanac, &ranges), Some(46));
        Ok(())
    }

    #[rstest]
    #[case(vec![5..10], 200)]
    #[case(vec![7..8], 202)]
    #[case(vec![14..30, 33..60], 20)]
    #[case(vec![12..31, 203..209], 0)]
    #[case(vec![33..1000], 1)]
    fn brute_force_matches_enumeration(
        #[case] ranges: Vec<Range<u64>>,
        #[case] lowest: u64,
    ) -> Result<()> {
        let almanac = Almanac::parse(OVERLAPPING)?;
        assert_eq!(enumerate(&almanac, &ranges), Some(lowest));
        assert_eq!(brute_force(&almanac, &ranges, &hidden())?, Some(lowest));
        assert_eq!(stride_scan(&almanac, &ranges), Some(lowest));
        Ok(())
    }

    #[test]
    fn per_range_minimum_is_combined() -> Result<()> {
        let almanac = Almanac::parse(SAMPLE)?;
        assert_eq!(brute_force(&almanac, &[55..68], &hidden())?, Some(56));
        assert_eq!(brute_force(&almanac, &[79..93], &hidden())?, Some(46));
        assert_eq!(brute_force(&almanac, &[55..68, 79..93], &hidden())?, Some(46));
        Ok(())
    }

    #[test]
    fn empty_ranges_have_no_answer() -> Result<()> {
        let almanac = Almanac::parse(SAMPLE)?;
        let ranges = [10..10];
        assert_eq!(brute_force(&almanac, &ranges, &hidden())?, None);
        assert_eq!(inverse_scan(&almanac, &ranges), None);
        assert_eq!(stride_scan(&almanac, &ranges), None);
        Ok(())
    }

    #[rstest]
    #[case("seeds: 5 1\n\nseed-to-soil map:\n100 0 10\n", 105)]
    #[case("seeds: 0 5 12 3\n\nseed-to-soil map:\n10 0 10\n0 10 10\n", 2)]
    #[case(
        "seeds: 3 4\n\nseed-to-soil map:\n20 0 10\n\nsoil-to-fertilizer map:\n0 20 5\n",
        3
    )]
    #[case(
        "seeds: 40 10\n\nwater-to-light map:\n0 45 5\n45 0 45\n\nhumidity-to-location map:\n7 0 3\n",
        3
    )]
    fn inverse_scan_only_accepts_reachable_locations(
        #[case] input: &str,
        #[case] lowest: u64,
    ) -> Result<()> {
        // Destinations overlap other rows' sources, so an unchanged inverse
        // can sit on a seed that actually maps somewhere else.
        let almanac = Almanac::parse(input)?;
        let ranges = seed_ranges(almanac.seeds())?;
        assert_eq!(enumerate(&almanac, &ranges), Some(lowest));
        assert_eq!(inverse_scan(&almanac, &ranges), Some(lowest));
        assert_eq!(stride_scan(&almanac, &ranges), Some(lowest));
        Ok(())
    }

    #[test]
    fn inverse_scan_misses_shadowed_preimages() -> Result<()> {
        // Seed 0 and seed 50 both reach 50; inverting 50 only ever finds 0.
        let almanac = Almanac::parse("seeds: 50 1\n\nseed-to-soil map:\n50 0 10\n")?;
        let ranges = seed_ranges(almanac.seeds())?;
        assert_eq!(stride_scan(&almanac, &ranges), Some(50));
        assert_eq!(inverse_scan(&almanac, &ranges), None);
        Ok(())
    }
}
