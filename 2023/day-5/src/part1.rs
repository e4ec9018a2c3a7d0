use miette::*;

use crate::almanac::Almanac;
use crate::search;

#[tracing::instrument]
pub fn process(input: &str) -> Result<String> {
    let almanac = Almanac::parse(input)?;
    let lowest = search::flat_minimum(&almanac).ok_or_else(|| miette!("no seeds listed"))?;
    Ok(lowest.to_string())
}
