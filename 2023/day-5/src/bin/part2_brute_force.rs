use indicatif::MultiProgress;
use miette::*;

use aoc2023_day_5::part2;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let input = include_str!("../../input2.txt");
    let progress = MultiProgress::new();
    let result = part2::process_brute_force(input, &progress)?;
    println!("Result: {}", result);
    Ok(())
}
