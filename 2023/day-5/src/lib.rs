pub mod almanac;
pub mod search;
pub mod seeds;

pub mod part1;
pub mod part2;
