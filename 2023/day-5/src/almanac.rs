use chumsky::prelude::*;
use miette::*;
use std::fmt;
use std::str::FromStr;

/// The seven conversion tables, declared in the order the almanac chains them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    SeedToSoil,
    SoilToFertilizer,
    FertilizerToWater,
    WaterToLight,
    LightToTemperature,
    TemperatureToHumidity,
    HumidityToLocation,
}

impl Category {
    /// Canonical seed-to-location order.
    pub const ALL: [Category; 7] = [
        Category::SeedToSoil,
        Category::SoilToFertilizer,
        Category::FertilizerToWater,
        Category::WaterToLight,
        Category::LightToTemperature,
        Category::TemperatureToHumidity,
        Category::HumidityToLocation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::SeedToSoil => "seed-to-soil",
            Category::SoilToFertilizer => "soil-to-fertilizer",
            Category::FertilizerToWater => "fertilizer-to-water",
            Category::WaterToLight => "water-to-light",
            Category::LightToTemperature => "light-to-temperature",
            Category::TemperatureToHumidity => "temperature-to-humidity",
            Category::HumidityToLocation => "humidity-to-location",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| miette!("unknown conversion table: {s}"))
    }
}

/// A single `destination source length` line of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub destination: u64,
    pub source: u64,
    pub length: u64,
}

impl Row {
    #[inline]
    fn forward(&self, value: u64) -> Option<u64> {
        (value >= self.source && value - self.source < self.length)
            .then(|| value - self.source + self.destination)
    }

    #[inline]
    fn backward(&self, value: u64) -> Option<u64> {
        (value >= self.destination && value - self.destination < self.length)
            .then(|| value - self.destination + self.source)
    }
}

/// Ordered interval-shift rules. Values no row covers map to themselves, and
/// when source intervals overlap the earliest row wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    rows: Vec<Row>,
}

impl MappingTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn convert(&self, value: u64) -> u64 {
        self.rows
            .iter()
            .find_map(|row| row.forward(value))
            .unwrap_or(value)
    }

    pub fn invert(&self, value: u64) -> u64 {
        self.rows
            .iter()
            .find_map(|row| row.backward(value))
            .unwrap_or(value)
    }

    /// Converts `value` and reports how many consecutive values starting at
    /// it are shifted by the same amount. `u64::MAX` stands for "no bound".
    ///
    /// The run ends where the matched row ends, or where an earlier row
    /// starts and would take over as the first match.
    pub fn convert_run(&self, value: u64) -> (u64, u64) {
        let mut run = u64::MAX;
        for row in &self.rows {
            if let Some(mapped) = row.forward(value) {
                return (mapped, run.min(row.source + row.length - value));
            }
            if row.length > 0 && row.source > value {
                run = run.min(row.source - value);
            }
        }
        (value, run)
    }

    /// Exclusive upper bound of every value a row can produce.
    fn ceiling(&self) -> u64 {
        self.rows
            .iter()
            .map(|row| row.destination + row.length)
            .max()
            .unwrap_or(0)
    }
}

/// The parsed puzzle input: the seed line plus one table per [`Category`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Almanac {
    seeds: Vec<u64>,
    tables: [MappingTable; 7],
}

impl Almanac {
    #[tracing::instrument(skip(input))]
    pub fn parse(input: &str) -> Result<Self> {
        let raw = parser()
            .parse(input)
            .into_result()
            .map_err(|errors| report_parse_errors(input, errors))?;
        raw.validate(input)
    }

    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    pub fn table(&self, category: Category) -> &MappingTable {
        &self.tables[category.index()]
    }

    pub fn location_of(&self, seed: u64) -> u64 {
        Category::ALL
            .iter()
            .fold(seed, |value, &category| self.table(category).convert(value))
    }

    /// Walks a location back through the tables in reverse order.
    pub fn seed_for(&self, location: u64) -> u64 {
        Category::ALL
            .iter()
            .rev()
            .fold(location, |value, &category| self.table(category).invert(value))
    }

    /// Like [`Almanac::location_of`], also returning how many consecutive
    /// seeds from `seed` onward land on consecutive locations.
    pub fn location_run(&self, seed: u64) -> (u64, u64) {
        Category::ALL
            .iter()
            .fold((seed, u64::MAX), |(value, run), &category| {
                let (next, table_run) = self.table(category).convert_run(value);
                (next, run.min(table_run))
            })
    }

    /// Exclusive upper bound on any value a table can shift something into.
    pub fn location_ceiling(&self) -> u64 {
        self.tables
            .iter()
            .map(MappingTable::ceiling)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug)]
struct RawBlock<'a> {
    name: &'a str,
    span: SimpleSpan,
    rows: Vec<Row>,
}

#[derive(Debug)]
struct RawAlmanac<'a> {
    seeds: Vec<u64>,
    blocks: Vec<RawBlock<'a>>,
}

impl RawAlmanac<'_> {
    fn validate(self, input: &str) -> Result<Almanac> {
        let mut tables: [Vec<Row>; 7] = Default::default();

        for block in self.blocks {
            let label = |message: &str| {
                vec![LabeledSpan::at(block.span.start..block.span.end, message)]
            };

            let category = block.name.parse::<Category>().map_err(|_| {
                let known = Category::ALL.map(Category::name).join(", ");
                miette!(
                    labels = label("not one of the seven conversion tables"),
                    help = format!("expected one of: {known}"),
                    "unknown conversion table: {}",
                    block.name
                )
                .with_source_code(input.to_string())
            })?;

            if let Some(row) = block.rows.iter().find(|row| {
                row.source.checked_add(row.length).is_none()
                    || row.destination.checked_add(row.length).is_none()
            }) {
                return Err(miette!(
                    labels = label("in this table"),
                    "row {} {} {} overflows a 64-bit value",
                    row.destination,
                    row.source,
                    row.length
                )
                .with_source_code(input.to_string()));
            }

            // A repeated header extends the table instead of replacing it.
            tables[category.index()].extend(block.rows);
        }

        Ok(Almanac {
            seeds: self.seeds,
            tables: tables.map(MappingTable::new),
        })
    }
}

fn parser<'a>() -> impl Parser<'a, &'a str, RawAlmanac<'a>, extra::Err<Rich<'a, char>>> {
    let spaces = text::inline_whitespace().at_least(1);

    let number = text::int(10).try_map(|digits: &str, span| {
        digits
            .parse::<u64>()
            .map_err(|err| Rich::custom(span, format!("invalid number {digits}: {err}")))
    });

    let seeds = just("seeds:")
        .ignore_then(text::inline_whitespace())
        .ignore_then(
            number
                .clone()
                .separated_by(spaces.clone())
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(text::inline_whitespace());

    let name = any()
        .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '-')
        .repeated()
        .at_least(1)
        .to_slice()
        .map_with(|name, e| (name, e.span()));

    let header = name
        .then_ignore(spaces.clone())
        .then_ignore(just("map:"))
        .then_ignore(text::inline_whitespace());

    let row = number
        .clone()
        .then_ignore(spaces.clone())
        .then(number.clone())
        .then_ignore(spaces)
        .then(number)
        .then_ignore(text::inline_whitespace())
        .map(|((destination, source), length)| Row {
            destination,
            source,
            length,
        });

    let block = header
        .then(text::newline().ignore_then(row).repeated().collect::<Vec<_>>())
        .map(|((name, span), rows)| RawBlock { name, span, rows });

    // One or more line breaks, tolerating whitespace-only lines.
    let breaks = text::inline_whitespace()
        .ignore_then(text::newline())
        .repeated()
        .at_least(1);

    seeds
        .then(breaks.ignore_then(block).repeated().collect::<Vec<_>>())
        .map(|(seeds, blocks)| RawAlmanac { seeds, blocks })
        .padded()
}

fn report_parse_errors(input: &str, errors: Vec<Rich<'_, char>>) -> Report {
    let labels = errors
        .iter()
        .map(|err| LabeledSpan::at(err.span().start..err.span().end, err.to_string()))
        .collect::<Vec<_>>();
    miette!(labels = labels, "failed to parse almanac").with_source_code(input.to_string())
}
