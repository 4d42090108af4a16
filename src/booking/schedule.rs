use crate::booking::interval::{Interval, TimeOfDay};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::path::Path;

/// ISO weekday number of a date: 1 = Monday ... 7 = Sunday
pub fn weekday_of(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// A recurring weekly occupation of a room by a class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassBlock {
    pub weekday: u8,
    pub room: u32,
    pub interval: Interval,
}

/// A class block placed on a concrete date
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExpandedBlock {
    pub weekday: u8,
    pub room: u32,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub interval: Interval,
}

/// Weekly class timetable, loaded once at startup and read-only afterwards
#[derive(Clone, Debug, Default)]
pub struct ClassSchedule {
    blocks: Vec<ClassBlock>,
}

impl ClassSchedule {
    pub fn new(blocks: Vec<ClassBlock>) -> Self {
        Self { blocks }
    }

    /// Load the schedule from a `weekday,room,start,end` CSV file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read class schedule: {}", path.display()))?;

        Self::parse(&content)
            .context(format!("Failed to parse class schedule: {}", path.display()))
    }

    /// Parse CSV rows. Blank lines and `#` comments are ignored, as is a
    /// leading header row starting with `weekday`. Any other malformed row is
    /// an error.
    pub fn parse(content: &str) -> Result<Self> {
        let mut blocks = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();

            if blocks.is_empty() && fields[0].eq_ignore_ascii_case("weekday") {
                continue;
            }

            let block = parse_row(&fields).context(format!("line {}", line_num + 1))?;
            blocks.push(block);
        }

        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[ClassBlock] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks that apply on `date`, ordered by (room, start)
    pub fn blocks_on(&self, date: NaiveDate) -> Vec<ExpandedBlock> {
        let weekday = weekday_of(date);

        let mut expanded: Vec<ExpandedBlock> = self
            .blocks
            .iter()
            .filter(|b| b.weekday == weekday)
            .map(|b| ExpandedBlock {
                weekday,
                room: b.room,
                date,
                interval: b.interval,
            })
            .collect();

        expanded.sort_by_key(|b| (b.room, b.interval.start(), b.interval.end()));
        expanded
    }
}

fn parse_row(fields: &[&str]) -> Result<ClassBlock> {
    if fields.len() != 4 {
        bail!("expected 4 columns (weekday,room,start,end), got {}", fields.len());
    }

    let weekday: u8 = fields[0]
        .parse()
        .context(format!("invalid weekday '{}'", fields[0]))?;
    if !(1..=7).contains(&weekday) {
        bail!("weekday must be between 1 and 7, got {}", weekday);
    }

    let room: u32 = fields[1]
        .parse()
        .context(format!("invalid room '{}'", fields[1]))?;
    if room == 0 {
        bail!("room must be a positive integer");
    }

    let start: TimeOfDay = fields[2].parse()?;
    let end: TimeOfDay = fields[3].parse()?;
    let interval = Interval::new(start, end)?;

    Ok(ClassBlock {
        weekday,
        room,
        interval,
    })
}
