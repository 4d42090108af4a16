use crate::booking::interval::TimeOfDay;
use crate::models::reservation::Reservation;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

/// WAL operation types
#[derive(Debug, Clone, PartialEq)]
pub enum WalOperation {
    AddReservation(Reservation),
    RemoveReservation { id: u64 },
    /// Floor for the id sequence, written on compaction
    Sequence { next_id: u64 },
}

// Student names are free text, so they are hex-encoded to keep the `|`
// separator unambiguous.
impl fmt::Display for WalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalOperation::AddReservation(r) => write!(
                f,
                "ADD|{}|{}|{}|{}|{}|{}|{}",
                r.id,
                r.room,
                r.date.format("%Y-%m-%d"),
                r.start,
                r.end,
                r.manage_code,
                hex::encode(r.student.as_bytes())
            ),
            WalOperation::RemoveReservation { id } => write!(f, "REMOVE|{}", id),
            WalOperation::Sequence { next_id } => write!(f, "SEQ|{}", next_id),
        }
    }
}

impl FromStr for WalOperation {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.first() {
            Some(&"ADD") => {
                if parts.len() != 8 {
                    bail!("Invalid ADD format");
                }
                let id = parse_id(parts[1])?;
                let room = parts[2].parse::<u32>().context("Invalid room")?;
                let date = NaiveDate::parse_from_str(parts[3], "%Y-%m-%d").context("Invalid date")?;
                let start = parts[4].parse::<TimeOfDay>().context("Invalid start time")?;
                let end = parts[5].parse::<TimeOfDay>().context("Invalid end time")?;
                let manage_code = parts[6].to_string();
                let student_bytes = hex::decode(parts[7]).context("Invalid student hex")?;
                let student = String::from_utf8(student_bytes).context("Student name is not UTF-8")?;

                Ok(WalOperation::AddReservation(Reservation {
                    id,
                    room,
                    date,
                    start,
                    end,
                    student,
                    manage_code,
                }))
            }
            Some(&"REMOVE") => {
                if parts.len() != 2 {
                    bail!("Invalid REMOVE format");
                }
                let id = parse_id(parts[1])?;
                Ok(WalOperation::RemoveReservation { id })
            }
            Some(&"SEQ") => {
                if parts.len() != 2 {
                    bail!("Invalid SEQ format");
                }
                let next_id = parts[1].parse::<u64>().context("Invalid sequence value")?;
                Ok(WalOperation::Sequence { next_id })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

// The sequence needs room for `id + 1`, so the largest u64 is never a valid id
fn parse_id(raw: &str) -> Result<u64> {
    let id = raw.parse::<u64>().context("Invalid reservation ID")?;
    if id == u64::MAX {
        bail!("Reservation ID out of range");
    }
    Ok(id)
}

/// Append-only line journal of reservation changes
pub struct Wal {
    file: Mutex<File>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = open_append(&path)?;

        Ok(Wal {
            file: Mutex::new(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one operation and flush it before returning
    pub fn log_operation(&self, op: &WalOperation) -> Result<()> {
        let mut file = self.file.lock().map_err(|_| anyhow!("WAL lock poisoned"))?;
        writeln!(file, "{}", op).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            match line.parse::<WalOperation>() {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    /// Replace the journal contents with `operations`.
    ///
    /// The new contents are written to a sibling file and renamed over the
    /// journal, so a crash mid-rewrite leaves the old journal intact.
    pub fn rewrite(&self, operations: &[WalOperation]) -> Result<()> {
        let mut file = self.file.lock().map_err(|_| anyhow!("WAL lock poisoned"))?;

        let tmp_path = self.path.with_extension("compact");
        {
            let mut tmp = File::create(&tmp_path).context("Failed to create compacted WAL")?;
            for op in operations {
                writeln!(tmp, "{}", op).context("Failed to write compacted WAL")?;
            }
            tmp.sync_all().context("Failed to sync compacted WAL")?;
        }

        fs::rename(&tmp_path, &self.path).context("Failed to replace WAL")?;
        *file = open_append(&self.path)?;
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .context("Failed to open WAL file")
}
