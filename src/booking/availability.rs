use crate::booking::interval::{Interval, TimeOfDay};
use crate::booking::schedule::ExpandedBlock;
use crate::models::reservation::Reservation;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridSpecError {
    #[error("granularity must be greater than 0 minutes")]
    ZeroGranularity,

    #[error("granularity of {granularity} minutes exceeds the {window} minute window")]
    GranularityTooLarge { granularity: u16, window: u16 },

    #[error("at least one room is required")]
    NoRooms,
}

/// Which rooms, which part of the day, and how finely to slice it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSpec {
    date: NaiveDate,
    rooms: Vec<u32>,
    window: Interval,
    granularity: u16,
}

impl GridSpec {
    pub fn new(
        date: NaiveDate,
        rooms: Vec<u32>,
        window: Interval,
        granularity: u16,
    ) -> Result<Self, GridSpecError> {
        if granularity == 0 {
            return Err(GridSpecError::ZeroGranularity);
        }
        if granularity > window.duration_minutes() {
            return Err(GridSpecError::GranularityTooLarge {
                granularity,
                window: window.duration_minutes(),
            });
        }
        if rooms.is_empty() {
            return Err(GridSpecError::NoRooms);
        }

        Ok(Self {
            date,
            rooms,
            window,
            granularity,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Free,
    Reserved,
    Class,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub room: u32,
    pub state: CellState,
    /// Names on every reservation touching this bucket. More than one means
    /// the store holds overlapping bookings; they are shown, not hidden.
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub cells: Vec<Cell>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    pub date: NaiveDate,
    pub granularity_minutes: u16,
    pub rooms: Vec<u32>,
    pub rows: Vec<GridRow>,
}

/// Classify every (room, bucket) cell of the grid.
///
/// Class blocks win over reservations. Each bucket is tested on its own with
/// the same overlap predicate used for booking validation; the last bucket is
/// clipped to the window end when the granularity does not divide it.
pub fn compute_grid(
    spec: &GridSpec,
    blocks: &[ExpandedBlock],
    reservations: &[Reservation],
) -> Grid {
    let day_blocks: Vec<&ExpandedBlock> = blocks.iter().filter(|b| b.date == spec.date).collect();
    let day_reservations: Vec<(&Reservation, Interval)> = reservations
        .iter()
        .filter(|r| r.date == spec.date)
        .filter_map(|r| r.interval().map(|iv| (r, iv)))
        .collect();

    let window_end = spec.window.end();
    let mut rows = Vec::new();
    let mut cursor = spec.window.start();

    while cursor < window_end {
        let next = TimeOfDay::from_minutes(cursor.minutes() + spec.granularity)
            .map_or(window_end, |t| t.min(window_end));
        let Ok(bucket) = Interval::new(cursor, next) else {
            break;
        };

        let cells = spec
            .rooms
            .iter()
            .map(|&room| classify(room, &bucket, &day_blocks, &day_reservations))
            .collect();

        rows.push(GridRow {
            start: bucket.start(),
            end: bucket.end(),
            cells,
        });

        cursor = next;
    }

    Grid {
        date: spec.date,
        granularity_minutes: spec.granularity,
        rooms: spec.rooms.clone(),
        rows,
    }
}

fn classify(
    room: u32,
    bucket: &Interval,
    blocks: &[&ExpandedBlock],
    reservations: &[(&Reservation, Interval)],
) -> Cell {
    let in_class = blocks
        .iter()
        .any(|b| b.room == room && b.interval.overlaps(bucket));

    let labels: Vec<String> = reservations
        .iter()
        .filter(|(r, iv)| r.room == room && iv.overlaps(bucket))
        .map(|(r, _)| r.student.clone())
        .collect();

    let state = if in_class {
        CellState::Class
    } else if !labels.is_empty() {
        CellState::Reserved
    } else {
        CellState::Free
    };

    Cell { room, state, labels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::schedule::ClassSchedule;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn iv(start: &str, end: &str) -> Interval {
        Interval::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    fn reservation(id: u64, room: u32, start: &str, end: &str, student: &str) -> Reservation {
        Reservation {
            id,
            room,
            date: date("2025-01-01"),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            student: student.to_string(),
            manage_code: "1000".to_string(),
        }
    }

    fn state_at(grid: &Grid, row: usize, room_idx: usize) -> CellState {
        grid.rows[row].cells[room_idx].state
    }

    #[test]
    fn test_spec_validation() {
        let d = date("2025-01-01");
        assert_eq!(
            GridSpec::new(d, vec![1], iv("09:00", "10:00"), 0),
            Err(GridSpecError::ZeroGranularity)
        );
        assert_eq!(
            GridSpec::new(d, vec![], iv("09:00", "10:00"), 10),
            Err(GridSpecError::NoRooms)
        );
        assert!(matches!(
            GridSpec::new(d, vec![1], iv("09:00", "10:00"), 90),
            Err(GridSpecError::GranularityTooLarge { .. })
        ));
    }

    #[test]
    fn test_hourly_grid_shape() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1, 2, 3], iv("09:00", "22:00"), 60).unwrap();
        let grid = compute_grid(&spec, &[], &[]);

        assert_eq!(grid.rows.len(), 13);
        assert_eq!(grid.rows[0].start.to_string(), "09:00");
        assert_eq!(grid.rows[12].end.to_string(), "22:00");
        assert!(grid
            .rows
            .iter()
            .all(|row| row.cells.len() == 3 && row.cells.iter().all(|c| c.state == CellState::Free)));
    }

    #[test]
    fn test_reservation_marks_every_touched_bucket() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("09:00", "12:00"), 60).unwrap();
        let reservations = vec![reservation(1, 1, "09:30", "10:10", "Mina")];
        let grid = compute_grid(&spec, &[], &reservations);

        assert_eq!(state_at(&grid, 0, 0), CellState::Reserved);
        assert_eq!(state_at(&grid, 1, 0), CellState::Reserved);
        assert_eq!(state_at(&grid, 2, 0), CellState::Free);
        assert_eq!(grid.rows[0].cells[0].labels, vec!["Mina".to_string()]);
    }

    #[test]
    fn test_touching_end_does_not_mark_next_bucket() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("09:00", "11:00"), 60).unwrap();
        let reservations = vec![reservation(1, 1, "09:00", "10:00", "Mina")];
        let grid = compute_grid(&spec, &[], &reservations);

        assert_eq!(state_at(&grid, 0, 0), CellState::Reserved);
        assert_eq!(state_at(&grid, 1, 0), CellState::Free);
    }

    #[test]
    fn test_class_beats_reservation() {
        let schedule = ClassSchedule::parse("3,2,17:00,19:00").unwrap();
        let blocks = schedule.blocks_on(date("2025-01-01"));
        let reservations = vec![reservation(1, 2, "16:30", "17:30", "Jun")];
        let spec = GridSpec::new(date("2025-01-01"), vec![1, 2], iv("16:00", "20:00"), 60).unwrap();
        let grid = compute_grid(&spec, &blocks, &reservations);

        // 16:00 reserved, 17:00 and 18:00 class, 19:00 free
        assert_eq!(state_at(&grid, 0, 1), CellState::Reserved);
        assert_eq!(state_at(&grid, 1, 1), CellState::Class);
        assert_eq!(state_at(&grid, 2, 1), CellState::Class);
        assert_eq!(state_at(&grid, 3, 1), CellState::Free);
        // room 1 untouched
        assert!(grid.rows.iter().all(|row| row.cells[0].state == CellState::Free));
    }

    #[test]
    fn test_partial_hour_class_blocks_whole_bucket() {
        let schedule = ClassSchedule::parse("3,1,10:30,11:15").unwrap();
        let blocks = schedule.blocks_on(date("2025-01-01"));
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("10:00", "12:00"), 60).unwrap();
        let grid = compute_grid(&spec, &blocks, &[]);

        assert_eq!(state_at(&grid, 0, 0), CellState::Class);
        assert_eq!(state_at(&grid, 1, 0), CellState::Class);
    }

    #[test]
    fn test_ten_minute_detail_bar() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("13:00", "14:00"), 10).unwrap();
        let reservations = vec![reservation(1, 1, "13:20", "13:40", "Mina")];
        let grid = compute_grid(&spec, &[], &reservations);

        let states: Vec<CellState> = grid.rows.iter().map(|r| r.cells[0].state).collect();
        assert_eq!(
            states,
            vec![
                CellState::Free,
                CellState::Free,
                CellState::Reserved,
                CellState::Reserved,
                CellState::Free,
                CellState::Free,
            ]
        );
    }

    #[test]
    fn test_overlapping_store_data_is_visualized() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("13:00", "14:00"), 60).unwrap();
        let reservations = vec![
            reservation(1, 1, "13:00", "14:00", "Mina"),
            reservation(2, 1, "13:30", "14:00", "Jun"),
        ];
        let grid = compute_grid(&spec, &[], &reservations);

        assert_eq!(grid.rows[0].cells[0].labels, vec!["Mina".to_string(), "Jun".to_string()]);
    }

    #[test]
    fn test_uneven_granularity_clips_last_bucket() {
        let spec = GridSpec::new(date("2025-01-01"), vec![1], iv("09:00", "10:00"), 25).unwrap();
        let grid = compute_grid(&spec, &[], &[]);

        assert_eq!(grid.rows.len(), 3);
        assert_eq!(grid.rows[2].start.to_string(), "09:50");
        assert_eq!(grid.rows[2].end.to_string(), "10:00");
    }

    #[test]
    fn test_other_dates_ignored() {
        let spec = GridSpec::new(date("2025-01-02"), vec![1], iv("13:00", "14:00"), 60).unwrap();
        let reservations = vec![reservation(1, 1, "13:00", "14:00", "Mina")];
        let grid = compute_grid(&spec, &[], &reservations);

        assert_eq!(state_at(&grid, 0, 0), CellState::Free);
    }
}
