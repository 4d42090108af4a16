use crate::booking::interval::{has_conflict, Interval, TimeOfDay};
use crate::booking::schedule::ExpandedBlock;
use crate::models::reservation::Reservation;
use chrono::NaiveDate;
use thiserror::Error;

/// The room/date/time a caller wants to book
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookingSlot {
    pub room: u32,
    pub date: NaiveDate,
    pub interval: Interval,
}

/// Why a slot cannot be booked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    #[error("Room {room} is reserved for a class from {start} to {end}")]
    ClassBlock {
        room: u32,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("The requested time overlaps an existing reservation ({start} - {end})")]
    Reservation {
        id: u64,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

/// Check a slot against class blocks first, then existing reservations.
///
/// Only entries for the slot's room and date are considered. The first
/// overlap found is reported.
pub fn find_conflict(
    slot: &BookingSlot,
    blocks: &[ExpandedBlock],
    reservations: &[Reservation],
) -> Option<Conflict> {
    let block_hit = blocks
        .iter()
        .filter(|b| b.room == slot.room && b.date == slot.date)
        .find(|b| b.interval.overlaps(&slot.interval));

    if let Some(block) = block_hit {
        return Some(Conflict::ClassBlock {
            room: block.room,
            start: block.interval.start(),
            end: block.interval.end(),
        });
    }

    let same_slot: Vec<(&Reservation, Interval)> = reservations
        .iter()
        .filter(|r| r.room == slot.room && r.date == slot.date)
        .filter_map(|r| r.interval().map(|iv| (r, iv)))
        .collect();

    if !has_conflict(same_slot.iter().map(|(_, iv)| iv), &slot.interval) {
        return None;
    }

    same_slot
        .iter()
        .find(|(_, iv)| iv.overlaps(&slot.interval))
        .map(|(r, _)| Conflict::Reservation {
            id: r.id,
            start: r.start,
            end: r.end,
        })
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

    fn reservation(id: u64, room: u32, day: &str, start: &str, end: &str) -> Reservation {
        Reservation {
            id,
            room,
            date: date(day),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            student: format!("student-{id}"),
            manage_code: "1000".to_string(),
        }
    }

    fn slot(room: u32, day: &str, start: &str, end: &str) -> BookingSlot {
        BookingSlot {
            room,
            date: date(day),
            interval: iv(start, end),
        }
    }

    #[test]
    fn test_overlapping_reservation_conflicts() {
        let existing = vec![reservation(1, 1, "2025-01-01", "13:00", "14:00")];
        let conflict = find_conflict(&slot(1, "2025-01-01", "13:30", "14:30"), &[], &existing);
        assert!(matches!(conflict, Some(Conflict::Reservation { id: 1, .. })));
    }

    #[test]
    fn test_touching_reservation_is_fine() {
        let existing = vec![reservation(1, 1, "2025-01-01", "09:00", "10:00")];
        assert_eq!(find_conflict(&slot(1, "2025-01-01", "10:00", "11:00"), &[], &existing), None);
    }

    #[test]
    fn test_other_room_or_date_ignored() {
        let existing = vec![
            reservation(1, 2, "2025-01-01", "13:00", "14:00"),
            reservation(2, 1, "2025-01-02", "13:00", "14:00"),
        ];
        assert_eq!(find_conflict(&slot(1, "2025-01-01", "13:00", "14:00"), &[], &existing), None);
    }

    #[test]
    fn test_class_block_conflicts_on_matching_weekday() {
        let schedule = ClassSchedule::parse("3,2,17:00,19:00").unwrap();

        // 2025-01-01 and 2025-01-15 are both Wednesdays
        for day in ["2025-01-01", "2025-01-15"] {
            let blocks = schedule.blocks_on(date(day));
            let conflict = find_conflict(&slot(2, day, "18:00", "18:30"), &blocks, &[]);
            assert_eq!(
                conflict,
                Some(Conflict::ClassBlock {
                    room: 2,
                    start: "17:00".parse().unwrap(),
                    end: "19:00".parse().unwrap(),
                })
            );
        }

        // Thursday, or a different room, is free
        let thursday = schedule.blocks_on(date("2025-01-02"));
        assert_eq!(find_conflict(&slot(2, "2025-01-02", "18:00", "18:30"), &thursday, &[]), None);
        let wednesday = schedule.blocks_on(date("2025-01-01"));
        assert_eq!(find_conflict(&slot(1, "2025-01-01", "18:00", "18:30"), &wednesday, &[]), None);
    }

    #[test]
    fn test_class_block_reported_before_reservation() {
        let schedule = ClassSchedule::parse("3,2,17:00,19:00").unwrap();
        let blocks = schedule.blocks_on(date("2025-01-01"));
        let existing = vec![reservation(9, 2, "2025-01-01", "16:30", "17:30")];

        let conflict = find_conflict(&slot(2, "2025-01-01", "16:45", "17:15"), &blocks, &existing);
        assert!(matches!(conflict, Some(Conflict::ClassBlock { .. })));
    }

    #[test]
    fn test_conflict_messages() {
        let c = Conflict::ClassBlock {
            room: 2,
            start: "17:00".parse().unwrap(),
            end: "19:00".parse().unwrap(),
        };
        assert_eq!(c.to_string(), "Room 2 is reserved for a class from 17:00 to 19:00");
    }
}
