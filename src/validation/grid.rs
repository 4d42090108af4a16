use crate::booking::availability::GridSpec;
use crate::booking::interval::Interval;
use crate::core::config::BookingConfig;
use crate::core::error::BookingError;
use crate::models::api::GridQuery;
use crate::validation::booking::{parse_date, parse_time};

impl GridQuery {
    /// Resolve the query against configured rooms, hours and granularity
    pub fn to_spec(&self, rules: &BookingConfig) -> Result<GridSpec, BookingError> {
        let date = parse_date(self.date.as_deref())?;

        let window = rules
            .opening_window()
            .map_err(|e| BookingError::Validation(e.to_string()))?;
        let from = match self.from.as_deref() {
            Some(raw) => parse_time("from", raw)?,
            None => window.start(),
        };
        let to = match self.to.as_deref() {
            Some(raw) => parse_time("to", raw)?,
            None => window.end(),
        };
        let window = Interval::new(from, to)
            .map_err(|_| BookingError::Validation("'to' must be later than 'from'".to_string()))?;

        let granularity = match self.granularity.as_deref() {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                BookingError::Validation(format!("granularity '{}' must be a number of minutes", raw))
            })?,
            // A narrowed window is a detail view
            None if self.from.is_some() || self.to.is_some() => rules.detail_granularity,
            None => rules.grid_granularity,
        };

        let rooms = match self.room.as_deref() {
            Some(raw) => {
                let room = raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|r| rules.rooms.contains(r))
                    .ok_or_else(|| BookingError::Validation(format!("room {} does not exist", raw)))?;
                vec![room]
            }
            None => rules.rooms.clone(),
        };

        GridSpec::new(date, rooms, window, granularity).map_err(|e| BookingError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> GridQuery {
        let mut q = GridQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "date" => q.date = value,
                "granularity" => q.granularity = value,
                "from" => q.from = value,
                "to" => q.to = value,
                "room" => q.room = value,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn test_defaults_from_config() {
        let spec = query(&[("date", "2025-01-01")]).to_spec(&BookingConfig::default()).unwrap();
        let expected = GridSpec::new(
            spec.date(),
            vec![1, 2, 3, 4, 5],
            Interval::new("09:00".parse().unwrap(), "22:00".parse().unwrap()).unwrap(),
            60,
        )
        .unwrap();
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_detail_bar_query() {
        let spec = query(&[
            ("date", "2025-01-01"),
            ("granularity", "10"),
            ("from", "13:00"),
            ("to", "14:00"),
            ("room", "2"),
        ])
        .to_spec(&BookingConfig::default())
        .unwrap();
        let expected = GridSpec::new(
            spec.date(),
            vec![2],
            Interval::new("13:00".parse().unwrap(), "14:00".parse().unwrap()).unwrap(),
            10,
        )
        .unwrap();
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_narrowed_window_defaults_to_detail_granularity() {
        let rules = BookingConfig::default();
        let spec = query(&[("date", "2025-01-01"), ("from", "13:00"), ("to", "14:00")])
            .to_spec(&rules)
            .unwrap();
        let expected = GridSpec::new(
            spec.date(),
            vec![1, 2, 3, 4, 5],
            Interval::new("13:00".parse().unwrap(), "14:00".parse().unwrap()).unwrap(),
            rules.detail_granularity,
        )
        .unwrap();
        assert_eq!(spec, expected);

        let spec = query(&[("date", "2025-01-01"), ("to", "12:00")]).to_spec(&rules).unwrap();
        let expected = GridSpec::new(
            spec.date(),
            vec![1, 2, 3, 4, 5],
            Interval::new("09:00".parse().unwrap(), "12:00".parse().unwrap()).unwrap(),
            10,
        )
        .unwrap();
        assert_eq!(spec, expected);
    }

    #[test]
    fn test_rejects_bad_queries() {
        let rules = BookingConfig::default();
        assert!(matches!(query(&[]).to_spec(&rules), Err(BookingError::MissingField("date"))));

        let bad = [
            query(&[("date", "tomorrow")]),
            query(&[("date", "2025-01-01"), ("granularity", "0")]),
            query(&[("date", "2025-01-01"), ("granularity", "ten")]),
            query(&[("date", "2025-01-01"), ("from", "14:00"), ("to", "13:00")]),
            query(&[("date", "2025-01-01"), ("from", "13:00"), ("to", "13:30"), ("granularity", "60")]),
            query(&[("date", "2025-01-01"), ("room", "9")]),
        ];
        for q in bad {
            assert!(matches!(q.to_spec(&rules), Err(BookingError::Validation(_))), "{:?}", q);
        }
    }
}
