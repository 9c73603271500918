use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::domain::models::{DateSet, ScrapeMode};
use crate::errors::PlanError;

/// How many days ahead of today the booking service publishes slots
pub const PLANNING_HORIZON_DAYS: i64 = 21;

/// Expand a scrape mode into the concrete dates to query, relative to `today`
pub fn plan_dates(mode: &ScrapeMode, today: NaiveDate) -> Result<DateSet, PlanError> {
    let dates = match mode {
        ScrapeMode::Weekend => upcoming_days(today).filter(is_weekend).collect(),
        ScrapeMode::All => upcoming_days(today).collect(),
        ScrapeMode::Single(date) => {
            ensure_in_window(*date, today)?;
            vec![*date]
        }
    };
    Ok(DateSet::from_sorted(dates))
}

/// The planning window (today, today + horizon]
fn upcoming_days(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (1..=PLANNING_HORIZON_DAYS).map(move |offset| today + Duration::days(offset))
}

fn is_weekend(date: &NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

fn ensure_in_window(date: NaiveDate, today: NaiveDate) -> Result<(), PlanError> {
    let last = today + Duration::days(PLANNING_HORIZON_DAYS);
    if date <= today || date > last {
        return Err(PlanError::OutOfRange {
            date,
            horizon_days: PLANNING_HORIZON_DAYS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekend_dates_are_fri_sat_sun_inside_window() {
        let start = day(2025, 6, 2);
        for shift in 0..7 {
            let today = start + Duration::days(shift);
            let dates = plan_dates(&ScrapeMode::Weekend, today).unwrap();

            assert_eq!(dates.len(), 9, "three full weekends for {}", today);
            for date in dates.iter() {
                assert!(is_weekend(date), "{} is not a weekend day", date);
                let offset = (*date - today).num_days();
                assert!((1..=PLANNING_HORIZON_DAYS).contains(&offset));
            }
            assert!(dates.as_slice().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_weekend_from_a_thursday() {
        let dates = plan_dates(&ScrapeMode::Weekend, day(2025, 6, 5)).unwrap();
        assert_eq!(&dates.as_slice()[..3], &[day(2025, 6, 6), day(2025, 6, 7), day(2025, 6, 8)]);
    }

    #[test]
    fn test_all_is_21_consecutive_days() {
        let today = day(2025, 12, 20);
        let dates = plan_dates(&ScrapeMode::All, today).unwrap();

        assert_eq!(dates.len(), 21);
        assert_eq!(dates.as_slice()[0], day(2025, 12, 21));
        assert_eq!(dates.as_slice()[20], day(2026, 1, 10));
        assert!(dates
            .as_slice()
            .windows(2)
            .all(|w| w[1] - w[0] == Duration::days(1)));
    }

    #[test]
    fn test_single_inside_window() {
        let today = day(2025, 6, 1);
        for offset in [1, 10, 21] {
            let target = today + Duration::days(offset);
            let dates = plan_dates(&ScrapeMode::Single(target), today).unwrap();
            assert_eq!(dates.as_slice(), &[target]);
        }
    }

    #[test]
    fn test_single_outside_window_is_out_of_range() {
        let today = day(2025, 6, 1);
        for offset in [-30, -1, 0, 22, 100] {
            let target = today + Duration::days(offset);
            let err = plan_dates(&ScrapeMode::Single(target), today).unwrap_err();
            assert!(matches!(err, PlanError::OutOfRange { date, .. } if date == target));
        }
    }
}
