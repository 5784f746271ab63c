//! Resolution of parsed phrase components to concrete instants.
//!
//! Pure calendar arithmetic: a `Phrase` plus a reference instant in, zero or
//! more `DateTime<Tz>` values out. An impossible calendar date (february
//! 30th) resolves to nothing, which the recovery controller treats the same
//! as a failed parse.
//!
//! Conventions (documented heuristics, not contracts):
//! - a date without a year resolves in the reference year,
//! - a date-only phrase keeps the reference wall-clock time,
//! - a time-only phrase keeps the reference date,
//! - an inferred bare hour that has already passed is bumped to its next
//!   occurrence: the afternoon for hours up to 12, then the next morning.

use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::grammar::{DateSpec, Direction, Meridiem, Phrase, TimeSpec, Unit};

/// Resolve a parsed phrase against the reference instant.
pub fn resolve(phrase: &Phrase, reference: DateTime<Tz>) -> Vec<DateTime<Tz>> {
    let base = match phrase.date {
        Some(date) => match resolve_date(date, reference) {
            Some(base) => base,
            None => return Vec::new(),
        },
        None => reference,
    };

    match phrase.time {
        None if phrase.date.is_some() => vec![base],
        None => Vec::new(),
        Some(time) => match resolve_time(time, base, reference, phrase.date.is_some()) {
            Some(instant) => vec![instant],
            None => Vec::new(),
        },
    }
}

/// Resolve the date component, keeping the reference wall-clock time.
fn resolve_date(date: DateSpec, reference: DateTime<Tz>) -> Option<DateTime<Tz>> {
    match date {
        DateSpec::Absolute { month, day, year } => {
            let year = year.unwrap_or_else(|| reference.year());
            let target = NaiveDate::from_ymd_opt(year, month, day)?;
            on_date(reference, target)
        }
        DateSpec::DayOffset(offset) => {
            if offset >= 0 {
                reference.checked_add_days(Days::new(offset as u64))
            } else {
                reference.checked_sub_days(Days::new(offset.unsigned_abs()))
            }
        }
        DateSpec::OnWeekday { weekday, direction } => {
            let days = weekday_distance(
                i64::from(reference.weekday().num_days_from_monday()) + 1,
                i64::from(weekday.num_days_from_monday()) + 1,
                direction,
            );
            if days >= 0 {
                reference.checked_add_days(Days::new(days as u64))
            } else {
                reference.checked_sub_days(Days::new(days.unsigned_abs()))
            }
        }
        DateSpec::Shift { amount, unit } => shift(reference, amount, unit),
    }
}

/// Days from the current ISO weekday number to the target one.
///
/// Plain and "coming" weekdays mean the next occurrence (a week out when the
/// target is today); "next" skips a week beyond that; "this" stays within
/// the current week and may be today.
fn weekday_distance(current: i64, target: i64, direction: Option<Direction>) -> i64 {
    let ahead = (target - current + 7) % 7;
    match direction {
        None | Some(Direction::Coming) => {
            if ahead == 0 {
                7
            } else {
                ahead
            }
        }
        Some(Direction::Next) => {
            if ahead == 0 {
                7
            } else {
                ahead + 7
            }
        }
        Some(Direction::This) => ahead,
        Some(Direction::Last) => {
            let behind = (current - target + 7) % 7;
            if behind == 0 {
                -7
            } else {
                -behind
            }
        }
    }
}

fn shift(reference: DateTime<Tz>, amount: i64, unit: Unit) -> Option<DateTime<Tz>> {
    match unit {
        Unit::Minute => reference.checked_add_signed(Duration::minutes(amount)),
        Unit::Hour => reference.checked_add_signed(Duration::hours(amount)),
        Unit::Day => reference.checked_add_signed(Duration::days(amount)),
        Unit::Week => reference.checked_add_signed(Duration::weeks(amount)),
        Unit::Month => shift_months(reference, amount),
        Unit::Year => shift_months(reference, amount.checked_mul(12)?),
    }
}

fn shift_months(reference: DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        reference.checked_add_months(count)
    } else {
        reference.checked_sub_months(count)
    }
}

fn resolve_time(
    time: TimeSpec,
    base: DateTime<Tz>,
    reference: DateTime<Tz>,
    has_date: bool,
) -> Option<DateTime<Tz>> {
    let hour = match time.meridiem {
        Some(meridiem) => to_24_hour(time.hour, meridiem),
        None => time.hour,
    };
    let candidate = at_time(base, hour, time.minute)?;
    if has_date || time.explicit {
        return Some(candidate);
    }

    // Inferred bare hour: prefer the next occurrence. "see you at 5" said in
    // the morning means 17:00; said after 17:00 it means tomorrow morning.
    if candidate > reference {
        return Some(candidate);
    }
    if hour <= 12 {
        if let Some(afternoon) = at_time(base, hour + 12, time.minute) {
            if afternoon > reference {
                return Some(afternoon);
            }
        }
    }
    at_time(candidate.checked_add_days(Days::new(1))?, hour, time.minute)
}

/// 12-hour to 24-hour conversion.
fn to_24_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (hour, meridiem) {
        (12, Meridiem::Am) => 0,
        (h, Meridiem::Am) => h,
        (12, Meridiem::Pm) => 12,
        (h, Meridiem::Pm) => h + 12,
    }
}

fn on_date(reference: DateTime<Tz>, date: NaiveDate) -> Option<DateTime<Tz>> {
    local(reference.timezone(), date, reference.time())
}

fn at_time(base: DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    local(base.timezone(), base.date_naive(), time)
}

fn local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    // earliest() picks the first valid instant across DST gaps/folds
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    // 2024-08-23 was a friday
    fn reference() -> DateTime<Tz> {
        chrono_tz::UTC.with_ymd_and_hms(2024, 8, 23, 9, 0, 0).unwrap()
    }

    fn date_only(date: DateSpec) -> Phrase {
        Phrase { date: Some(date), time: None }
    }

    fn single(phrase: &Phrase) -> DateTime<Tz> {
        let values = resolve(phrase, reference());
        assert_eq!(values.len(), 1, "expected one value for {phrase:?}");
        values[0]
    }

    #[test]
    fn absolute_date_defaults_to_reference_year_and_time() {
        let value = single(&date_only(DateSpec::Absolute { month: 6, day: 20, year: None }));
        assert_eq!(value.to_rfc3339(), "2024-06-20T09:00:00+00:00");
    }

    #[test]
    fn impossible_date_resolves_to_nothing() {
        let phrase = date_only(DateSpec::Absolute { month: 2, day: 30, year: None });
        assert!(resolve(&phrase, reference()).is_empty());
    }

    #[test]
    fn day_offsets() {
        assert_eq!(
            single(&date_only(DateSpec::DayOffset(1))).date_naive().to_string(),
            "2024-08-24"
        );
        assert_eq!(
            single(&date_only(DateSpec::DayOffset(-1))).date_naive().to_string(),
            "2024-08-22"
        );
    }

    #[test]
    fn coming_weekday_is_the_next_occurrence() {
        let phrase = date_only(DateSpec::OnWeekday { weekday: Weekday::Mon, direction: None });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-08-26");
    }

    #[test]
    fn coming_weekday_on_its_own_day_means_next_week() {
        let phrase = date_only(DateSpec::OnWeekday { weekday: Weekday::Fri, direction: None });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-08-30");
    }

    #[test]
    fn next_weekday_skips_a_week() {
        let phrase = date_only(DateSpec::OnWeekday {
            weekday: Weekday::Mon,
            direction: Some(Direction::Next),
        });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-09-02");
    }

    #[test]
    fn last_weekday_goes_backwards() {
        let phrase = date_only(DateSpec::OnWeekday {
            weekday: Weekday::Fri,
            direction: Some(Direction::Last),
        });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-08-16");
    }

    #[test]
    fn this_weekday_can_be_today() {
        let phrase = date_only(DateSpec::OnWeekday {
            weekday: Weekday::Fri,
            direction: Some(Direction::This),
        });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-08-23");
    }

    #[test]
    fn minute_shift_keeps_full_instant() {
        let phrase = date_only(DateSpec::Shift { amount: 30, unit: Unit::Minute });
        assert_eq!(single(&phrase).to_rfc3339(), "2024-08-23T09:30:00+00:00");
    }

    #[test]
    fn month_shift() {
        let phrase = date_only(DateSpec::Shift { amount: 1, unit: Unit::Month });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-09-23");
        let phrase = date_only(DateSpec::Shift { amount: -2, unit: Unit::Month });
        assert_eq!(single(&phrase).date_naive().to_string(), "2024-06-23");
    }

    #[test]
    fn explicit_time_stays_on_the_reference_date() {
        let phrase = Phrase {
            date: None,
            time: Some(TimeSpec {
                hour: 5,
                minute: 0,
                meridiem: Some(Meridiem::Am),
                explicit: true,
            }),
        };
        assert_eq!(single(&phrase).to_rfc3339(), "2024-08-23T05:00:00+00:00");
    }

    #[test]
    fn inferred_hour_bumps_to_the_afternoon() {
        let phrase = Phrase {
            date: None,
            time: Some(TimeSpec { hour: 5, minute: 0, meridiem: None, explicit: false }),
        };
        assert_eq!(single(&phrase).to_rfc3339(), "2024-08-23T17:00:00+00:00");
    }

    #[test]
    fn inferred_hour_still_ahead_stays_today() {
        let phrase = Phrase {
            date: None,
            time: Some(TimeSpec { hour: 11, minute: 0, meridiem: None, explicit: false }),
        };
        assert_eq!(single(&phrase).to_rfc3339(), "2024-08-23T11:00:00+00:00");
    }

    #[test]
    fn meridiem_conversion() {
        assert_eq!(to_24_hour(12, Meridiem::Am), 0);
        assert_eq!(to_24_hour(9, Meridiem::Am), 9);
        assert_eq!(to_24_hour(12, Meridiem::Pm), 12);
        assert_eq!(to_24_hour(7, Meridiem::Pm), 19);
    }

    #[test]
    fn date_with_time_is_never_bumped() {
        let phrase = Phrase {
            date: Some(DateSpec::DayOffset(0)),
            time: Some(TimeSpec { hour: 5, minute: 0, meridiem: None, explicit: false }),
        };
        assert_eq!(single(&phrase).to_rfc3339(), "2024-08-23T05:00:00+00:00");
    }

    #[test]
    fn empty_phrase_resolves_to_nothing() {
        assert!(resolve(&Phrase::default(), reference()).is_empty());
    }
}
