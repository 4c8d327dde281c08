//! Departure / arrival time resolution
//!
//! Turns whatever the model passed as a time (epoch seconds or a phrase like
//! "3:30pm tomorrow") into absolute epoch seconds. Anything that cannot be
//! understood resolves to `None`, meaning "no time constraint", instead of
//! failing the whole tool call.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Resolve a time argument against the current clock
pub fn resolve(value: &Value, local_timezone: Option<&str>) -> Option<i64> {
    resolve_at(value, local_timezone, Utc::now())
}

/// Resolve a time argument with an explicit "now", used for relative phrases
/// and for filling in the date when only a time of day is given.
pub fn resolve_at(value: &Value, local_timezone: Option<&str>, now: DateTime<Utc>) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => parse_time_expression(s, timezone(local_timezone), now),
        _ => None,
    }
}

/// Look up an IANA zone name, falling back to UTC
pub fn timezone(name: Option<&str>) -> Tz {
    name.and_then(|n| n.trim().parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Parse a free-form date/time phrase to epoch seconds
pub fn parse_time_expression(input: &str, tz: Tz, now: DateTime<Utc>) -> Option<i64> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.timestamp());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return localize(naive, tz, None);
        }
    }

    let parts = FuzzyParts::scan(input)?;
    let today = now.with_timezone(&tz).date_naive();
    let naive = parts.to_naive(today)?;
    localize(naive, tz, parts.offset)
}

fn localize(naive: NaiveDateTime, tz: Tz, offset: Option<FixedOffset>) -> Option<i64> {
    match offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.timestamp()),
        None => match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.timestamp()),
            // Wall time skipped by a forward transition: keep the offset in
            // effect before the gap.
            LocalResult::None => tz
                .from_local_datetime(&(naive - Duration::hours(1)))
                .earliest()
                .map(|dt| dt.timestamp() + 3600),
        },
    }
}

/// Everything a fuzzy scan picked out of a phrase; unset fields default
#[derive(Debug, Default, PartialEq)]
struct FuzzyParts {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    weekday: Option<Weekday>,
    day_shift: Option<i64>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    offset: Option<FixedOffset>,
}

struct Patterns {
    offset: Regex,
    iso_date: Regex,
    slash_date: Regex,
    clock_12h: Regex,
    clock_24h: Regex,
    ordinal: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        offset: Regex::new(r"(?:^|\s)(?:utc|gmt)?([+-])(\d{1,2})(?::?(\d{2}))?(?:\s|$)")
            .expect("valid offset regex"),
        iso_date: Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex"),
        slash_date: Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b")
            .expect("valid slash date regex"),
        clock_12h: Regex::new(r"\b(\d{1,2})(?::(\d{2}))?(?::(\d{2}))?\s*([ap])\.?m\b\.?")
            .expect("valid 12h clock regex"),
        clock_24h: Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").expect("valid 24h clock regex"),
        ordinal: Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)$").expect("valid ordinal regex"),
    })
}

fn capture_u32(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn month_from_word(word: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    if word == "sept" {
        return Some(9);
    }
    MONTHS
        .iter()
        .position(|m| *m == word || (word.len() == 3 && m.starts_with(word)))
        .map(|idx| idx as u32 + 1)
}

fn weekday_from_word(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

impl FuzzyParts {
    /// Scan a phrase, skipping words that mean nothing as a date.
    /// Returns `None` when no date or time token was found at all.
    fn scan(input: &str) -> Option<Self> {
        let p = patterns();
        let mut parts = FuzzyParts::default();
        let mut text = input.to_lowercase().replace(',', " ");

        if let Some(caps) = p.offset.captures(&text) {
            let sign = if &caps[1] == "-" { -1 } else { 1 };
            let hours = capture_u32(&caps, 2)? as i32;
            let minutes = capture_u32(&caps, 3).unwrap_or(0) as i32;
            parts.offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60));
        }
        text = p.offset.replace(&text, " ").into_owned();

        if let Some(caps) = p.iso_date.captures(&text) {
            parts.year = caps[1].parse().ok();
            parts.month = capture_u32(&caps, 2);
            parts.day = capture_u32(&caps, 3);
        } else if let Some(caps) = p.slash_date.captures(&text) {
            parts.month = capture_u32(&caps, 1);
            parts.day = capture_u32(&caps, 2);
            parts.year = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok()).map(|y| {
                if y < 100 {
                    2000 + y
                } else {
                    y
                }
            });
        }
        text = p.iso_date.replace(&text, " ").into_owned();
        text = p.slash_date.replace(&text, " ").into_owned();

        if let Some(caps) = p.clock_12h.captures(&text) {
            let hour = capture_u32(&caps, 1)?;
            if !(1..=12).contains(&hour) {
                return None;
            }
            let pm = &caps[4] == "p";
            parts.hour = Some(match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            });
            parts.minute = capture_u32(&caps, 2);
            parts.second = capture_u32(&caps, 3);
        } else if let Some(caps) = p.clock_24h.captures(&text) {
            parts.hour = capture_u32(&caps, 1);
            parts.minute = capture_u32(&caps, 2);
            parts.second = capture_u32(&caps, 3);
        }
        text = p.clock_12h.replace(&text, " ").into_owned();
        text = p.clock_24h.replace(&text, " ").into_owned();

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            match word {
                "today" | "tonight" => parts.day_shift = Some(0),
                "tomorrow" => parts.day_shift = Some(1),
                "yesterday" => parts.day_shift = Some(-1),
                "noon" if parts.hour.is_none() => parts.hour = Some(12),
                "midnight" if parts.hour.is_none() => parts.hour = Some(0),
                "utc" | "gmt" | "z" if parts.offset.is_none() => {
                    parts.offset = FixedOffset::east_opt(0)
                }
                _ => {
                    if let Some(month) = month_from_word(word) {
                        parts.month.get_or_insert(month);
                    } else if let Some(weekday) = weekday_from_word(word) {
                        parts.weekday = Some(weekday);
                    } else if let Some(caps) = p.ordinal.captures(word) {
                        parts.day.get_or_insert(capture_u32(&caps, 1)?);
                    } else if word.chars().all(|c| c.is_ascii_digit()) {
                        parts.push_number(word);
                    }
                }
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts)
        }
    }

    fn push_number(&mut self, word: &str) {
        let Ok(n) = word.parse::<u32>() else {
            return;
        };
        if word.len() == 4 {
            self.year.get_or_insert(n as i32);
        } else if word.len() <= 2 && self.day.is_none() && (1..=31).contains(&n) {
            self.day = Some(n);
        } else if word.len() <= 2 && self.year.is_none() {
            self.year = Some(2000 + n as i32);
        }
    }

    fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.weekday.is_none()
            && self.day_shift.is_none()
            && self.hour.is_none()
    }

    fn has_explicit_date(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some()
    }

    fn to_naive(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        let date = if self.has_explicit_date() {
            NaiveDate::from_ymd_opt(
                self.year.unwrap_or(today.year()),
                self.month.unwrap_or(today.month()),
                self.day.unwrap_or(today.day()),
            )?
        } else {
            let mut date = today + Duration::days(self.day_shift.unwrap_or(0));
            if let Some(weekday) = self.weekday {
                let ahead = (7 + weekday.num_days_from_monday() as i64
                    - date.weekday().num_days_from_monday() as i64)
                    % 7;
                date += Duration::days(ahead);
            }
            date
        };
        let time = NaiveTime::from_hms_opt(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )?;
        Some(date.and_time(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Thursday 2025-03-27 12:00:00 UTC
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 27, 12, 0, 0).unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp()
    }

    #[test]
    fn test_epoch_integers_pass_through() {
        for t in [0_i64, 1, 1_700_000_000, -86_400, i64::MAX] {
            assert_eq!(resolve(&json!(t), None), Some(t));
        }
    }

    #[test]
    fn test_floats_truncate() {
        assert_eq!(resolve(&json!(1_700_000_000.9), None), Some(1_700_000_000));
        assert_eq!(resolve(&json!(-1.5), None), Some(-1));
    }

    #[test]
    fn test_empty_and_other_types() {
        assert_eq!(resolve(&Value::Null, None), None);
        assert_eq!(resolve(&json!(""), None), None);
        assert_eq!(resolve(&json!("   "), None), None);
        assert_eq!(resolve(&json!(true), None), None);
        assert_eq!(resolve(&json!(["5pm"]), None), None);
        assert_eq!(resolve(&json!({"at": "5pm"}), None), None);
    }

    #[test]
    fn test_unparseable_strings_are_none() {
        for s in ["banana", "not a time", "soonish please", "25:99", "13pm", "!!!"] {
            assert_eq!(resolve_at(&json!(s), None, now()), None, "{s}");
        }
    }

    #[test]
    fn test_time_of_day_uses_today() {
        assert_eq!(resolve_at(&json!("5:00pm"), None, now()), Some(utc(2025, 3, 27, 17, 0)));
        assert_eq!(resolve_at(&json!("3:30 pm"), None, now()), Some(utc(2025, 3, 27, 15, 30)));
        assert_eq!(resolve_at(&json!("9am"), None, now()), Some(utc(2025, 3, 27, 9, 0)));
        assert_eq!(resolve_at(&json!("12am"), None, now()), Some(utc(2025, 3, 27, 0, 0)));
        assert_eq!(resolve_at(&json!("14:45"), None, now()), Some(utc(2025, 3, 27, 14, 45)));
        assert_eq!(resolve_at(&json!("noon"), None, now()), Some(utc(2025, 3, 27, 12, 0)));
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(
            resolve_at(&json!("3:30pm tomorrow"), None, now()),
            Some(utc(2025, 3, 28, 15, 30))
        );
        assert_eq!(
            resolve_at(&json!("yesterday at 8:15 a.m."), None, now()),
            Some(utc(2025, 3, 26, 8, 15))
        );
    }

    #[test]
    fn test_full_date_phrase() {
        assert_eq!(
            resolve_at(&json!("2:30pm Monday, March 29th, 2025"), None, now()),
            Some(utc(2025, 3, 29, 14, 30))
        );
        assert_eq!(
            resolve_at(&json!("Dec 1 2025 7pm"), None, now()),
            Some(utc(2025, 12, 1, 19, 0))
        );
        assert_eq!(
            resolve_at(&json!("4/2/2025 10:00"), None, now()),
            Some(utc(2025, 4, 2, 10, 0))
        );
    }

    #[test]
    fn test_weekday_moves_forward() {
        // now is a Thursday
        assert_eq!(
            resolve_at(&json!("friday 9am"), None, now()),
            Some(utc(2025, 3, 28, 9, 0))
        );
        assert_eq!(
            resolve_at(&json!("thursday 9am"), None, now()),
            Some(utc(2025, 3, 27, 9, 0))
        );
        assert_eq!(
            resolve_at(&json!("next monday 8am"), None, now()),
            Some(utc(2025, 3, 31, 8, 0))
        );
    }

    #[test]
    fn test_local_timezone_attached() {
        // New York is on EDT (UTC-4) after March 9th 2025
        assert_eq!(
            resolve_at(&json!("3:30pm tomorrow"), Some("America/New_York"), now()),
            Some(utc(2025, 3, 28, 19, 30))
        );
        // unknown zone falls back to UTC
        assert_eq!(
            resolve_at(&json!("3:30pm tomorrow"), Some("Mars/Olympus"), now()),
            Some(utc(2025, 3, 28, 15, 30))
        );
    }

    #[test]
    fn test_explicit_offsets_win() {
        assert_eq!(
            resolve_at(&json!("2025-03-29T14:30:00+02:00"), Some("America/New_York"), now()),
            Some(utc(2025, 3, 29, 12, 30))
        );
        assert_eq!(
            resolve_at(&json!("5pm UTC"), Some("Europe/Paris"), now()),
            Some(utc(2025, 3, 27, 17, 0))
        );
        assert_eq!(
            resolve_at(&json!("5pm -05:00"), None, now()),
            Some(utc(2025, 3, 27, 22, 0))
        );
    }

    #[test]
    fn test_hour_only_offsets() {
        let march_first = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            resolve_at(&json!("5pm utc+2"), None, march_first),
            Some(utc(2025, 3, 1, 15, 0))
        );
        assert_eq!(
            resolve_at(&json!("5pm +2"), Some("America/New_York"), march_first),
            Some(utc(2025, 3, 1, 15, 0))
        );
        assert_eq!(
            resolve_at(&json!("9am +0530"), None, march_first),
            Some(utc(2025, 3, 1, 3, 30))
        );
    }

    #[test]
    fn test_spring_forward_gap_uses_offset_before_transition() {
        // 02:00-03:00 does not exist in New York on 2025-03-09; EST (UTC-5) applies
        assert_eq!(
            resolve_at(&json!("2025-03-09 02:30"), Some("America/New_York"), now()),
            Some(utc(2025, 3, 9, 7, 30))
        );
        assert_eq!(
            resolve_at(&json!("2:30am March 9th 2025"), Some("America/New_York"), now()),
            Some(utc(2025, 3, 9, 7, 30))
        );
    }

    #[test]
    fn test_fall_back_fold_takes_earliest() {
        // 01:30 happens twice in New York on 2025-11-02; the EDT instant comes first
        assert_eq!(
            resolve_at(&json!("2025-11-02 01:30"), Some("America/New_York"), now()),
            Some(utc(2025, 11, 2, 5, 30))
        );
    }

    #[test]
    fn test_naive_iso() {
        assert_eq!(
            resolve_at(&json!("2025-03-29 08:00"), Some("Europe/London"), now()),
            Some(utc(2025, 3, 29, 8, 0))
        );
    }
}
