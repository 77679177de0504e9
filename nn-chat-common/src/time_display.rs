//! Human-readable creation times for the post listing.
//!
//! Both representations are computed at a fixed UTC offset so the page looks
//! the same no matter which time zone the server host runs in.

use time::{
    Date, Month, OffsetDateTime, UtcDateTime, UtcOffset, error::ComponentRange,
    format_description::BorrowedFormatItem, macros::format_description,
};

const ABSOLUTE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]年[month]月[day]日 [hour]時[minute]分[second]秒");

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct DisplayZone(UtcOffset);

impl DisplayZone {
    /// Asia/Tokyo, which observes no daylight saving time.
    pub const TOKYO: Self = Self(time::macros::offset!(+9));

    pub fn from_whole_hours(hours: i8) -> Result<Self, ComponentRange> {
        Ok(Self(UtcOffset::from_hms(hours, 0, 0)?))
    }

    /// Formats like `2025年10月24日 19時00分00秒`.
    pub fn format_absolute(self, time: UtcDateTime) -> Result<String, time::error::Format> {
        time.to_offset(self.0).format(ABSOLUTE_FORMAT)
    }

    /// Describes `time` relative to `now`, like `3時間前` or `2日後`.
    ///
    /// Thresholds follow the common "from now" conventions: up to 44 seconds
    /// is "a few seconds", up to 89 seconds is one minute, up to 44 minutes
    /// counts minutes, up to 89 minutes is one hour, up to 21 hours counts
    /// hours, up to 35 hours is one day, up to 25 days counts days, up to 45
    /// days is one month, up to 10 months counts months, up to 17 months is
    /// one year, and beyond that years are counted.
    ///
    /// Months are calendar months in this zone, with fractions measured
    /// against the length of the month being crossed. Years are twelve of
    /// those.
    pub fn format_relative(
        self,
        time: UtcDateTime,
        now: UtcDateTime,
    ) -> Result<String, ComponentRange> {
        let difference = now - time;
        let suffix = if difference.is_negative() { "後" } else { "前" };
        let seconds = difference.whole_seconds().unsigned_abs();

        let amount = match short_amount(seconds) {
            Some(amount) => amount,
            None => {
                let months = month_difference(now.to_offset(self.0), time.to_offset(self.0))?;
                long_amount(months.abs())
            }
        };

        Ok(format!("{amount}{suffix}"))
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::TOKYO
    }
}

fn rounded_div(value: u64, divisor: u64) -> u64 {
    (value + divisor / 2) / divisor
}

/// Amounts up to one month, which only need the elapsed seconds.
fn short_amount(seconds: u64) -> Option<String> {
    if seconds <= 44 {
        return Some("数秒".to_owned());
    }
    if seconds <= 89 {
        return Some("1分".to_owned());
    }

    let minutes = rounded_div(seconds, SECONDS_PER_MINUTE);
    if minutes <= 44 {
        return Some(format!("{minutes}分"));
    }
    if minutes <= 89 {
        return Some("1時間".to_owned());
    }

    let hours = rounded_div(seconds, SECONDS_PER_HOUR);
    if hours <= 21 {
        return Some(format!("{hours}時間"));
    }
    if hours <= 35 {
        return Some("1日".to_owned());
    }

    let days = rounded_div(seconds, SECONDS_PER_DAY);
    if days <= 25 {
        return Some(format!("{days}日"));
    }
    if days <= 45 {
        return Some("1ヶ月".to_owned());
    }

    None
}

fn long_amount(months: f64) -> String {
    let rounded_months = months.round();
    if rounded_months <= 10.0 {
        return format!("{rounded_months}ヶ月");
    }
    if rounded_months <= 17.0 {
        return "1年".to_owned();
    }

    let years = (months / 12.0).round();
    format!("{years}年")
}

/// Fractional calendar months from `later` back to `earlier`, positive when
/// `earlier` is in the past.
fn month_difference(later: OffsetDateTime, earlier: OffsetDateTime) -> Result<f64, ComponentRange> {
    if later.day() < earlier.day() {
        return Ok(-month_difference(earlier, later)?);
    }

    let whole_months = (earlier.year() - later.year()) * 12
        + (i32::from(u8::from(earlier.month())) - i32::from(u8::from(later.month())));
    let anchor = add_months(later, whole_months)?;
    let before_anchor = earlier < anchor;
    let neighbour = add_months(later, whole_months + if before_anchor { -1 } else { 1 })?;
    let month_length = if before_anchor {
        anchor - neighbour
    } else {
        neighbour - anchor
    };

    let fraction = (earlier - anchor).as_seconds_f64() / month_length.as_seconds_f64();
    Ok(-(f64::from(whole_months) + fraction))
}

/// Shifts by whole calendar months, clamping the day to the target month.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn add_months(time: OffsetDateTime, months: i32) -> Result<OffsetDateTime, ComponentRange> {
    let month_index = time.year() * 12 + i32::from(u8::from(time.month())) - 1 + months;
    let year = month_index.div_euclid(12);
    // rem_euclid(12) is always in 0..12
    let month = Month::January.nth_next(month_index.rem_euclid(12) as u8);
    let day = time.day().min(time::util::days_in_month(month, year));

    Ok(time.replace_date(Date::from_calendar_date(year, month, day)?))
}
