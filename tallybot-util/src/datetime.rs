use std::fmt::Write;

use time::{format_description::FormatItem, macros::format_description};

pub const NAIVE_DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DurationFormat {
    /// `1 hour and 2 minutes`
    #[default]
    Long,
    /// `1h 2m`
    Short,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimeUnit {
    Year,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub const ALL: [Self; 6] = [
        Self::Year,
        Self::Week,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
    ];

    fn seconds(self) -> u64 {
        match self {
            Self::Year => 365 * 24 * 60 * 60,
            Self::Week => 7 * 24 * 60 * 60,
            Self::Day => 24 * 60 * 60,
            Self::Hour => 60 * 60,
            Self::Minute => 60,
            Self::Second => 1,
        }
    }

    fn short(self) -> char {
        match self {
            Self::Year => 'y',
            Self::Week => 'w',
            Self::Day => 'd',
            Self::Hour => 'h',
            Self::Minute => 'm',
            Self::Second => 's',
        }
    }

    fn long(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Week => "week",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SecondsFormat<'u> {
    pub format: DurationFormat,
    pub include_zero_units: bool,
    /// Units to display; empty means all of them.
    pub only_units: &'u [TimeUnit],
}

/// Format a duration given in seconds, e.g. `1 hour, 5 minutes and 3 seconds`.
///
/// Time of units that are not displayed is carried over into the next smaller
/// displayed unit.
pub fn format_seconds(seconds: u64, options: &SecondsFormat<'_>) -> String {
    let units: Vec<TimeUnit> = if options.only_units.is_empty() {
        TimeUnit::ALL.to_vec()
    } else {
        let mut units = options.only_units.to_vec();
        units.sort_unstable();
        units.dedup();

        units
    };

    let mut remaining = seconds;
    let mut parts = Vec::with_capacity(units.len());

    for &unit in units.iter() {
        let count = remaining / unit.seconds();
        remaining %= unit.seconds();

        if count > 0 || options.include_zero_units {
            parts.push(format_part(count, unit, options.format));
        }
    }

    if parts.is_empty() {
        // Only reachable for a duration smaller than the smallest unit
        let smallest = units.last().copied().unwrap_or(TimeUnit::Second);

        return format_part(0, smallest, options.format);
    }

    match options.format {
        DurationFormat::Short => parts.join(" "),
        DurationFormat::Long => match parts.split_last() {
            Some((last, [])) => last.to_owned(),
            Some((last, init)) => format!("{} and {last}", init.join(", ")),
            None => String::new(),
        },
    }
}

fn format_part(count: u64, unit: TimeUnit, format: DurationFormat) -> String {
    let mut part = String::new();

    let _ = match format {
        DurationFormat::Short => write!(part, "{count}{}", unit.short()),
        DurationFormat::Long if count == 1 => write!(part, "1 {}", unit.long()),
        DurationFormat::Long => write!(part, "{count} {}s", unit.long()),
    };

    part
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long(seconds: u64) -> String {
        format_seconds(seconds, &SecondsFormat::default())
    }

    #[test]
    fn long_joins_with_and() {
        assert_eq!(long(1), "1 second");
        assert_eq!(long(62), "1 minute and 2 seconds");
        assert_eq!(long(3600 + 120 + 3), "1 hour, 2 minutes and 3 seconds");
    }

    #[test]
    fn short_joins_with_spaces() {
        let options = SecondsFormat {
            format: DurationFormat::Short,
            ..Default::default()
        };

        assert_eq!(format_seconds(8 * 86_400 + 30, &options), "1w 1d 30s");
    }

    #[test]
    fn zero_units_included() {
        let options = SecondsFormat {
            format: DurationFormat::Short,
            include_zero_units: true,
            only_units: &[TimeUnit::Hour, TimeUnit::Minute, TimeUnit::Second],
        };

        assert_eq!(format_seconds(3600 + 5, &options), "1h 0m 5s");
    }

    #[test]
    fn unselected_units_carry_over() {
        let options = SecondsFormat {
            only_units: &[TimeUnit::Minute],
            ..Default::default()
        };

        assert_eq!(format_seconds(2 * 3600 + 59, &options), "120 minutes");
    }

    #[test]
    fn zero_duration() {
        assert_eq!(long(0), "0 seconds");

        let options = SecondsFormat {
            format: DurationFormat::Short,
            only_units: &[TimeUnit::Day, TimeUnit::Hour],
            ..Default::default()
        };

        assert_eq!(format_seconds(59, &options), "0h");
    }
}
