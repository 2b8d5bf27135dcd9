use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{Datelike, Months, NaiveDate};
use owo_colors::OwoColorize;
use stampcal_core::{EventStamp, Theme};

const WEEKDAYS: &str = " Mo  Tu  We  Th  Fr  Sa  Su";

/// Color block for a theme token; plain when the token is not a color.
pub fn swatch(theme: &str) -> String {
    match Theme::parse(theme) {
        Ok(theme) => {
            let (r, g, b) = theme.rgb();
            "██".truecolor(r, g, b).to_string()
        }
        Err(_) => "██".to_string(),
    }
}

/// `2024-05-01  🏃 Run, 📚 Read`
pub fn day_line(day: NaiveDate, stamps: &[&EventStamp]) -> String {
    let stamps: Vec<String> = stamps
        .iter()
        .map(|s| format!("{} {}", s.emoji, s.name))
        .collect();
    format!("{}  {}", day, stamps.join(", "))
}

/// Month grid, Monday first. Each week is two rows: day numbers, then the
/// first stamp placed on that day (`+` when there are more).
pub fn month_grid(
    first: NaiveDate,
    days: &BTreeMap<NaiveDate, Vec<&EventStamp>>,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:^28}", first.format("%B %Y").to_string());
    let _ = writeln!(out, "{}", WEEKDAYS.dimmed());

    let Some(next) = first.checked_add_months(Months::new(1)) else {
        return out;
    };
    let offset = first.weekday().num_days_from_monday() as usize;
    let month_days: Vec<NaiveDate> = first.iter_days().take_while(|d| *d < next).collect();

    let mut cells: Vec<Option<NaiveDate>> = vec![None; offset];
    cells.extend(month_days.into_iter().map(Some));

    for week in cells.chunks(7) {
        let mut numbers = String::new();
        let mut marks = String::new();

        for cell in week {
            match cell {
                Some(day) => {
                    let number = format!("{:>3}", day.day());
                    if *day == today {
                        let _ = write!(numbers, "{} ", number.reversed());
                    } else {
                        let _ = write!(numbers, "{number} ");
                    }
                    marks.push_str(&mark(days.get(day).map(Vec::as_slice)));
                }
                None => {
                    numbers.push_str("    ");
                    marks.push_str("    ");
                }
            }
        }

        let _ = writeln!(out, "{}", numbers.trim_end());
        let _ = writeln!(out, "{}", marks.trim_end());
    }
    out
}

fn mark(stamps: Option<&[&EventStamp]>) -> String {
    match stamps {
        Some([only]) => format!(" {} ", only.emoji),
        Some([first, ..]) => format!(" {}+", first.emoji),
        _ => "    ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(name: &str, emoji: &str) -> EventStamp {
        EventStamp {
            id: name.to_lowercase(),
            name: name.into(),
            emoji: emoji.into(),
            owner_id: "u1".into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_line_lists_stamps_in_order() {
        let run = stamp("Run", "🏃");
        let read = stamp("Read", "📚");

        assert_eq!(
            day_line(date(2024, 5, 1), &[&run, &read]),
            "2024-05-01  🏃 Run, 📚 Read"
        );
    }

    #[test]
    fn grid_has_two_rows_per_week() {
        let days = BTreeMap::new();
        // May 2024 starts on a Wednesday and spans five weeks.
        let grid = month_grid(date(2024, 5, 1), &days, date(2000, 1, 1));
        let lines: Vec<&str> = grid.lines().collect();

        assert!(lines[0].contains("May 2024"));
        assert_eq!(lines.len(), 2 + 5 * 2);
        assert_eq!(lines[2], "          1   2   3   4   5");
        assert!(lines[10].ends_with("31"));
    }

    #[test]
    fn grid_marks_stamped_days() {
        let run = stamp("Run", "🏃");
        let read = stamp("Read", "📚");
        let mut days = BTreeMap::new();
        days.insert(date(2024, 5, 1), vec![&run]);
        days.insert(date(2024, 5, 2), vec![&read, &run]);

        let grid = month_grid(date(2024, 5, 1), &days, date(2000, 1, 1));

        assert!(grid.contains(" 🏃 "));
        assert!(grid.contains(" 📚+"));
    }

    #[test]
    fn mark_for_unstamped_day_is_blank() {
        assert_eq!(mark(None), "    ");
        assert_eq!(mark(Some(&[])), "    ");
    }
}
