use anyhow::Result;
use chrono::{Datelike, Local};
use owo_colors::OwoColorize;
use stampcal_core::grouping::stamps_by_day;

use crate::commands::{Context, find_calendar};
use crate::render::{day_line, month_grid, swatch};
use crate::utils::dates::{month_start, parse_month};
use crate::utils::tui::create_spinner;

pub async fn run(ctx: &Context, calendar_key: &str, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let first = match month {
        Some(month) => parse_month(month)?,
        None => month_start(today),
    };

    let session = ctx.session().await?;
    let mirror = session.mirror();

    let spinner = create_spinner("Loading calendar...".to_string());
    let loaded = async {
        let calendars = mirror.reload_calendars().await?;
        let id = find_calendar(&calendars, calendar_key)?.id.clone();
        anyhow::Ok(mirror.select_calendar(&id).await?)
    }
    .await;
    spinner.finish_and_clear();

    let details = loaded?;
    let stamps = mirror.stamps();
    let days = stamps_by_day(&details.events, &stamps);

    println!(
        "{} {}",
        swatch(&details.summary.theme),
        details.summary.title.bold()
    );
    println!();
    print!("{}", month_grid(first, &days, today));

    let in_month: Vec<_> = days
        .iter()
        .filter(|(day, _)| day.year() == first.year() && day.month() == first.month())
        .collect();
    if in_month.is_empty() {
        println!("{}", "No stamps this month.".dimmed());
    } else {
        println!();
        for (day, stamps) in in_month {
            println!("{}", day_line(*day, stamps));
        }
    }
    Ok(())
}
