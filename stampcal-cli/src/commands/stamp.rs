use anyhow::{Context as _, Result};
use chrono::Local;
use owo_colors::OwoColorize;
use stampcal_core::grouping::stamps_by_day;

use crate::commands::{Context, find_calendar, find_stamp};
use crate::render::day_line;
use crate::utils::dates::parse_day;

pub async fn run(
    ctx: &Context,
    calendar_key: &str,
    stamp_key: &str,
    on: Option<&str>,
) -> Result<()> {
    let day = match on {
        Some(input) => parse_day(input)?,
        None => Local::now().date_naive(),
    };

    let session = ctx.session().await?;
    let mirror = session.mirror();

    let calendars = mirror.reload_calendars().await?;
    let calendar = find_calendar(&calendars, calendar_key)?;
    let stamps = mirror.stamps();
    let stamp = find_stamp(&stamps, stamp_key)?;

    // Select first so the new event lands in the cached details.
    mirror.select_calendar(&calendar.id).await?;
    mirror
        .create_event(&calendar.id, &stamp.id, day)
        .await
        .with_context(|| format!("Failed to stamp {} in {}", day, calendar.title))?;

    println!(
        "{}",
        format!("Stamped {} {} on {}", stamp.emoji, stamp.name, day).green()
    );

    if let Some(details) = mirror.selected_calendar() {
        let stamps = mirror.stamps();
        if let Some(on_day) = stamps_by_day(&details.events, &stamps).get(&day) {
            println!("{}", day_line(day, on_day));
        }
    }
    Ok(())
}
