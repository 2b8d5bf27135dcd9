use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::Context;

pub async fn run(ctx: &Context, id: &str) -> Result<()> {
    let session = ctx.session().await?;

    let Some(stamped) = session.mirror().event_with_stamp(id).await? else {
        anyhow::bail!("Event '{}' not found", id);
    };

    let day = stamped
        .event
        .day()
        .map_or_else(|| stamped.event.date.clone(), |d| d.to_string());
    println!("{} {}  {}", stamped.stamp.emoji, stamped.stamp.name.bold(), day);
    println!(
        "{}",
        format!(
            "event {} · calendar {} · stamp {}",
            stamped.event.id, stamped.event.calendar_id, stamped.stamp.id
        )
        .dimmed()
    );
    Ok(())
}
