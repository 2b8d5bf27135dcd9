use anyhow::Result;
use owo_colors::OwoColorize;
use stampcal_core::validation::DEFAULT_STAMP_EMOJI;

use crate::commands::Context;

pub async fn list(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;

    // The load on open only logs failures; retry so the error is reported.
    let mirror = session.mirror();
    let stamps = if mirror.stamps_loaded() {
        mirror.stamps()
    } else {
        mirror.reload_stamps().await?
    };
    if stamps.is_empty() {
        println!("No stamps yet. Create one with:\n  stampcal new-stamp <name> --emoji <emoji>");
        return Ok(());
    }

    for stamp in stamps.iter() {
        println!("{}  {}  {}", stamp.emoji, stamp.name, stamp.id.dimmed());
    }
    Ok(())
}

pub async fn new(ctx: &Context, name: &str, emoji: Option<String>) -> Result<()> {
    let session = ctx.session().await?;
    let emoji = emoji.as_deref().unwrap_or(DEFAULT_STAMP_EMOJI);

    let stamp = session.mirror().create_stamp(name, emoji).await?;
    println!(
        "{}",
        format!("Created stamp: {} {}", stamp.emoji, stamp.name).green()
    );
    Ok(())
}
