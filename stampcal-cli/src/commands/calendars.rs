use anyhow::Result;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;
use stampcal_core::Theme;

use crate::commands::Context;
use crate::render::swatch;
use crate::utils::tui::create_spinner;

pub async fn list(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;

    let spinner = create_spinner("Loading calendars...".to_string());
    let result = session.mirror().reload_calendars().await;
    spinner.finish_and_clear();

    let calendars = result?;
    if calendars.is_empty() {
        println!("No calendars yet. Create one with:\n  stampcal new-calendar");
        return Ok(());
    }

    for calendar in calendars.iter() {
        println!(
            "{} {}  {}",
            swatch(&calendar.theme),
            calendar.title.bold(),
            calendar.id.dimmed()
        );
    }
    Ok(())
}

pub async fn new(ctx: &Context, title: Option<String>, theme: Option<String>) -> Result<()> {
    let interactive = title.is_none();
    let session = ctx.session().await?;

    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  Title")
            .interact_text()?,
    };

    let theme = match theme {
        Some(token) => Theme::parse(&token)?,
        None if interactive => prompt_theme()?,
        None => Theme::default(),
    };

    let calendar = session.mirror().create_calendar(&title, &theme).await?;

    if interactive {
        println!();
    }
    println!(
        "{} {}",
        swatch(&calendar.theme),
        format!("Created: {}", calendar.title).green()
    );
    Ok(())
}

fn prompt_theme() -> Result<Theme> {
    let palette: Vec<Theme> = Theme::palette().collect();
    let items: Vec<String> = palette
        .iter()
        .map(|theme| format!("{} {}", swatch(theme.as_str()), theme))
        .collect();

    let selection = Select::new()
        .with_prompt("  Color theme")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(palette.get(selection).cloned().unwrap_or_default())
}
