use anyhow::{Context as _, Result};
use dialoguer::Input;
use owo_colors::OwoColorize;
use stampcal_core::{Session, StampcalError};

use crate::commands::Context;
use crate::utils::tui::create_spinner;

pub async fn signup(ctx: &Context, email: Option<String>) -> Result<()> {
    let (email, password) = prompt_credentials(email)?;

    let spinner = create_spinner("Creating account...".to_string());
    let result = Session::sign_up(ctx.store(), &email, &password).await;
    spinner.finish_and_clear();

    let session = result.context("Could not create account")?;
    ctx.save_session()?;
    println!(
        "{}",
        format!("Signed up as {}", session.identity().email).green()
    );
    Ok(())
}

pub async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    let (email, password) = prompt_credentials(email)?;

    let spinner = create_spinner("Signing in...".to_string());
    let result = Session::sign_in(ctx.store(), &email, &password).await;
    spinner.finish_and_clear();

    let session = result.context("Could not sign in")?;
    ctx.save_session()?;
    println!(
        "{}",
        format!("Signed in as {}", session.identity().email).green()
    );
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    let session = match Session::resume(ctx.store()).await {
        Ok(session) => session,
        Err(StampcalError::NotSignedIn) => {
            // The stored cookie is expired or revoked; nothing left remotely.
            ctx.forget_session()?;
            println!("{}", "Not signed in; removed the stored session".dimmed());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let email = session.identity().email.clone();

    session.sign_out().await?;
    ctx.save_session()?;
    println!("Signed out {}", email.dimmed());
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;
    let identity = session.identity();

    if identity.name.is_empty() {
        println!("{}", identity.email);
    } else {
        println!("{} <{}>", identity.name, identity.email);
    }
    println!("{}", format!("id: {}", identity.id).dimmed());
    Ok(())
}

fn prompt_credentials(email: Option<String>) -> Result<(String, String)> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("  Email")
            .interact_text()?,
    };
    let password = rpassword::prompt_password("  Password: ")?;
    Ok((email, password))
}
