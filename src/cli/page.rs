use anyhow::{bail, Context as _};

use super::output::{self, OutputFormat};
use super::{Context, Switch};
use crate::dom::Document;
use crate::pages;
use crate::services::{dark_mode, day_navigation};

pub(super) fn day_nav(ctx: &Context, path: &str) -> anyhow::Result<()> {
    let mut doc = Document::new(path);
    let Some(position) = day_navigation::inject(&mut doc) else {
        bail!("{path} is not a day page (expected .../dayN.html)");
    };

    match ctx.format {
        OutputFormat::Html => {
            println!("{}", doc.inner_html(doc.head()));
            println!("{}", doc.inner_html(doc.body()));
        }
        OutputFormat::Text => {
            println!("day {} (month {}, week {})", position.day, position.month, position.week);
            println!("prev: {}", position.prev_page().as_deref().unwrap_or("-"));
            println!("next: {}", position.next_page().as_deref().unwrap_or("-"));
            println!("month: {}", position.month_page());
            println!("week: {}", position.week_page());
            println!("lecture: {}", position.lecture_page());
        }
    }
    Ok(())
}

pub(super) fn prefs_get(ctx: &Context, key: &str) -> anyhow::Result<()> {
    match ctx.state.preferences().get(key) {
        Some(value) => println!("{value}"),
        None => bail!("no preference stored under {key}"),
    }
    Ok(())
}

pub(super) fn prefs_set(ctx: &Context, key: &str, value: &str) -> anyhow::Result<()> {
    ctx.state
        .preferences()
        .set(key, value)
        .with_context(|| format!("Failed to store preference {key}"))?;
    tracing::info!(key, value, "Preference stored");
    Ok(())
}

pub(super) fn dark_mode(ctx: &Context, state: Option<Switch>) -> anyhow::Result<()> {
    let store = ctx.state.preferences();
    let mut doc = ctx.page("/index.html");
    let body = doc.body();
    pages::dark_mode_toggle(&mut doc, body);
    dark_mode::apply(&mut doc, store);

    if let Some(state) = state {
        dark_mode::set(&mut doc, store, state == Switch::On);
    }

    let enabled = dark_mode::is_enabled(&doc);
    match ctx.format {
        OutputFormat::Text => println!("dark mode: {}", if enabled { "on" } else { "off" }),
        OutputFormat::Html => output::print_region(&doc, body, ctx.format),
    }
    Ok(())
}
