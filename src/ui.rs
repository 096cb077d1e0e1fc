// UI layer: one interactive screen per route, built with `dialoguer`.
// Each screen loads what it needs through the API client, prints it and
// returns where to navigate next. Request failures are reported and the
// screen stays usable.

use crate::api::ApiClient;
use crate::app::App;
use crate::error::NetworkError;
use crate::filters::{Filters, FORMAT_NUMBER};
use crate::router::{project_link, query_link, Location, View};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

/// What a screen asks the router to do once it is done.
enum Nav {
    Push(String),
    Back,
    Stay,
    Exit,
}

/// Main loop. Renders the current location until the user exits.
pub async fn run(app: &mut App) -> Result<()> {
    while let Some(location) = app.router.current().cloned() {
        let nav = match location.view {
            View::Projects => projects_view(app).await?,
            View::Project => project_view(app, &location).await?,
            View::Video => video_view(app, &location).await?,
            View::Crawler => crawler_view(app, &location).await?,
        };
        match nav {
            Nav::Push(path) => {
                if app.router.push(&path).is_none() {
                    print_error(&format!("No page at {}", app.router.href(&path)));
                }
            }
            Nav::Back => {
                app.router.back();
            }
            Nav::Stay => {}
            Nav::Exit => break,
        }
    }
    Ok(())
}

/// Home screen: list projects and offer the other tools.
async fn projects_view(app: &App) -> Result<Nav> {
    heading("Projects");
    let projects = load("Loading projects...", app.api.get_projects()).await?;
    let names: Vec<String> = projects
        .as_ref()
        .and_then(Value::as_array)
        .map(|list| list.iter().map(label).collect())
        .unwrap_or_default();
    if names.is_empty() {
        println!("No projects available.");
    }

    let mut items = names.clone();
    items.extend(["Analyse a video", "Crawl", "Refresh", "Exit"].map(String::from));
    let selection = Select::new()
        .with_prompt("Open")
        .items(&items)
        .default(0)
        .interact()?;

    if let Some(project) = names.get(selection) {
        return Ok(link(project_link(project)));
    }
    match selection - names.len() {
        0 => ask_video(None),
        1 => Ok(link(query_link("/crawler", &[]))),
        2 => Ok(Nav::Stay),
        _ => Ok(Nav::Exit),
    }
}

/// Project screen: training set and the disabled list, which can be edited.
async fn project_view(app: &App, location: &Location) -> Result<Nav> {
    let project = location.param("project").unwrap_or_default();
    heading(&format!("Project {project}"));

    let training = load("Loading training set...", app.api.get_training_set(Some(project))).await?;
    let disabled = load("Loading disabled entries...", app.api.get_disabled(project)).await?;

    if let Some(training) = &training {
        println!("{}", "Training set".bold());
        render(&app.filters, training);
    }
    let disabled: Vec<String> = disabled
        .as_ref()
        .and_then(Value::as_array)
        .map(|list| list.iter().map(label).collect())
        .unwrap_or_default();
    println!("{} {}", "Disabled:".bold(), disabled.join(", "));

    let items = ["Edit disabled entries", "Analyse a video", "Back", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    match selection {
        0 => {
            let entries: Vec<String> = training
                .as_ref()
                .and_then(Value::as_array)
                .map(|list| list.iter().map(label).collect())
                .unwrap_or_default();
            edit_disabled(&app.api, project, &entries, &disabled).await?;
            Ok(Nav::Stay)
        }
        1 => ask_video(Some(project)),
        2 => Ok(Nav::Back),
        _ => Ok(Nav::Exit),
    }
}

/// Let the user tick training entries to disable and post the new list.
async fn edit_disabled(
    api: &ApiClient,
    project: &str,
    entries: &[String],
    disabled: &[String],
) -> Result<()> {
    if entries.is_empty() {
        println!("The training set is empty, nothing to disable.");
        return Ok(());
    }
    let checked: Vec<bool> = entries.iter().map(|e| disabled.contains(e)).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Disabled entries (space to toggle)")
        .items(entries)
        .defaults(&checked)
        .interact()?;
    let list: Vec<Value> = chosen
        .into_iter()
        .map(|i| Value::String(entries[i].clone()))
        .collect();

    if load("Saving...", api.set_disabled(project, &list)).await?.is_some() {
        println!("{}", "Saved.".green());
    }
    Ok(())
}

/// Video screen: show the locator and run tracking on demand.
async fn video_view(app: &App, location: &Location) -> Result<Nav> {
    let video = location.query("video");
    let project = location.query("project").unwrap_or_default();
    heading(&format!("Video {}", video.unwrap_or("(none)")));

    if let Some(locator) = load("Resolving locator...", app.api.get_locator(video)).await? {
        let locator = label(&locator);
        if !locator.is_empty() {
            println!("{} {}", "Locator:".bold(), locator);
        }
    }

    let items = ["Run face tracking", "Back", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    match selection {
        0 => {
            let tracks = load(
                "Tracking faces, this can take a while...",
                app.api.recognise(video.unwrap_or_default(), project),
            )
            .await?;
            if let Some(tracks) = tracks {
                render(&app.filters, &tracks);
            }
            Ok(Nav::Stay)
        }
        1 => Ok(Nav::Back),
        _ => Ok(Nav::Exit),
    }
}

/// Crawler screen: run the query in the location, then offer a new one.
async fn crawler_view(app: &App, location: &Location) -> Result<Nav> {
    heading("Crawler");
    if let Some(q) = location.query("q") {
        if let Some(result) = load(&format!("Crawling for '{q}'..."), app.api.crawl(q)).await? {
            render(&app.filters, &result);
        }
    }

    let items = ["New search", "Back", "Exit"];
    let selection = Select::new().items(&items).default(0).interact()?;
    match selection {
        0 => {
            let q: String = Input::new()
                .with_prompt("Search")
                .allow_empty(true)
                .interact_text()?;
            Ok(link(query_link("/crawler", &[("q", q.as_str())])))
        }
        1 => Ok(Nav::Back),
        _ => Ok(Nav::Exit),
    }
}

fn ask_video(project: Option<&str>) -> Result<Nav> {
    let video: String = Input::new().with_prompt("Video URI").interact_text()?;
    let project = match project {
        Some(project) => project.to_string(),
        None => Input::new().with_prompt("Project").interact_text()?,
    };
    Ok(link(query_link(
        "/video",
        &[("video", video.as_str()), ("project", project.as_str())],
    )))
}

fn link(path: Option<String>) -> Nav {
    match path {
        Some(path) => Nav::Push(path),
        None => {
            print_error("Could not build the page address");
            Nav::Stay
        }
    }
}

/// Await a facade call behind a spinner. Failures are printed and turned
/// into `None` so the screen can carry on.
async fn load<F>(message: &str, call: F) -> Result<Option<Value>>
where
    F: Future<Output = Result<Value, NetworkError>>,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = call.await;
    spinner.finish_and_clear();
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(url = e.url(), error = %e, "request failed");
            print_error(&e.to_string());
            Ok(None)
        }
    }
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold().cyan());
}

fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

/// Print an opaque payload: lists one entry per line, objects as
/// `key: value` pairs.
fn render(filters: &Filters, value: &Value) {
    match value {
        Value::Array(items) if items.is_empty() => println!("  (empty)"),
        Value::Array(items) => {
            for item in items {
                println!("  - {}", row(filters, item));
            }
        }
        Value::Object(_) => println!("  {}", row(filters, value)),
        Value::Null => println!("  (nothing)"),
        other => println!("  {}", cell(filters, other)),
    }
}

fn row(filters: &Filters, value: &Value) -> String {
    match value {
        Value::Object(fields) => fields
            .iter()
            .map(|(key, v)| format!("{key}: {}", cell(filters, v)))
            .collect::<Vec<_>>()
            .join(", "),
        other => cell(filters, other),
    }
}

// Fractional numbers go through `formatNumber`; integers such as frame
// numbers are printed as-is.
fn cell(filters: &Filters, value: &Value) -> String {
    match value {
        Value::Number(n) if n.is_f64() => filters
            .apply(FORMAT_NUMBER, value)
            .unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display name of an entry in a server list.
fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(fields) => ["name", "id", "label"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::format_number;
    use serde_json::json;

    fn filters() -> Filters {
        let mut filters = Filters::new();
        filters.register(FORMAT_NUMBER, format_number);
        filters
    }

    #[test]
    fn labels_prefer_names() {
        assert_eq!(label(&json!("general")), "general");
        assert_eq!(label(&json!({"id": "p1", "name": "Politicians"})), "Politicians");
        assert_eq!(label(&json!({"id": "p1"})), "p1");
        assert_eq!(label(&json!(7)), "7");
    }

    #[test]
    fn cells_format_fractions_only() {
        let filters = filters();
        assert_eq!(cell(&filters, &json!(0.91234)), "0.91");
        assert_eq!(cell(&filters, &json!(250)), "250");
        assert_eq!(cell(&filters, &json!("Obama")), "Obama");
        assert_eq!(cell(&filters, &json!(true)), "true");
    }

    #[test]
    fn rows_join_object_fields() {
        let filters = filters();
        let prediction = json!({"name": "Obama", "confidence": 0.876, "frame": 25});
        let line = row(&filters, &prediction);
        assert!(line.contains("name: Obama"));
        assert!(line.contains("confidence: 0.88"));
        assert!(line.contains("frame: 25"));
    }
}
