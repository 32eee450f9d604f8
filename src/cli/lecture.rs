use std::path::PathBuf;

use anyhow::{anyhow, bail, Context as _};

use super::output::{self, OutputFormat};
use super::Context;
use crate::dom::{Document, NodeId};
use crate::pages;
use crate::services::answer_toggle::{self, AnswerToggle, ToggleKind};
use crate::services::preferences::PreferenceStore;
use crate::services::search::{self, SearchHit};
use crate::services::{nav_highlight, progress, tabs};

pub(super) fn toggle_answer(
    ctx: &Context,
    answer_id: &str,
    text: &str,
    sample: bool,
    clicks: usize,
) -> anyhow::Result<()> {
    let mut doc = ctx.page("/lecture/index.html");
    let kind = if sample { ToggleKind::SampleAnswer } else { ToggleKind::Answer };
    let (button, shown) = click_answer(&mut doc, answer_id, text, kind, clicks)?;

    match ctx.format {
        OutputFormat::Text => {
            println!("{}", doc.text_content(button).trim());
            if shown {
                println!("{text}");
            }
        }
        OutputFormat::Html => output::print_region(&doc, doc.body(), ctx.format),
    }
    Ok(())
}

/// Renders an answer block and clicks its button `clicks` times. Returns the
/// button and whether the answer ends up shown.
fn click_answer(
    doc: &mut Document,
    answer_id: &str,
    text: &str,
    kind: ToggleKind,
    clicks: usize,
) -> anyhow::Result<(NodeId, bool)> {
    let body = doc.body();
    let button = pages::answer_block(doc, body, answer_id, kind, text);
    let mut shown = false;
    for _ in 0..clicks {
        shown = answer_toggle::dispatch_click(doc, button, &AnswerToggle)
            .ok_or_else(|| anyhow!("no answer block with id {answer_id}"))?;
    }
    Ok((button, shown))
}

pub(super) fn tabs(
    ctx: &Context,
    path: &str,
    tab_ids: &[String],
    activate: Option<&str>,
) -> anyhow::Result<()> {
    let mut doc = ctx.page(path);
    let active = select_tab(&mut doc, ctx.state.preferences(), tab_ids, activate)?;

    match ctx.format {
        OutputFormat::Text => println!("active tab: {active}"),
        OutputFormat::Html => {
            if let Some(group) = doc.first_with_class(doc.root(), tabs::GROUP_CLASS) {
                output::print_region(&doc, group, ctx.format);
            }
        }
    }
    Ok(())
}

/// Renders a tab group, then activates `activate` or restores the remembered
/// tab. Returns the id of the active tab.
fn select_tab(
    doc: &mut Document,
    store: &dyn PreferenceStore,
    tab_ids: &[String],
    activate: Option<&str>,
) -> anyhow::Result<String> {
    let body = doc.body();
    let ids: Vec<&str> = tab_ids.iter().map(String::as_str).collect();
    let group = pages::tab_group(doc, body, &ids);

    let tab = match activate {
        Some(target) => {
            let Some(tab) = doc
                .elements_with_class(group, tabs::TAB_CLASS)
                .into_iter()
                .find(|tab| doc.data(*tab, "tab") == Some(target))
            else {
                bail!("no tab named {target} (known: {})", tab_ids.join(", "));
            };
            tabs::activate(doc, store, tab);
            tab
        }
        None => tabs::restore(doc, store).context("page has no tabs")?,
    };
    Ok(doc.data(tab, "tab").unwrap_or_default().to_string())
}

pub(super) fn checklist(
    ctx: &Context,
    item_ids: &[String],
    check: &[String],
    uncheck: &[String],
) -> anyhow::Result<()> {
    let mut doc = ctx.page("/curriculum/index.html");
    let percent = tick_items(&mut doc, ctx.state.preferences(), item_ids, check, uncheck)?;

    match ctx.format {
        OutputFormat::Text => {
            for input in progress::checklist_inputs(&doc) {
                let mark = if doc.is_checked(input) { "x" } else { " " };
                println!("[{mark}] {}", doc.id(input).unwrap_or_default());
            }
            println!("progress: {percent}%");
        }
        OutputFormat::Html => {
            if let Some(list) = doc.first_with_class(doc.root(), progress::CHECKLIST_CLASS) {
                output::print_region(&doc, list, ctx.format);
            }
        }
    }
    Ok(())
}

/// Renders the checklist, restores stored ticks, applies the changes and
/// returns the resulting completion percentage.
fn tick_items(
    doc: &mut Document,
    store: &dyn PreferenceStore,
    item_ids: &[String],
    check: &[String],
    uncheck: &[String],
) -> anyhow::Result<u32> {
    let body = doc.body();
    let ids: Vec<&str> = item_ids.iter().map(String::as_str).collect();
    pages::checklist(doc, body, &ids);
    progress::init(doc, store);

    let changes = check.iter().map(|id| (id, true)).chain(uncheck.iter().map(|id| (id, false)));
    for (id, checked) in changes {
        let item = doc
            .element_by_id(id)
            .with_context(|| format!("no checklist item named {id}"))?;
        progress::set_item(doc, store, item, checked);
    }

    Ok(progress::update_checklists(doc).first().copied().unwrap_or(0))
}

pub(super) fn search(ctx: &Context, term: &str, files: &[PathBuf]) -> anyhow::Result<()> {
    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let title = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
        sources.push(Section { title, url: path.display().to_string(), text });
    }

    let mut doc = ctx.page("/index.html");
    let hits = search_sections(&mut doc, &sources, term);

    match ctx.format {
        OutputFormat::Text if hits.is_empty() => println!("{}", search::NO_RESULTS),
        OutputFormat::Text => {
            for hit in &hits {
                println!("{}\t{}", hit.title, hit.url);
                println!("  {}", hit.excerpt);
            }
        }
        OutputFormat::Html => {
            if let Some(results) = doc.element_by_id(search::RESULTS_ID) {
                output::print_region(&doc, results, ctx.format);
            }
        }
    }
    Ok(())
}

struct Section {
    title: String,
    url: String,
    text: String,
}

fn search_sections(doc: &mut Document, sections: &[Section], term: &str) -> Vec<SearchHit> {
    let body = doc.body();
    pages::search_box(doc, body);
    for section in sections {
        pages::searchable(doc, body, &section.title, &section.url, &section.text);
    }
    search::search(doc, term).unwrap_or_default()
}

pub(super) fn nav(ctx: &Context, path: &str, hrefs: &[String]) -> anyhow::Result<()> {
    let mut doc = Document::new(path);
    let body = doc.body();
    let ids: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    let nav = pages::main_nav(&mut doc, body, &ids);
    let active = nav_highlight::highlight(&mut doc);

    match ctx.format {
        OutputFormat::Text => {
            if active.is_empty() {
                println!("no link matches {path}");
            }
            for link in active {
                println!("{}", doc.attr(link, "href").unwrap_or_default());
            }
        }
        OutputFormat::Html => output::print_region(&doc, nav, ctx.format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::preferences::MemoryPreferences;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn answer_clicks_alternate_visibility_and_label() {
        let mut doc = Document::new("/lecture/index.html");
        let (button, shown) =
            click_answer(&mut doc, "ans-1", "SELECT 1", ToggleKind::Answer, 1).expect("click");
        assert!(shown);
        assert_eq!(doc.text_content(button), "回答を非表示");

        let mut doc = Document::new("/lecture/index.html");
        let (button, shown) =
            click_answer(&mut doc, "ans-1", "SELECT 1", ToggleKind::SampleAnswer, 2).expect("click");
        assert!(!shown);
        assert_eq!(doc.text_content(button), "回答例を表示");
    }

    #[test]
    fn activated_tab_is_restored_on_the_next_visit() {
        let store = MemoryPreferences::default();
        let tab_ids = owned(&["intro", "practice"]);

        let mut doc = Document::new("/curriculum/day3.html");
        let active = select_tab(&mut doc, &store, &tab_ids, Some("practice")).expect("activate");
        assert_eq!(active, "practice");

        let mut doc = Document::new("/curriculum/day3.html");
        assert_eq!(select_tab(&mut doc, &store, &tab_ids, None).expect("restore"), "practice");
        let panel = doc.element_by_id("practice").expect("panel");
        assert!(doc.has_class(panel, "active"));

        let mut doc = Document::new("/curriculum/day4.html");
        assert_eq!(select_tab(&mut doc, &store, &tab_ids, None).expect("restore"), "intro");
    }

    #[test]
    fn unknown_tab_is_rejected() {
        let store = MemoryPreferences::default();
        let mut doc = Document::new("/curriculum/day3.html");
        let err = select_tab(&mut doc, &store, &owned(&["intro"]), Some("quiz")).expect_err("unknown");
        assert!(err.to_string().contains("no tab named quiz"));
    }

    #[test]
    fn checklist_ticks_persist_between_runs() {
        let store = MemoryPreferences::default();
        let items = owned(&["c1", "c2", "c3"]);

        let mut doc = Document::new("/curriculum/index.html");
        let percent = tick_items(&mut doc, &store, &items, &owned(&["c1", "c3"]), &[]).expect("tick");
        assert_eq!(percent, 67);

        let mut doc = Document::new("/curriculum/index.html");
        let percent = tick_items(&mut doc, &store, &items, &[], &owned(&["c3"])).expect("untick");
        assert_eq!(percent, 33);
        let bar = doc.first_with_class(doc.root(), progress::BAR_CLASS).expect("bar");
        assert_eq!(doc.text_content(bar), "33%");

        let mut doc = Document::new("/curriculum/index.html");
        let err = tick_items(&mut doc, &store, &items, &owned(&["c9"]), &[]).expect_err("missing");
        assert!(err.to_string().contains("c9"));
    }

    #[test]
    fn search_lists_matching_sections() {
        let sections = vec![
            Section { title: "day1".into(), url: "notes/day1.md".into(), text: "Java の変数".into() },
            Section { title: "day2".into(), url: "notes/day2.md".into(), text: "SQL の JOIN".into() },
        ];
        let mut doc = Document::new("/index.html");

        let hits = search_sections(&mut doc, &sections, "join");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "notes/day2.md");

        let mut doc = Document::new("/index.html");
        assert!(search_sections(&mut doc, &sections, "python").is_empty());
        let results = doc.element_by_id(search::RESULTS_ID).expect("results");
        assert_eq!(doc.text_content(results), search::NO_RESULTS);
    }

    #[test]
    fn nav_marks_links_contained_in_the_path() {
        let mut doc = Document::new("/curriculum/day3.html");
        let body = doc.body();
        pages::main_nav(&mut doc, body, &["/", "/curriculum/", "/quiz/"]);

        let active = nav_highlight::highlight(&mut doc);
        let hrefs: Vec<_> = active.iter().map(|link| doc.attr(*link, "href")).collect();
        assert_eq!(hrefs, vec![Some("/curriculum/")]);
    }
}
