//! Page chrome for the daily curriculum pages (`.../dayN.html`).
//!
//! Replaces whatever navigation the page shipped with by a sticky header,
//! a month/week/day breadcrumb and a previous/next bar.

use std::sync::OnceLock;

use regex::Regex;

use crate::dom::{Document, NodeId};

pub(crate) const TOTAL_DAYS: u32 = 54;
const DAYS_PER_MONTH: u32 = 18;
const DAYS_PER_WEEK: u32 = 3;

const TAILWIND_CSS: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
const FONT_AWESOME_CSS: &str =
    "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.4.0/css/all.min.css";
const CHROME_STYLE: &str = "
    .gradient-bg { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
    .sticky-nav { position: sticky; top: 0; z-index: 100; backdrop-filter: blur(10px); }
    .month-badge { background: linear-gradient(45deg, #ffd700, #ffed4a); }
";

const NAV_LINK: &str = "hover:text-yellow-300 transition-colors";
const CRUMB_LINK: &str = "hover:text-blue-600";
const CRUMB_SEPARATOR: &str = "fas fa-chevron-right text-gray-400";
const PAGER_LINK: &str = "text-blue-600 hover:text-blue-800 font-medium";
const LECTURE_LINK: &str = "inline-flex items-center px-3 py-1 border border-blue-300 rounded-md \
                            text-sm text-blue-600 hover:bg-green-300 transition-colors bg-white";

fn day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"day(\d+)\.html$").expect("valid day pattern"))
}

/// Where a day sits in the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DayPosition {
    pub(crate) day: u32,
    pub(crate) month: u32,
    pub(crate) week: u32,
}

impl DayPosition {
    pub(crate) fn new(day: u32) -> Option<Self> {
        if day == 0 {
            return None;
        }
        Some(Self {
            day,
            month: (day - 1) / DAYS_PER_MONTH + 1,
            week: (day - 1) / DAYS_PER_WEEK + 1,
        })
    }

    pub(crate) fn from_path(path: &str) -> Option<Self> {
        let digits = day_pattern().captures(path)?.get(1)?.as_str();
        Self::new(digits.parse().ok()?)
    }

    pub(crate) fn prev_page(&self) -> Option<String> {
        (self.day > 1).then(|| format!("day{}.html", self.day - 1))
    }

    pub(crate) fn next_page(&self) -> Option<String> {
        (self.day < TOTAL_DAYS).then(|| format!("day{}.html", self.day + 1))
    }

    pub(crate) fn month_page(&self) -> String {
        format!("../month/month{}.html", self.month)
    }

    pub(crate) fn week_page(&self) -> String {
        format!("../week/week{}.html", self.week)
    }

    pub(crate) fn lecture_page(&self) -> String {
        format!("../lecture/day{}_lecture.html", self.day)
    }
}

/// Rewrites the page chrome for a day page. Pages whose path is not
/// `dayN.html` are left untouched and yield `None`.
pub(crate) fn inject(doc: &mut Document) -> Option<DayPosition> {
    let position = DayPosition::from_path(doc.pathname())?;

    remove_existing_navigation(doc);
    add_head_assets(doc);

    let chrome = doc.create_element("div");
    let header = header(doc, &position);
    doc.append_child(chrome, header);
    let breadcrumb = breadcrumb(doc, &position);
    doc.append_child(chrome, breadcrumb);
    let pager = pager(doc, &position);
    doc.append_child(chrome, pager);

    let body = doc.body();
    let first = doc.child_elements(body).first().copied();
    doc.insert_before(body, chrome, first);

    tracing::debug!(
        day = position.day,
        month = position.month,
        week = position.week,
        "Day navigation injected"
    );
    Some(position)
}

fn remove_existing_navigation(doc: &mut Document) {
    let body = doc.body();
    for nav in doc.child_elements(body) {
        if doc.tag(nav) == "nav" {
            doc.remove(nav);
        }
    }

    let breadcrumbs = doc.find_all(doc.root(), |doc, node| {
        doc.tag(node) == "nav" && doc.attr(node, "aria-label") == Some("breadcrumb")
    });
    for nav in breadcrumbs {
        let mut container = nav;
        while let Some(parent) = doc.parent(container) {
            if parent == body || doc.child_elements(parent).len() != 1 {
                break;
            }
            container = parent;
        }
        doc.remove(container);
    }
}

fn add_head_assets(doc: &mut Document) {
    let head = doc.head();
    for href in [TAILWIND_CSS, FONT_AWESOME_CSS] {
        let link = doc.create_element("link");
        doc.set_attr(link, "rel", "stylesheet");
        doc.set_attr(link, "href", href);
        doc.append_child(head, link);
    }
    let style = doc.create_text_element("style", "", CHROME_STYLE);
    doc.append_child(head, style);
}

fn element(doc: &mut Document, parent: NodeId, tag: &str, class_name: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.set_class_name(node, class_name);
    doc.append_child(parent, node);
    node
}

fn icon(doc: &mut Document, parent: NodeId, class_name: &str) {
    element(doc, parent, "i", class_name);
}

/// `<a>` with an optional leading icon followed by `text`.
fn link(
    doc: &mut Document,
    parent: NodeId,
    href: &str,
    class_name: &str,
    icon_class: Option<&str>,
    text: &str,
) -> NodeId {
    let anchor = element(doc, parent, "a", class_name);
    doc.set_attr(anchor, "href", href);
    if let Some(icon_class) = icon_class {
        icon(doc, anchor, icon_class);
    }
    doc.append_text(anchor, text);
    anchor
}

fn container(doc: &mut Document, outer_class: &str, inner_class: &str) -> (NodeId, NodeId) {
    let outer = doc.create_element("div");
    doc.set_class_name(outer, outer_class);
    let inner = element(doc, outer, "div", inner_class);
    (outer, inner)
}

fn header(doc: &mut Document, position: &DayPosition) -> NodeId {
    let header = doc.create_element("header");
    doc.set_class_name(header, "gradient-bg text-white sticky-nav");
    let wrapper = element(doc, header, "div", "container mx-auto px-4 py-4");
    let row = element(doc, wrapper, "div", "flex items-center justify-between");

    let brand = element(doc, row, "div", "flex items-center space-x-4");
    let title = element(doc, brand, "h1", "text-2xl font-bold");
    icon(doc, title, "fas fa-graduation-cap mr-2");
    doc.append_text(title, "ITエンジニア育成カリキュラム");

    let month_page = position.month_page();
    let nav = element(doc, row, "nav", "flex items-center space-x-6");
    link(doc, nav, &month_page, NAV_LINK, Some("fas fa-home mr-1"), "トップ");
    let month_label = format!("{}ヶ月目", position.month);
    let week_label = format!("{}週目", position.week);
    link(doc, nav, &month_page, NAV_LINK, Some("fas fa-layer-group mr-1"), &month_label);
    link(doc, nav, &position.week_page(), NAV_LINK, Some("fas fa-calendar-week mr-1"), &week_label);
    header
}

fn breadcrumb(doc: &mut Document, position: &DayPosition) -> NodeId {
    let (outer, inner) = container(doc, "bg-white border-b", "container mx-auto px-4 py-3");
    let nav = element(doc, inner, "nav", "flex items-center space-x-2 text-sm text-gray-600");

    let month_page = position.month_page();
    link(doc, nav, &month_page, CRUMB_LINK, Some("fas fa-home"), " ホーム");
    icon(doc, nav, CRUMB_SEPARATOR);
    link(doc, nav, &month_page, CRUMB_LINK, None, &format!("{}ヶ月目", position.month));
    icon(doc, nav, CRUMB_SEPARATOR);
    link(doc, nav, &position.week_page(), CRUMB_LINK, None, &format!("{}週目", position.week));
    icon(doc, nav, CRUMB_SEPARATOR);
    let current = element(doc, nav, "span", "text-blue-600 font-semibold");
    doc.set_text_content(current, &format!("{}日目", position.day));
    outer
}

fn pager(doc: &mut Document, position: &DayPosition) -> NodeId {
    let (outer, inner) = container(doc, "bg-blue-50 border-b", "container mx-auto px-4 py-2");
    let row = element(doc, inner, "div", "flex justify-between items-center");

    let left = element(doc, row, "div", "flex items-center space-x-4 text-sm");
    match position.prev_page() {
        Some(href) => {
            link(doc, left, &href, PAGER_LINK, Some("fas fa-chevron-left mr-1"), "前日");
        }
        None => {
            let disabled = element(doc, left, "span", "opacity-50");
            icon(doc, disabled, "fas fa-chevron-left mr-1");
            doc.append_text(disabled, "前日");
        }
    }
    let bar = element(doc, left, "span", "text-gray-400");
    doc.set_text_content(bar, "|");

    let middle = element(doc, row, "div", "flex items-center space-x-4 text-sm");
    let lecture_page = position.lecture_page();
    link(doc, middle, &lecture_page, LECTURE_LINK, Some("fas fa-book mr-1"), "講義ページ");

    let right = element(doc, row, "div", "flex items-center space-x-4 text-sm");
    let bar = element(doc, right, "span", "text-gray-400");
    doc.set_text_content(bar, "|");
    let next = match position.next_page() {
        Some(href) => link(doc, right, &href, PAGER_LINK, None, "翌日 "),
        None => {
            let disabled = element(doc, right, "span", "opacity-50");
            doc.append_text(disabled, "翌日 ");
            disabled
        }
    };
    icon(doc, next, "fas fa-chevron-right ml-1");
    outer
}
