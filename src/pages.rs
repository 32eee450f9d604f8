//! Builders for the page fragments the server templates render.
//!
//! The CLI assembles pages from these before handing them to the widgets, and
//! the widget tests use them as fixtures.

use crate::core::config::PageSettings;
use crate::dom::{Document, NodeId};
use crate::services::answer_toggle::ToggleKind;
use crate::services::{
    dark_mode, dashboard_answer, exercise_monitor, live_monitor, nav_highlight, progress,
    quiz_monitor, search, tabs,
};
use crate::services::widgets::STUDENT_ID_INPUT;

/// Page-level context: CSRF meta tag, cookie and the hidden student id input.
pub(crate) fn shell(doc: &mut Document, page: &PageSettings) {
    if let Some(token) = &page.csrf_token {
        csrf_meta(doc, token);
    }
    if let Some(cookie) = &page.cookie {
        doc.set_cookie(cookie);
    }
    student_id_input(doc, page.student_id.as_deref());
}

pub(crate) fn csrf_meta(doc: &mut Document, token: &str) -> NodeId {
    let meta = doc.create_element("meta");
    doc.set_attr(meta, "name", "_csrf");
    doc.set_attr(meta, "content", token);
    let head = doc.head();
    doc.append_child(head, meta);
    meta
}

pub(crate) fn student_id_input(doc: &mut Document, student_id: Option<&str>) -> NodeId {
    let input = match doc.element_by_id(STUDENT_ID_INPUT) {
        Some(input) => input,
        None => {
            let input = hidden_input(doc, STUDENT_ID_INPUT);
            let body = doc.body();
            doc.append_child(body, input);
            input
        }
    };
    doc.set_value(input, student_id.unwrap_or_default());
    input
}

fn hidden_input(doc: &mut Document, id: &str) -> NodeId {
    let input = doc.create_element("input");
    doc.set_attr(input, "type", "hidden");
    doc.set_id(input, id);
    input
}

fn text_input(doc: &mut Document, parent: NodeId, id: &str, placeholder: &str) -> NodeId {
    let input = doc.create_element("input");
    doc.set_attr(input, "type", "text");
    doc.set_id(input, id);
    doc.set_class_name(input, "form-control");
    doc.set_attr(input, "placeholder", placeholder);
    doc.append_child(parent, input);
    input
}

/// Sets the value of the input with `id`; `false` when there is none.
pub(crate) fn set_input(doc: &mut Document, id: &str, value: &str) -> bool {
    match doc.element_by_id(id) {
        Some(input) => {
            doc.set_value(input, value);
            true
        }
        None => false,
    }
}

/// Choice question with one checkbox per `(value, label)` option.
pub(crate) fn quiz_question(
    doc: &mut Document,
    parent: NodeId,
    question_id: &str,
    quiz_id: Option<&str>,
    options: &[(&str, &str)],
) -> NodeId {
    let question = doc.create_element("div");
    doc.set_class_name(question, "quiz-question card mb-3");
    doc.set_data(question, "questionId", question_id);
    if let Some(quiz_id) = quiz_id {
        doc.set_data(question, "quizId", quiz_id);
    }
    doc.append_child(parent, question);

    let name = format!("quiz-{question_id}");
    for (value, label) in options {
        let wrapper = doc.create_element("label");
        doc.set_class_name(wrapper, "form-check");
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "checkbox");
        doc.set_attr(input, "name", &name);
        doc.set_class_name(input, "form-check-input");
        doc.set_value(input, value);
        doc.append_child(wrapper, input);
        doc.append_text(wrapper, label);
        doc.append_child(question, wrapper);
    }

    let button = doc.create_text_element("button", "btn btn-primary", "回答する");
    doc.set_attr(button, "type", "button");
    doc.append_child(question, button);

    let result = doc.create_element("div");
    doc.set_id(result, &format!("quiz-result-{question_id}"));
    doc.append_child(question, result);
    question
}

/// Ticks the option `value` of a quiz question. `false` when there is no such option.
pub(crate) fn check_option(doc: &mut Document, question_id: &str, value: &str) -> bool {
    let name = format!("quiz-{question_id}");
    let option = doc.find_first(doc.root(), |doc, node| {
        doc.tag(node) == "input"
            && doc.attr(node, "name") == Some(name.as_str())
            && doc.value(node) == value
    });
    match option {
        Some(option) => {
            doc.set_checked(option, true);
            true
        }
        None => false,
    }
}

pub(crate) fn quiz_monitor(doc: &mut Document, parent: NodeId, question_id: &str) -> NodeId {
    let monitor = doc.create_element("div");
    doc.set_class_name(monitor, quiz_monitor::MONITOR_CLASS);
    doc.set_data(monitor, "questionId", question_id);
    doc.append_child(parent, monitor);

    let table = doc.create_element("table");
    doc.set_class_name(table, "table table-sm");
    doc.append_child(monitor, table);
    let head = doc.create_element("thead");
    doc.append_child(table, head);
    let row = doc.create_element("tr");
    doc.append_child(head, row);
    for label in ["受講者", "回答", "正誤"] {
        let cell = doc.create_text_element("th", "", label);
        doc.append_child(row, cell);
    }
    let body = doc.create_element("tbody");
    doc.append_child(table, body);
    monitor
}

/// Free-text exercise. Returns the answer textarea.
pub(crate) fn exercise_question(
    doc: &mut Document,
    parent: NodeId,
    question_id: &str,
    lecture_id: &str,
) -> NodeId {
    let question = doc.create_element("div");
    doc.set_class_name(question, "exercise-question card mb-3");
    doc.set_data(question, "questionId", question_id);
    doc.set_data(question, "lectureId", lecture_id);
    doc.append_child(parent, question);

    let textarea = doc.create_element("textarea");
    doc.set_id(textarea, &format!("exercise-answer-{question_id}"));
    doc.set_class_name(textarea, "form-control");
    doc.set_attr(textarea, "rows", "4");
    doc.append_child(question, textarea);

    let button = doc.create_text_element("button", "btn btn-primary mt-2", "送信");
    doc.set_attr(button, "type", "button");
    doc.append_child(question, button);

    let result = doc.create_element("div");
    doc.set_id(result, &format!("exercise-result-{question_id}"));
    doc.set_class_name(result, "mt-2");
    doc.append_child(question, result);
    textarea
}

pub(crate) fn exercise_monitor(doc: &mut Document, parent: NodeId, question_id: &str) -> NodeId {
    let monitor = doc.create_element("div");
    doc.set_class_name(monitor, &format!("{} row", exercise_monitor::MONITOR_CLASS));
    doc.set_data(monitor, "questionId", question_id);
    doc.append_child(parent, monitor);

    let list = doc.create_element("ul");
    doc.set_class_name(list, "exercise-student-list list-group col-4");
    doc.append_child(monitor, list);
    let display = doc.create_element("pre");
    doc.set_class_name(display, "exercise-answer-display col-8");
    doc.append_child(monitor, display);
    monitor
}

/// Hidden answer block and the button that reveals it. Returns the button.
pub(crate) fn answer_block(
    doc: &mut Document,
    parent: NodeId,
    answer_id: &str,
    kind: ToggleKind,
    text: &str,
) -> NodeId {
    let button = doc.create_element("button");
    doc.set_class_name(button, "btn btn-outline-secondary btn-sm");
    doc.set_attr(button, "type", "button");
    doc.set_data(button, "targetId", answer_id);
    doc.set_data(button, "toggle", kind.as_str());
    let icon = doc.create_element("i");
    doc.set_class_name(icon, "fas fa-eye");
    doc.append_child(button, icon);
    let label = doc.create_text_element("span", "answer-toggle-label", kind.label(false));
    doc.append_child(button, label);
    doc.append_child(parent, button);

    let block = doc.create_text_element("div", "answer-content collapse", text);
    doc.set_id(block, answer_id);
    doc.append_child(parent, block);
    button
}

/// Instructor live monitor: quiz id, connect button and the answers list.
pub(crate) fn dashboard_monitor(doc: &mut Document, parent: NodeId, with_status: bool) -> NodeId {
    let section = doc.create_element("section");
    doc.set_class_name(section, "answer-monitor");
    doc.append_child(parent, section);

    text_input(doc, section, live_monitor::QUIZ_ID_INPUT, "クイズID");
    let button = doc.create_text_element("button", "btn btn-primary", "接続");
    doc.set_id(button, live_monitor::CONNECT_BUTTON);
    doc.append_child(section, button);
    if with_status {
        let status = doc.create_element("div");
        doc.set_id(status, live_monitor::STATUS_ID);
        doc.append_child(section, status);
    }
    let list = doc.create_element("ul");
    doc.set_id(list, live_monitor::ANSWERS_LIST);
    doc.set_class_name(list, "list-group mt-3");
    doc.append_child(section, list);
    section
}

pub(crate) fn dashboard_answer_form(doc: &mut Document, parent: NodeId) -> NodeId {
    let form = doc.create_element("form");
    doc.set_id(form, "answer-form");
    doc.append_child(parent, form);

    text_input(doc, form, live_monitor::QUIZ_ID_INPUT, "クイズID");
    text_input(doc, form, dashboard_answer::QUESTION_ID_INPUT, "問題ID");
    text_input(doc, form, dashboard_answer::ANSWER_INPUT, "回答");
    let button = doc.create_text_element("button", "btn btn-success", "送信");
    doc.set_attr(button, "type", "submit");
    doc.append_child(form, button);
    let status = doc.create_element("div");
    doc.set_id(status, dashboard_answer::STATUS_ID);
    doc.set_class_name(status, "small");
    doc.append_child(form, status);

    let feed = doc.create_element("ul");
    doc.set_id(feed, dashboard_answer::FEED_LIST);
    doc.set_class_name(feed, "list-group mt-3");
    doc.append_child(parent, feed);
    form
}

pub(crate) fn dark_mode_toggle(doc: &mut Document, parent: NodeId) -> NodeId {
    let toggle = doc.create_element("input");
    doc.set_attr(toggle, "type", "checkbox");
    doc.set_id(toggle, dark_mode::TOGGLE_ID);
    doc.append_child(parent, toggle);
    toggle
}

/// `.tabs-container` with one `.tab` button and one `.tab-content` panel per id.
pub(crate) fn tab_group(doc: &mut Document, parent: NodeId, tab_ids: &[&str]) -> NodeId {
    let group = doc.create_element("div");
    doc.set_class_name(group, tabs::GROUP_CLASS);
    doc.append_child(parent, group);

    let bar = doc.create_element("div");
    doc.set_class_name(bar, "tab-buttons");
    doc.append_child(group, bar);
    for id in tab_ids {
        let tab = doc.create_text_element("button", tabs::TAB_CLASS, id);
        doc.set_data(tab, "tab", id);
        doc.append_child(bar, tab);
    }
    for id in tab_ids {
        let panel = doc.create_element("div");
        doc.set_class_name(panel, tabs::CONTENT_CLASS);
        doc.set_id(panel, id);
        doc.append_child(group, panel);
    }
    group
}

/// `.checklist` with a progress bar and one checkbox per item id.
pub(crate) fn checklist(doc: &mut Document, parent: NodeId, item_ids: &[&str]) -> NodeId {
    let list = doc.create_element("div");
    doc.set_class_name(list, progress::CHECKLIST_CLASS);
    doc.append_child(parent, list);

    let track = doc.create_element("div");
    doc.set_class_name(track, "progress");
    doc.append_child(list, track);
    let bar = doc.create_element("div");
    doc.set_class_name(bar, progress::BAR_CLASS);
    doc.append_child(track, bar);

    for id in item_ids {
        let item = doc.create_element("label");
        doc.set_class_name(item, progress::ITEM_CLASS);
        doc.append_child(list, item);
        let input = doc.create_element("input");
        doc.set_attr(input, "type", "checkbox");
        doc.set_id(input, id);
        doc.append_child(item, input);
        doc.append_text(item, id);
    }
    list
}

/// `.main-nav` bar with one link per href.
pub(crate) fn main_nav(doc: &mut Document, parent: NodeId, hrefs: &[&str]) -> NodeId {
    let nav = doc.create_element("nav");
    doc.set_class_name(nav, nav_highlight::NAV_CLASS);
    doc.append_child(parent, nav);
    for href in hrefs {
        let link = doc.create_text_element("a", "nav-link", href);
        doc.set_attr(link, "href", href);
        doc.append_child(nav, link);
    }
    nav
}

/// Search box; results are rendered next to it on the first search.
pub(crate) fn search_box(doc: &mut Document, parent: NodeId) -> NodeId {
    let form = doc.create_element("div");
    doc.set_class_name(form, "search-container");
    doc.append_child(parent, form);
    let input = doc.create_element("input");
    doc.set_attr(input, "type", "search");
    doc.set_id(input, search::INPUT_ID);
    doc.set_class_name(input, "form-control");
    doc.append_child(form, input);
    input
}

/// A `.searchable` section. `title` and `url` feed the search result entry.
pub(crate) fn searchable(
    doc: &mut Document,
    parent: NodeId,
    title: &str,
    url: &str,
    text: &str,
) -> NodeId {
    let section = doc.create_text_element("section", search::SEARCHABLE_CLASS, text);
    doc.set_attr(section, "data-title", title);
    doc.set_attr(section, "data-url", url);
    doc.append_child(parent, section);
    section
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_carries_page_context() {
        let page = PageSettings {
            student_id: Some("s-1".to_string()),
            csrf_token: Some("tok".to_string()),
            cookie: Some("XSRF-TOKEN=other".to_string()),
        };
        let mut doc = Document::new("/lecture/day1_lecture.html");
        shell(&mut doc, &page);

        assert_eq!(doc.inner_html(doc.head()), "<meta content=\"tok\" name=\"_csrf\">");
        assert_eq!(doc.cookie(), "XSRF-TOKEN=other");
        let input = doc.element_by_id(STUDENT_ID_INPUT).expect("input");
        assert_eq!(doc.value(input), "s-1");

        student_id_input(&mut doc, Some("s-2"));
        assert_eq!(doc.elements_by_tag(doc.body(), "input").len(), 1);
        assert_eq!(doc.value(input), "s-2");
    }

    #[test]
    fn quiz_question_renders_named_options() {
        let mut doc = Document::new("/quiz/day2.html");
        let body = doc.body();
        quiz_question(&mut doc, body, "5", Some("3"), &[("a", "<配列>")]);

        assert!(check_option(&mut doc, "5", "a"));
        assert!(!check_option(&mut doc, "5", "z"));
        assert_eq!(
            doc.inner_html(body),
            "<div class=\"quiz-question card mb-3\" data-question-id=\"5\" data-quiz-id=\"3\">\
             <label class=\"form-check\"><input class=\"form-check-input\" name=\"quiz-5\" \
             type=\"checkbox\" value=\"a\" checked>&lt;配列&gt;</label>\
             <button class=\"btn btn-primary\" type=\"button\">回答する</button>\
             <div id=\"quiz-result-5\"></div></div>"
        );
    }

    #[test]
    fn tab_group_pairs_buttons_with_panels() {
        let mut doc = Document::new("/curriculum/day3.html");
        let body = doc.body();
        let group = tab_group(&mut doc, body, &["tab-a", "tab-b"]);

        let buttons = doc.elements_with_class(group, tabs::TAB_CLASS);
        assert_eq!(buttons.len(), 2);
        assert_eq!(doc.data(buttons[1], "tab"), Some("tab-b"));
        let panel = doc.element_by_id("tab-b").expect("panel");
        assert!(doc.has_class(panel, tabs::CONTENT_CLASS));
        assert_eq!(doc.closest_with_class(buttons[0], tabs::GROUP_CLASS), Some(group));
    }

    #[test]
    fn checklist_items_are_checkboxes_inside_items() {
        let mut doc = Document::new("/curriculum/day3.html");
        let body = doc.body();
        checklist(&mut doc, body, &["c1", "c2"]);

        assert_eq!(progress::checklist_inputs(&doc).len(), 2);
        let bar = doc.first_with_class(body, progress::BAR_CLASS).expect("bar");
        assert!(doc.closest_with_class(bar, progress::CHECKLIST_CLASS).is_some());
    }
}
