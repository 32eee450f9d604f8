pub(crate) mod answer_toggle;
pub(crate) mod csrf;
pub(crate) mod dark_mode;
pub(crate) mod dashboard_answer;
pub(crate) mod day_navigation;
pub(crate) mod exercise_monitor;
pub(crate) mod exercise_submit;
pub(crate) mod live_monitor;
pub(crate) mod nav_highlight;
pub(crate) mod preferences;
pub(crate) mod progress;
pub(crate) mod quiz_monitor;
pub(crate) mod quiz_submit;
pub(crate) mod search;
pub(crate) mod table_sort;
pub(crate) mod tabs;
pub(crate) mod widgets;
