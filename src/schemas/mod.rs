pub(crate) mod exercise;
pub(crate) mod live;
pub(crate) mod quiz;
