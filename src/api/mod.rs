mod client;
pub(crate) mod errors;
mod http;

pub(crate) use client::CurriculumApi;
pub(crate) use errors::ApiError;
pub(crate) use http::HttpCurriculumApi;

/// Header the server's CSRF filter reads the anti-forgery token from.
pub(crate) const CSRF_HEADER: &str = "X-CSRF-TOKEN";
