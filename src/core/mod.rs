pub mod converter;
pub mod dispatcher;
pub mod fetcher;
pub mod worker;

pub use crate::domain::model::{Record, RunSummary, UrlOutcome};
pub use crate::domain::ports::{
    output_path_for, ConfigProvider, HttpGet, HttpResponse, Sink, SinkFactory,
};
pub use crate::utils::error::Result;
