pub mod config;
pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod workbook;

pub use pipeline::{process, process_with};
