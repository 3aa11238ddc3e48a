#![forbid(unsafe_code)]

pub mod build;
pub mod chapters;
pub mod cli;
pub mod extract;
pub mod formats;
pub mod google;
pub mod logging;
pub mod report;
pub mod text_store;
