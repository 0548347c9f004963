#![allow(async_fn_in_trait)]

pub mod errors;
pub mod logging;
pub mod report_window;
pub mod templates;
pub mod thanks_log;
pub mod write_reports;
