pub mod analyze;
pub mod config;
pub mod recommend;

pub use analyze::run_analyze;
pub use recommend::{run_recommend, run_request};
