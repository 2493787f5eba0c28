//! Charts and page rendering.

pub mod charts;
pub mod dashboard;
pub mod generator;

pub use charts::ChartSpec;
pub use dashboard::{build_dashboard, DashboardOptions};
pub use generator::{generate_html_page, generate_json_report, generate_markdown_report};
