//! Dashboard page generation.
//!
//! This module renders a [`Dashboard`] as a standalone HTML page (charts
//! drawn in the browser by vega-embed), as Markdown tables, or as JSON.

use crate::models::{
    ChartSection, Dashboard, DashboardMetadata, Demographics, FamilyRow, LastNameCount,
};
use anyhow::{Context, Result};
use serde_json::json;

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

/// Generate a complete HTML page.
pub fn generate_html_page(dashboard: &Dashboard) -> Result<String> {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", escape_html(&dashboard.title)));
    for src in VEGA_SCRIPTS {
        page.push_str(&format!("<script src=\"{}\"></script>\n", src));
    }
    page.push_str(
        "<style>\n\
         body { font-family: sans-serif; max-width: 960px; margin: 2em auto; padding: 0 1em; }\n\
         .chart { width: 100%; }\n\
         table { border-collapse: collapse; }\n\
         th, td { border: 1px solid #ccc; padding: 0.3em 0.8em; text-align: left; }\n\
         .meta { color: #666; font-size: 0.9em; }\n\
         </style>\n",
    );
    page.push_str("</head>\n<body>\n");

    page.push_str(&format!("<h1>{}</h1>\n", escape_html(&dashboard.title)));
    page.push_str(&html_metadata(&dashboard.metadata));

    for (i, section) in dashboard.sections.iter().enumerate() {
        page.push_str(&html_chart_section(i, section)?);
    }

    page.push_str(&html_unknown_age_note(&dashboard.demographics));
    page.push_str(&html_last_names(&dashboard.top_last_names));

    page.push_str("</body>\n</html>\n");

    Ok(page)
}

fn html_metadata(metadata: &DashboardMetadata) -> String {
    format!(
        "<p class=\"meta\">{} passengers loaded from {} on {}.</p>\n",
        metadata.passengers,
        escape_html(&metadata.source),
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn html_chart_section(index: usize, section: &ChartSection) -> Result<String> {
    let mut html = String::new();
    let id = format!("chart-{}", index);

    let spec = serde_json::to_string(&section.chart.to_vega_lite())
        .context("Failed to serialize chart specification")?;
    let options = json!({ "actions": false });

    html.push_str("<section>\n");
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(&section.heading)));
    html.push_str(&format!(
        "<p><strong>Question:</strong> {}</p>\n",
        escape_html(&section.question)
    ));
    html.push_str(&format!("<div id=\"{}\" class=\"chart\"></div>\n", id));
    html.push_str(&format!(
        "<script>vegaEmbed('#{}', {}, {});</script>\n",
        id,
        escape_script(&spec),
        options
    ));
    html.push_str(&format!("<p>{}</p>\n", escape_html(&section.explanation)));
    html.push_str("</section>\n");

    Ok(html)
}

fn html_unknown_age_note(demographics: &Demographics) -> String {
    let total = demographics.unknown_age_total();
    if total == 0 {
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<section>\n<h2>Passengers of Unknown Age</h2>\n");
    html.push_str(&format!(
        "<p>{} passengers have no recorded age. They are excluded from the age-group chart \
         and summarized here.</p>\n",
        total
    ));
    html.push_str("<table>\n<tr><th>Class</th><th>Sex</th>");
    html.push_str("<th>Passengers</th><th>Survival Rate</th></tr>\n");
    for row in &demographics.unknown_age {
        if row.counts.n_passengers == 0 {
            continue;
        }
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.0}%</td></tr>\n",
            row.class,
            row.sex,
            row.counts.n_passengers,
            row.counts.survival_rate * 100.0
        ));
    }
    html.push_str("</table>\n</section>\n");

    html
}

fn html_last_names(names: &[LastNameCount]) -> String {
    if names.is_empty() {
        return String::new();
    }

    let mut html = String::new();
    html.push_str("<section>\n<h2>Most Common Last Names</h2>\n");
    html.push_str("<table>\n<tr><th>Last Name</th><th>Passengers</th></tr>\n");
    for name in names {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&name.last_name),
            name.count
        ));
    }
    html.push_str("</table>\n</section>\n");

    html
}

/// Escape text for use inside HTML elements and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// JSON embedded in a <script> element must not contain a closing tag.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Generate a Markdown report with the aggregate tables.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", dashboard.title));
    output.push_str(&generate_metadata_section(&dashboard.metadata));

    for section in &dashboard.sections {
        output.push_str(&format!("## {}\n\n", section.heading));
        output.push_str(&format!("**Question:** {}\n\n", section.question));
        output.push_str(&format!("{}\n\n", section.explanation));
    }

    output.push_str(&generate_demographics_section(&dashboard.demographics));
    output.push_str(&generate_families_section(&dashboard.families));
    output.push_str(&generate_last_names_section(&dashboard.top_last_names));

    output
}

fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Passengers:** {}\n", metadata.passengers));
    if metadata.unknown_age > 0 {
        section.push_str(&format!("- **Unknown Age:** {}\n", metadata.unknown_age));
    }
    section.push_str(&format!("- **Duration:** {:.1}s\n\n", metadata.duration_seconds));

    section
}

fn generate_demographics_section(demographics: &Demographics) -> String {
    let mut section = String::new();

    section.push_str("## Survival by Class, Sex and Age Group\n\n");
    section.push_str("| Class | Sex | Age Group | Passengers | Survivors | Survival Rate |\n");
    section.push_str("|:---:|:---|:---|---:|---:|---:|\n");
    for row in &demographics.rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {:.1}% |\n",
            row.class,
            row.sex,
            row.age_band,
            row.counts.n_passengers,
            row.counts.n_survivors,
            row.counts.survival_rate * 100.0
        ));
    }
    for row in &demographics.unknown_age {
        if row.counts.n_passengers == 0 {
            continue;
        }
        section.push_str(&format!(
            "| {} | {} | Unknown | {} | {} | {:.1}% |\n",
            row.class,
            row.sex,
            row.counts.n_passengers,
            row.counts.n_survivors,
            row.counts.survival_rate * 100.0
        ));
    }
    section.push('\n');

    section
}

fn generate_families_section(families: &[FamilyRow]) -> String {
    let fare = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |f| format!("{:.2}", f));

    let mut section = String::new();

    section.push_str("## Fares by Family Size and Class\n\n");
    section.push_str("| Class | Family Size | Passengers | Avg Fare | Min Fare | Max Fare |\n");
    section.push_str("|:---:|:---:|---:|---:|---:|---:|\n");
    for row in families {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.class,
            row.family_size,
            row.n_passengers,
            fare(row.avg_fare),
            fare(row.min_fare),
            fare(row.max_fare)
        ));
    }
    section.push('\n');

    section
}

fn generate_last_names_section(names: &[LastNameCount]) -> String {
    if names.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Most Common Last Names\n\n");
    section.push_str("| Last Name | Passengers |\n");
    section.push_str("|:---|---:|\n");
    for name in names {
        section.push_str(&format!("| {} | {} |\n", name.last_name, name.count));
    }
    section.push('\n');

    section
}

/// Generate a JSON report, including the Vega-Lite specification of every chart.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    let charts: Vec<_> = dashboard
        .sections
        .iter()
        .map(|s| s.chart.to_vega_lite())
        .collect();

    let document = json!({
        "dashboard": dashboard,
        "vega_lite": charts,
    });

    serde_json::to_string_pretty(&document).map_err(Into::into)
}
