//! Dashboard assembly.
//!
//! Runs every aggregator once over the loaded dataset and pairs each chart
//! with the question it answers.

use super::charts::{demographic_chart, family_fare_chart, family_size_chart};
use crate::analysis::{
    best_surviving_age_band, family_groups, last_name_counts, passengers_by_family_size,
    survival_demographics, top_last_names,
};
use crate::dataset::Dataset;
use crate::models::{ChartSection, Dashboard, DashboardMetadata, FamilyRow};
use chrono::Utc;
use tracing::debug;

/// Page-level settings.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Page title.
    pub title: String,
    /// Number of last names to list; 0 hides the table.
    pub top_names: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            title: "Titanic Passenger Dashboard".to_string(),
            top_names: 10,
        }
    }
}

/// Aggregate the dataset and build every page section.
pub fn build_dashboard(
    dataset: &Dataset,
    options: &DashboardOptions,
    duration_seconds: f64,
) -> Dashboard {
    let passengers = &dataset.passengers;

    let demographics = survival_demographics(passengers);
    let families = family_groups(passengers);
    let names = last_name_counts(passengers);
    debug!(
        "Aggregated {} demographic rows, {} family groups, {} last names",
        demographics.rows.len(),
        families.len(),
        names.len()
    );

    let demographic_answer = match best_surviving_age_band(&demographics) {
        Some((band, rate)) => format!(
            "The age range with the highest average survival rate is {} ({:.0}%).",
            band,
            rate * 100.0
        ),
        None => {
            "No passenger with a recorded age survived, so no age range stands out.".to_string()
        }
    };

    let sections = vec![
        ChartSection {
            heading: "Titanic Visualization 1".to_string(),
            question: "Which age range has the highest average survival rate?".to_string(),
            explanation: demographic_answer,
            chart: demographic_chart(&demographics),
        },
        ChartSection {
            heading: "Titanic Visualization 2".to_string(),
            question: "How does the average fare change with family size in each class?"
                .to_string(),
            explanation: describe_highest_fare(&families),
            chart: family_fare_chart(&families),
        },
        ChartSection {
            heading: "Titanic Visualization Bonus".to_string(),
            question: "Which family sizes were most common, and in which classes?".to_string(),
            explanation: describe_common_family_size(&families),
            chart: family_size_chart(&families),
        },
    ];

    Dashboard {
        title: options.title.clone(),
        metadata: DashboardMetadata {
            source: dataset.source.to_string(),
            generated_at: Utc::now(),
            passengers: passengers.len(),
            unknown_age: demographics.unknown_age_total(),
            duration_seconds,
        },
        top_last_names: top_last_names(&names, options.top_names),
        demographics,
        families,
        sections,
    }
}

fn describe_highest_fare(families: &[FamilyRow]) -> String {
    let highest = families
        .iter()
        .filter_map(|row| row.avg_fare.map(|avg| (row, avg)))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match highest {
        Some((row, avg)) => format!(
            "The highest average fare, ${:.2}, was paid by class {} families of size {}.",
            avg, row.class, row.family_size
        ),
        None => "No fares were recorded.".to_string(),
    }
}

fn describe_common_family_size(families: &[FamilyRow]) -> String {
    let most_common = passengers_by_family_size(families)
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)));

    match most_common {
        Some((1, count)) => format!("Most passengers travelled alone ({} passengers).", count),
        Some((size, count)) => format!(
            "The most common family size was {} ({} passengers).",
            size, count
        ),
        None => "No family sizes were recorded.".to_string(),
    }
}
