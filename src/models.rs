//! Data models for the passenger dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing passengers, grouped statistics,
//! and the rendered dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket class of a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    /// All classes in ascending order.
    pub const ALL: [PassengerClass; 3] = [
        PassengerClass::First,
        PassengerClass::Second,
        PassengerClass::Third,
    ];

    /// Numeric class as it appears in the dataset (1, 2 or 3).
    pub fn number(&self) -> u8 {
        match self {
            PassengerClass::First => 1,
            PassengerClass::Second => 2,
            PassengerClass::Third => 3,
        }
    }

    /// Parse the dataset's numeric class.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PassengerClass::First),
            2 => Some(PassengerClass::Second),
            3 => Some(PassengerClass::Third),
            _ => None,
        }
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Sex of a passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Both values, female first.
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Parse a dataset value, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "female" => Some(Sex::Female),
            "male" => Some(Sex::Male),
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "female"),
            Sex::Male => write!(f, "male"),
        }
    }
}

/// Age band derived from a passenger's age.
///
/// Bands are lower-inclusive and upper-exclusive: `[0, 12)`, `[12, 19)`,
/// `[19, 59)` and `[59, inf)`. The derived `Ord` follows declaration order,
/// which is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    Child,
    Teen,
    Adult,
    Senior,
}

impl AgeBand {
    /// All bands in canonical order.
    pub const ALL: [AgeBand; 4] = [
        AgeBand::Child,
        AgeBand::Teen,
        AgeBand::Adult,
        AgeBand::Senior,
    ];

    /// Bucket an age. Missing ages have no band.
    pub fn from_age(age: Option<f64>) -> Option<Self> {
        let age = age?;
        if age.is_nan() || age < 0.0 {
            return None;
        }

        Some(if age < 12.0 {
            AgeBand::Child
        } else if age < 19.0 {
            AgeBand::Teen
        } else if age < 59.0 {
            AgeBand::Adult
        } else {
            AgeBand::Senior
        })
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeBand::Child => write!(f, "Child"),
            AgeBand::Teen => write!(f, "Teen"),
            AgeBand::Adult => write!(f, "Adult"),
            AgeBand::Senior => write!(f, "Senior"),
        }
    }
}

/// A single passenger record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique identifier.
    pub passenger_id: u32,
    /// Whether the passenger survived.
    pub survived: bool,
    /// Ticket class.
    pub class: PassengerClass,
    /// Sex.
    pub sex: Sex,
    /// Age in years, if known.
    pub age: Option<f64>,
    /// Siblings and spouses aboard.
    pub siblings_spouses: Option<u32>,
    /// Parents and children aboard.
    pub parents_children: Option<u32>,
    /// Ticket fare, if known.
    pub fare: Option<f64>,
    /// Full name in "Last, Title. First" form.
    pub name: String,
}

impl Passenger {
    /// Age band of this passenger, if the age is known.
    pub fn age_band(&self) -> Option<AgeBand> {
        AgeBand::from_age(self.age)
    }
}

/// Passenger and survivor counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurvivalCounts {
    pub n_passengers: usize,
    pub n_survivors: usize,
    /// `n_survivors / n_passengers`, or 0 for an empty group.
    pub survival_rate: f64,
}

impl SurvivalCounts {
    /// Build counts, computing the rate safely.
    pub fn new(n_passengers: usize, n_survivors: usize) -> Self {
        let survival_rate = if n_passengers == 0 {
            0.0
        } else {
            n_survivors as f64 / n_passengers as f64
        };

        Self {
            n_passengers,
            n_survivors,
            survival_rate,
        }
    }
}

/// Survival statistics for one (class, sex, age band) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    pub class: PassengerClass,
    pub sex: Sex,
    pub age_band: AgeBand,
    #[serde(flatten)]
    pub counts: SurvivalCounts,
}

/// Survival statistics for passengers of unknown age in one (class, sex) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownAgeRow {
    pub class: PassengerClass,
    pub sex: Sex,
    #[serde(flatten)]
    pub counts: SurvivalCounts,
}

/// Output of the demographic aggregation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    /// One row per (class, sex, age band), always 24 rows.
    pub rows: Vec<DemographicRow>,
    /// One row per (class, sex) for passengers with no recorded age, always 6 rows.
    pub unknown_age: Vec<UnknownAgeRow>,
}

impl Demographics {
    /// Total number of passengers with a missing age.
    pub fn unknown_age_total(&self) -> usize {
        self.unknown_age.iter().map(|r| r.counts.n_passengers).sum()
    }
}

/// Fare statistics for one observed (family size, class) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyRow {
    pub family_size: u32,
    pub class: PassengerClass,
    pub n_passengers: usize,
    /// Mean over passengers with a known fare.
    pub avg_fare: Option<f64>,
    pub min_fare: Option<f64>,
    pub max_fare: Option<f64>,
}

/// Number of passengers sharing a last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastNameCount {
    pub last_name: String,
    pub count: usize,
}

/// Metadata about a generated dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Where the dataset was loaded from (URL or file path).
    pub source: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Number of passengers loaded.
    pub passengers: usize,
    /// Number of passengers without a recorded age.
    pub unknown_age: usize,
    /// Time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// One page section: a question, a chart, and the answer text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSection {
    /// Section heading.
    pub heading: String,
    /// Question the chart answers.
    pub question: String,
    /// Short explanation shown under the chart.
    pub explanation: String,
    /// The chart itself.
    pub chart: crate::report::ChartSpec,
}

/// The complete dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    /// Page title.
    pub title: String,
    /// Metadata about the run.
    pub metadata: DashboardMetadata,
    /// Survival by class, sex and age band.
    pub demographics: Demographics,
    /// Fare statistics by family size and class.
    pub families: Vec<FamilyRow>,
    /// Most common last names.
    pub top_last_names: Vec<LastNameCount>,
    /// Chart sections in page order.
    pub sections: Vec<ChartSection>,
}
