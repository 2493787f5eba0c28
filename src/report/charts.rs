//! Declarative chart specifications.
//!
//! Builders turn aggregator output into a [`ChartSpec`]: chart kind, axis
//! bindings, color encoding, labels and inline data. The spec is rendered
//! to Vega-Lite JSON for the page; no builder does any grouping of its own
//! beyond the final roll-up it plots.

use crate::analysis::average_survival_by_age_band;
use crate::models::{AgeBand, Demographics, FamilyRow, PassengerClass};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Mark type of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// How a bound field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Nominal,
    Ordinal,
    Quantitative,
}

/// Binding of a data field to a positional axis or the color channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    /// Data field name.
    pub field: String,
    /// Axis or legend title.
    pub label: String,
    /// Field interpretation.
    pub field_type: FieldType,
    /// d3-format string for tick labels, e.g. `.0%`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_format: Option<String>,
    /// Explicit category order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
}

impl Encoding {
    fn new(field: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            field_type,
            tick_format: None,
            sort: None,
        }
    }

    fn with_tick_format(mut self, format: &str) -> Self {
        self.tick_format = Some(format.to_string());
        self
    }

    fn with_sort<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.sort = Some(order.into_iter().map(|s| s.to_string()).collect());
        self
    }

    fn to_vega_lite(&self, is_color: bool) -> Value {
        let mut channel = Map::new();
        channel.insert("field".into(), json!(self.field));
        channel.insert("type".into(), json!(self.field_type));
        channel.insert("title".into(), json!(self.label));

        if let Some(ref order) = self.sort {
            channel.insert("sort".into(), json!(order));
        }

        if let Some(ref format) = self.tick_format {
            let key = if is_color { "legend" } else { "axis" };
            channel.insert(key.into(), json!({ "format": format }));
        }

        Value::Object(channel)
    }
}

/// A complete chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x: Encoding,
    pub y: Encoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Encoding>,
    /// Draw point markers on line charts.
    pub markers: bool,
    /// Stack bars that share an x value.
    pub stacked: bool,
    /// Inline data rows, one JSON object per datum.
    pub data: Vec<Value>,
}

impl ChartSpec {
    /// Render as a Vega-Lite v5 specification.
    pub fn to_vega_lite(&self) -> Value {
        let mut encoding = Map::new();
        encoding.insert("x".into(), self.x.to_vega_lite(false));

        let mut y = self.y.to_vega_lite(false);
        if self.kind == ChartKind::Bar {
            if let Value::Object(ref mut channel) = y {
                let stack = if self.stacked {
                    json!("zero")
                } else {
                    Value::Null
                };
                channel.insert("stack".into(), stack);
            }
        }
        encoding.insert("y".into(), y);

        if let Some(ref color) = self.color {
            encoding.insert("color".into(), color.to_vega_lite(true));
        }

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": self.title,
            "width": "container",
            "height": 360,
            "data": { "values": self.data },
            "mark": {
                "type": self.kind,
                "point": self.markers,
                "tooltip": true,
            },
            "encoding": encoding,
        })
    }
}

/// Bar chart of the mean survival rate per age band.
pub fn demographic_chart(demographics: &Demographics) -> ChartSpec {
    let data = average_survival_by_age_band(demographics)
        .into_iter()
        .map(|(band, rate)| {
            json!({
                "age_group": band.to_string(),
                "avg_survival_rate": rate,
            })
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Average Survival Rates by Age Group".to_string(),
        x: age_group_encoding(FieldType::Ordinal),
        y: Encoding::new(
            "avg_survival_rate",
            "Average Survival Rate",
            FieldType::Quantitative,
        )
        .with_tick_format(".0%"),
        color: Some(age_group_encoding(FieldType::Nominal)),
        markers: false,
        stacked: false,
        data,
    }
}

/// Line chart of average fare by family size, one line per class.
///
/// Groups without any known fare have nothing to plot and are left out.
pub fn family_fare_chart(rows: &[FamilyRow]) -> ChartSpec {
    let data = rows
        .iter()
        .filter_map(|row| {
            row.avg_fare.map(|avg| {
                json!({
                    "family_size": row.family_size,
                    "pclass": row.class.to_string(),
                    "avg_fare": avg,
                    "n_passengers": row.n_passengers,
                })
            })
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Line,
        title: "Average Fare by Family Size and Class".to_string(),
        x: Encoding::new("family_size", "Family Size", FieldType::Quantitative),
        y: Encoding::new("avg_fare", "Average Fare", FieldType::Quantitative)
            .with_tick_format("$.2f"),
        color: Some(class_encoding()),
        markers: true,
        stacked: false,
        data,
    }
}

/// Stacked bar chart of passenger counts by family size and class.
pub fn family_size_chart(rows: &[FamilyRow]) -> ChartSpec {
    let data = rows
        .iter()
        .map(|row| {
            json!({
                "family_size": row.family_size,
                "pclass": row.class.to_string(),
                "n_passengers": row.n_passengers,
            })
        })
        .collect();

    ChartSpec {
        kind: ChartKind::Bar,
        title: "Passengers by Family Size and Class".to_string(),
        x: Encoding::new("family_size", "Family Size", FieldType::Ordinal),
        y: Encoding::new("n_passengers", "Passengers", FieldType::Quantitative),
        color: Some(class_encoding()),
        markers: false,
        stacked: true,
        data,
    }
}

fn age_group_encoding(field_type: FieldType) -> Encoding {
    Encoding::new("age_group", "Age Group", field_type).with_sort(AgeBand::ALL)
}

fn class_encoding() -> Encoding {
    Encoding::new("pclass", "Class", FieldType::Nominal).with_sort(PassengerClass::ALL)
}
