//! Plotly-compatible figure description.
//!
//! The browser hands this JSON straight to `Plotly.newPlot`, so field names
//! follow Plotly's schema.

use crate::db::result_set::Value;
use serde::Serialize;

pub const BAR_COLOR: &str = "rgb(55, 83, 109)";
pub const BAR_LINE_COLOR: &str = "rgb(8,48,107)";
pub const BAR_LINE_WIDTH: f64 = 1.5;
pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<BarTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<Value>,
    pub y: Vec<Option<f64>>,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: &'static str,
    pub line: MarkerLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerLine {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub plot_bgcolor: &'static str,
    pub width: u32,
    pub height: u32,
    pub showlegend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub x: f64,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

impl Figure {
    /// Single-series bar chart in the house style.
    pub fn bar(x: Vec<Value>, y: Vec<Option<f64>>, title: &str, x_title: &str, y_title: &str) -> Self {
        Self {
            data: vec![BarTrace {
                kind: "bar",
                x,
                y,
                marker: Marker {
                    color: BAR_COLOR,
                    line: MarkerLine {
                        color: BAR_LINE_COLOR,
                        width: BAR_LINE_WIDTH,
                    },
                },
            }],
            layout: Layout {
                title: Title {
                    text: title.to_string(),
                    x: 0.5,
                    xanchor: "center",
                },
                xaxis: Axis {
                    title: AxisTitle { text: x_title.to_string() },
                },
                yaxis: Axis {
                    title: AxisTitle { text: y_title.to_string() },
                },
                plot_bgcolor: "white",
                width: WIDTH,
                height: HEIGHT,
                showlegend: false,
            },
        }
    }
}
