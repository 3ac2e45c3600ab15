pub mod figure;

use crate::db::result_set::ResultSet;
use crate::error::PipelineError;
use figure::Figure;
use serde::Serialize;
use tracing::debug;

/// The default chart picked for a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub category_column: String,
    pub value_column: String,
    pub title: String,
    pub figure: Figure,
}

impl ChartSpec {
    pub fn bar_count(&self) -> usize {
        self.figure.data.iter().map(|trace| trace.x.len()).sum()
    }
}

/// Picks a bar chart for `results`: the first column on the category axis
/// and the first numeric column as the bar height.
///
/// Returns `None` for an empty result set or one without numeric columns.
/// Fails when a row is too short to hold either chosen column.
pub fn visualize(results: &ResultSet, title: &str) -> Result<Option<ChartSpec>, PipelineError> {
    if results.is_empty() {
        return Ok(None);
    }

    let Some(value_idx) = results.columns.iter().position(|c| c.column_type.is_numeric()) else {
        debug!("No numeric column, skipping chart");
        return Ok(None);
    };
    let category_idx = 0;

    let category_column = results.columns[category_idx].name.clone();
    let value_column = results.columns[value_idx].name.clone();

    let mut x = Vec::with_capacity(results.row_count());
    let mut y = Vec::with_capacity(results.row_count());
    for (i, row) in results.rows.iter().enumerate() {
        let (Some(category), Some(value)) = (row.get(category_idx), row.get(value_idx)) else {
            return Err(PipelineError::Visualization(
                format!(
                    "row {} has {} values but the result has {} columns",
                    i,
                    row.len(),
                    results.columns.len()
                )
                .into(),
            ));
        };
        x.push(category.clone());
        y.push(value.as_f64());
    }

    debug!("Charting {} by {} ({} bars)", value_column, category_column, x.len());
    let figure = Figure::bar(x, y, title, &category_column, &value_column);

    Ok(Some(ChartSpec {
        category_column,
        value_column,
        title: title.to_string(),
        figure,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::result_set::{Column, ColumnType, Value};
    use crate::error::Stage;

    #[test]
    fn region_sales_scenario() {
        let results = ResultSet::from_records(
            &["region", "sales"],
            vec![vec!["East".into(), 100.into()], vec!["West".into(), 150.into()]],
        );

        let chart = visualize(&results, "sales by region").unwrap().unwrap();

        assert_eq!(chart.category_column, "region");
        assert_eq!(chart.value_column, "sales");
        assert_eq!(chart.title, "sales by region");
        assert_eq!(chart.bar_count(), 2);
        assert_eq!(chart.figure.data[0].x, vec![Value::from("East"), Value::from("West")]);
        assert_eq!(chart.figure.data[0].y, vec![Some(100.0), Some(150.0)]);
    }

    #[test]
    fn empty_results_have_no_chart() {
        let results = ResultSet::new(
            vec![Column { name: "sales".into(), column_type: ColumnType::Integer }],
            Vec::new(),
        );
        assert!(visualize(&results, "t").unwrap().is_none());
    }

    #[test]
    fn no_numeric_column_means_no_chart() {
        let results = ResultSet::from_records(
            &["artist", "album"],
            vec![vec!["Queen".into(), "Jazz".into()]],
        );
        assert!(visualize(&results, "t").unwrap().is_none());
    }

    #[test]
    fn category_is_first_column_even_when_numeric() {
        let results = ResultSet::from_records(
            &["year", "label", "revenue"],
            vec![vec![2023.into(), "a".into(), 1.5.into()], vec![2024.into(), "b".into(), 2.5.into()]],
        );

        let chart = visualize(&results, "t").unwrap().unwrap();

        assert_eq!(chart.category_column, "year");
        assert_eq!(chart.value_column, "year");
    }

    #[test]
    fn nulls_become_gaps() {
        let results = ResultSet::new(
            vec![
                Column { name: "region".into(), column_type: ColumnType::Text },
                Column { name: "sales".into(), column_type: ColumnType::Decimal },
            ],
            vec![vec!["East".into(), Value::Null], vec![Value::Null, 2.0.into()]],
        );

        let chart = visualize(&results, "t").unwrap().unwrap();

        assert_eq!(chart.figure.data[0].x, vec![Value::from("East"), Value::Null]);
        assert_eq!(chart.figure.data[0].y, vec![None, Some(2.0)]);
    }

    #[test]
    fn ragged_rows_fail_with_visualization_label() {
        let results = ResultSet::new(
            vec![
                Column { name: "region".into(), column_type: ColumnType::Text },
                Column { name: "sales".into(), column_type: ColumnType::Integer },
            ],
            vec![vec!["East".into(), 100.into()], vec!["West".into()]],
        );

        let err = visualize(&results, "t").unwrap_err();

        assert_eq!(err.stage(), Stage::Visualization);
        assert_eq!(
            err.to_string(),
            "Visualization error: row 1 has 1 values but the result has 2 columns"
        );
    }

    #[test]
    fn figure_uses_fixed_bar_style() {
        let results = ResultSet::from_records(&["region", "sales"], vec![vec!["East".into(), 100.into()]]);
        let chart = visualize(&results, "top regions").unwrap().unwrap();

        let json = serde_json::to_value(&chart.figure).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["marker"]["color"], "rgb(55, 83, 109)");
        assert_eq!(json["data"][0]["marker"]["line"]["color"], "rgb(8,48,107)");
        assert_eq!(json["data"][0]["marker"]["line"]["width"], 1.5);
        assert_eq!(json["layout"]["title"]["text"], "top regions");
        assert_eq!(json["layout"]["title"]["x"], 0.5);
        assert_eq!(json["layout"]["title"]["xanchor"], "center");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "region");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "sales");
        assert_eq!(json["layout"]["plot_bgcolor"], "white");
        assert_eq!(json["layout"]["width"], 800);
        assert_eq!(json["layout"]["height"], 500);
        assert_eq!(json["layout"]["showlegend"], false);
    }
}
