//! Integration tests: end-to-end drift report scenarios.

use ds_core::{AnalysisConfig, Column, Dataset, SemanticType, TypeSchema, Value};
use ds_io::{SourceConfig, TableFormat};
use ds_profile::NativeProfiler;
use ds_report::{analyze_column, analyze_columns, generate_report, DatasetSource, ReportOptions};
use ds_store::ColumnStore;
use serde_json::json;
use std::path::PathBuf;

fn temp_path(stem: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{stem}_{}.{ext}", std::process::id()))
}

fn schema() -> TypeSchema {
    TypeSchema::new()
        .with("date", SemanticType::TimeSeries)
        .with("category", SemanticType::Categorical)
        .with("sales", SemanticType::TimeSeries)
        .with("amount", SemanticType::Numeric)
}

fn config() -> AnalysisConfig {
    AnalysisConfig::new("date", 4, schema()).unwrap()
}

#[test]
fn scenario_new_categorical_value_is_reported() {
    let profiler = NativeProfiler::new(4);
    let original = Column::from_strs(&["a", "b"]);
    let new = Column::from_strs(&["a", "c"]);

    let record = analyze_column(&original, &new, "category", &config(), &profiler).unwrap();
    assert_eq!(record.get("new_values"), Some(&json!(["c"])));
}

#[test]
fn scenario_constant_timeseries_is_not_flagged() {
    // Identical constant value over well more than two periods on both
    // sides: the decomposition trend is constant, every paired difference
    // is zero, and the degenerate test resolves to "no change".
    let profiler = NativeProfiler::new(4);
    let original = Column::from_f64(&[2.5; 16]);
    let new = Column::from_f64(&[2.5; 16]);

    let record = analyze_column(&original, &new, "sales", &config(), &profiler).unwrap();
    assert_eq!(record.get("trend_significant_change"), Some(&json!(false)));
}

#[test]
fn scenario_trend_shift_is_flagged() {
    let profiler = NativeProfiler::new(4);
    let original = Column::from_f64(&[10.0; 24]);
    let ramp: Vec<f64> = (0..24).map(|i| 10.0 + 3.0 * i as f64).collect();
    let new = Column::from_f64(&ramp);

    let record = analyze_column(&original, &new, "sales", &config(), &profiler).unwrap();
    assert_eq!(record.get("trend_significant_change"), Some(&json!(true)));
}

#[test]
fn scenario_missingness_metrics() {
    // A numeric column with p_missing = 0.2 and mean = 10 must yield
    // numeric_missing_impact = 2.0 and data_completeness = 0.8.
    let profiler = NativeProfiler::new(4);
    let cells = vec![
        Value::Float(8.0),
        Value::Float(9.0),
        Value::Float(10.0),
        Value::Float(13.0),
        Value::Null,
    ];
    let column = Column::new(cells);

    let record = analyze_column(&column, &column, "amount", &config(), &profiler).unwrap();
    assert_eq!(record.get("p_missing"), Some(&json!(0.2)));
    assert_eq!(record.get("mean"), Some(&json!(10.0)));
    assert_eq!(record.get("numeric_missing_impact"), Some(&json!(2.0)));
    assert_eq!(record.get("data_completeness"), Some(&json!(0.8)));
}

fn snapshot(constant_sales: bool) -> Dataset {
    let rows = 16;
    let dates: Vec<Value> = (0..rows).map(|i| Value::Int(i as i64)).collect();
    let categories: Vec<Value> = (0..rows)
        .map(|i| Value::Str((if constant_sales { "old" } else { "new" }).to_string().repeat(1 + i % 2)))
        .collect();
    let sales: Vec<Value> = (0..rows)
        .map(|i| Value::Float(if constant_sales { 5.0 } else { 5.0 + i as f64 }))
        .collect();
    let amounts: Vec<Value> = (0..rows).map(|i| Value::Float((i % 5) as f64)).collect();
    Dataset::from_columns(vec![
        ("date".to_string(), Column::new(dates)),
        ("category".to_string(), Column::new(categories)),
        ("sales".to_string(), Column::new(sales)),
        ("amount".to_string(), Column::new(amounts)),
    ])
    .unwrap()
}

#[test]
fn full_run_produces_one_row_per_analyzed_column() {
    let mut original = DatasetSource::from(snapshot(true));
    let mut new = DatasetSource::from(snapshot(false));
    let profiler = NativeProfiler::new(4);

    let table = analyze_columns(&mut original, &mut new, &config(), &profiler).unwrap();
    assert_eq!(table.len(), 3); // date excluded

    let columns = table.columns();
    assert_eq!(columns[0], "column_name");
    assert!(columns.contains(&"new_values".to_string()));
    assert!(columns.contains(&"trend_significant_change".to_string()));
    assert!(columns.contains(&"data_completeness".to_string()));

    // Union-of-columns: the categorical row has no trend field.
    assert!(table.cell(0, "trend_significant_change").is_null());
    assert_eq!(table.cell(1, "trend_significant_change"), &json!(true));
    // The numeric row carries neither drift field.
    assert!(table.cell(2, "new_values").is_null());
    assert!(table.cell(2, "trend_significant_change").is_null());
}

#[test]
fn spilled_run_matches_in_memory_run() {
    let profiler = NativeProfiler::new(4);

    let mut in_memory_original = DatasetSource::from(snapshot(true));
    let mut in_memory_new = DatasetSource::from(snapshot(false));
    let expected =
        analyze_columns(&mut in_memory_original, &mut in_memory_new, &config(), &profiler)
            .unwrap();

    let mut spilled_original =
        DatasetSource::Spilled(ColumnStore::create(&snapshot(true)).unwrap());
    let mut spilled_new = DatasetSource::Spilled(ColumnStore::create(&snapshot(false)).unwrap());
    let got =
        analyze_columns(&mut spilled_original, &mut spilled_new, &config(), &profiler).unwrap();

    assert_eq!(got.columns(), expected.columns());
    assert_eq!(got.rows(), expected.rows());
}

#[test]
fn generate_report_round_trips_through_csv() {
    let original_path = temp_path("ds_report_original", "csv");
    let new_path = temp_path("ds_report_new", "csv");
    let output_path = temp_path("ds_report_out", "csv");

    ds_io::write_table(
        &snapshot(true),
        &SourceConfig::new(TableFormat::Csv, original_path.to_str().unwrap()),
    )
    .unwrap();
    ds_io::write_table(
        &snapshot(false),
        &SourceConfig::new(TableFormat::Csv, new_path.to_str().unwrap()),
    )
    .unwrap();

    let options = ReportOptions {
        original: SourceConfig::new(TableFormat::Csv, original_path.to_str().unwrap()),
        new: SourceConfig::new(TableFormat::Csv, new_path.to_str().unwrap()),
        output: Some(SourceConfig::new(TableFormat::Csv, output_path.to_str().unwrap())),
        spill_columns: true,
    };
    let table = generate_report(&options, &config()).unwrap();
    assert_eq!(table.len(), 3);

    let written = ds_io::read_table(&SourceConfig::new(
        TableFormat::Csv,
        output_path.to_str().unwrap(),
    ))
    .unwrap();
    assert_eq!(written.n_rows(), 3);
    assert_eq!(written.column_names()[0], "column_name");

    for path in [&original_path, &new_path, &output_path] {
        std::fs::remove_file(path).unwrap();
    }
}
