//! Property tests over the aggregation, filtering, forecast and risk stages

use approx::assert_relative_eq;
use proptest::prelude::*;
use softintel_analytics::aggregation::{aggregate, count_by, rank_descending, top_n, Operator};
use softintel_analytics::dashboard::{CubeQuery, KpiSummary};
use softintel_analytics::filter::{filter_by_year, FilterValue};
use softintel_analytics::forecast::simulate_defect_forecast;
use softintel_analytics::generator::generate_dataset;
use softintel_analytics::record::{Dimension, Metric, ProjectRecord};
use softintel_analytics::risk::select_top_risks;

const STACKS: [&str; 4] = ["Python / Django", "Java Spring", "PHP / Laravel", "React / Node.js"];
const STATUSES: [&str; 3] = ["Completado", "Cancelado", "Retrasado"];

prop_compose! {
    fn arb_record()(
        client in 0usize..8,
        stack in 0usize..STACKS.len(),
        status in 0usize..STATUSES.len(),
        year in 2020i32..2025,
        revenue in 0.0f64..1_000_000.0,
        cost in 0.0f64..1_000_000.0,
        budget in 0.0f64..1_000_000.0,
        roi in -100.0f64..200.0,
        nps in 0.0f64..10.0,
        defects in 0u32..100,
    ) -> ProjectRecord {
        ProjectRecord::new(
            format!("Cliente {}", client),
            STACKS[stack],
            STATUSES[status],
            year,
            revenue,
            cost,
            budget,
            roi,
            nps,
            defects,
        )
    }
}

fn arb_records() -> impl Strategy<Value = Vec<ProjectRecord>> {
    prop::collection::vec(arb_record(), 0..60)
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop::sample::select(Dimension::ALL.to_vec())
}

fn arb_metric() -> impl Strategy<Value = Metric> {
    prop::sample::select(Metric::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_partition_sum(records in arb_records(), dimension in arb_dimension(), metric in arb_metric()) {
        let grouped = aggregate(&records, dimension, metric, Operator::Sum);
        let direct: f64 = records.iter().map(|r| metric.value_of(r)).sum();
        assert_relative_eq!(grouped.total(), direct, epsilon = 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn test_count_sums_to_len(records in arb_records(), dimension in arb_dimension()) {
        let counts = count_by(&records, dimension);
        prop_assert_eq!(counts.total() as usize, records.len());
        prop_assert!(counts.values().all(|v| v >= 1.0));
    }

    #[test]
    fn test_rank_descending_is_non_increasing(records in arb_records(), metric in arb_metric()) {
        let ranked = rank_descending(aggregate(&records, Dimension::Client, metric, Operator::Mean));
        let values: Vec<f64> = ranked.values().collect();
        prop_assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_top_n_length(records in arb_records(), n in 0usize..20) {
        let grouped = aggregate(&records, Dimension::Stack, Metric::Ingresos, Operator::Sum);
        let len = grouped.len();
        prop_assert_eq!(top_n(grouped, n).len(), n.min(len));
    }

    #[test]
    fn test_risks_are_negative_and_sorted(records in arb_records(), n in 0usize..10) {
        let risks = select_top_risks(&records, n);
        let negatives = records.iter().filter(|r| r.roi < 0.0).count();
        prop_assert_eq!(risks.len(), n.min(negatives));
        prop_assert!(risks.iter().all(|r| r.roi < 0.0));
        prop_assert!(risks.windows(2).all(|w| w[0].roi <= w[1].roi));
    }

    #[test]
    fn test_year_filter_number_or_string(records in arb_records(), year in 2019i32..2026) {
        let by_number = filter_by_year(&records, &FilterValue::from(year));
        let by_string = filter_by_year(&records, &FilterValue::from(year.to_string()));
        prop_assert_eq!(&*by_number, &*by_string);
        prop_assert!(by_number.iter().all(|r| r.year == year));
    }

    #[test]
    fn test_all_years_filter_is_identity(records in arb_records()) {
        let all = filter_by_year(&records, &FilterValue::from("todos"));
        prop_assert_eq!(&*all, records.as_slice());
    }

    #[test]
    fn test_forecast_is_finite_and_non_negative(months in 0u32..120, defects in 0.0f64..10_000.0) {
        let forecast = simulate_defect_forecast(months, defects);
        prop_assert_eq!(forecast.points.len(), months as usize + 1);
        prop_assert_eq!(forecast.points[0].expected_defects, 0.0);
        prop_assert!(forecast.points.iter().all(|p| p.expected_defects.is_finite() && p.expected_defects >= 0.0));
        prop_assert!(forecast.peak_month <= months);
    }
}

#[test]
fn test_reference_forecast() {
    let forecast = simulate_defect_forecast(12, 100.0);
    assert_eq!(forecast.points.len(), 13);
    assert_eq!(forecast.points[0].expected_defects, 0.0);
    assert_eq!(forecast.peak_month, 4);

    let degenerate = simulate_defect_forecast(0, 100.0);
    assert_eq!(degenerate.points.len(), 1);
    assert_eq!(degenerate.points[0].month, 0);
    assert_eq!(degenerate.points[0].expected_defects, 0.0);
}

#[test]
fn test_empty_kpis() {
    let kpis = KpiSummary::from_records(&[]);
    assert_eq!(kpis.mean_roi, 0.0);
    assert_eq!(kpis.project_count, 0);
}

#[test]
fn test_generated_dataset_through_cube() {
    let records = generate_dataset(500, 42);
    assert_eq!(records, generate_dataset(500, 42));
    assert!(records.iter().all(|r| r.budget >= 0.0 && r.cost >= 0.0 && r.revenue >= 0.0));

    let view = CubeQuery { dimension: Dimension::Client, metric: Metric::Roi, rows: 15 }.run(&records);
    assert_eq!(view.table.operator, Operator::Mean);
    assert_eq!(view.table.len(), 15);
    let values: Vec<f64> = view.table.values().collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
}
