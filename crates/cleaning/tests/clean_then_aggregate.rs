use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tickbar_bars::{CsvBarSink, IntervalAggregator};
use tickbar_cleaning::CleaningPipeline;
use tickbar_core::Tick;

fn at(secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + Duration::seconds(secs)
}

fn dirty_ticks() -> Vec<Tick> {
    vec![
        Tick::new(at(0), 100.0, 2),
        Tick::new(at(10), -101.0, 1),
        Tick::new(at(20), 10.25, 3), // dropped decimal
        Tick::new(at(30), 0.0, 1),  // missing
        Tick::new(at(40), 99.0, 1),
        Tick::new(at(40), 103.0, 3), // same timestamp
        Tick::new(at(70), 104.0, 2),
        Tick::new(at(75), 0.0, 5),
        Tick::new(at(80), 102.0, 1),
        // Nothing in [120, 180)
        Tick::new(at(190), 101.0, 4),
        Tick::new(at(300), 100.5, 1),
    ]
}

#[test]
fn test_clean_then_aggregate() {
    let mut ticks = dirty_ticks();
    let report = CleaningPipeline::default().clean(&mut ticks).unwrap();

    assert_eq!(report.sign_flips, 1);
    assert_eq!(report.magnitude_corrections, 1);
    assert_eq!(report.gaps_filled, 2);
    assert_eq!(report.duplicates_merged, 1);
    assert_eq!(ticks.len(), 10);
    assert!(ticks.iter().all(|t| t.price > 0.0));

    let aggregator = IntervalAggregator::unbounded(Duration::minutes(1)).unwrap();
    let bars = aggregator.aggregate_to_vec(&ticks).unwrap();

    // [0,60), [60,120), [180,240); [120,180) is empty and [240,300) is never
    // reached because it ends at the last tick.
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].interval_start, at(0));
    assert_eq!(bars[1].interval_start, at(60));
    assert_eq!(bars[2].interval_start, at(180));

    let first = &bars[0];
    assert_relative_eq!(first.open, 100.0);
    assert_relative_eq!(first.high, 102.5);
    assert_relative_eq!(first.low, 100.0);
    // (99*1 + 103*3) / 4
    assert_relative_eq!(first.close, 102.0);
    assert_eq!(first.volume, 2 + 1 + 3 + 1 + 4);

    let second = &bars[1];
    assert_relative_eq!(second.open, 104.0);
    assert_relative_eq!(second.high, 104.0);
    assert_relative_eq!(second.low, 102.0);
    assert_relative_eq!(second.close, 102.0);
    assert_eq!(second.volume, 8);

    assert_eq!(bars[2].volume, 4);

    let total_volume: u64 = bars.iter().map(|b| b.volume).sum();
    assert_eq!(total_volume, 23);
}

#[test]
fn test_cleaned_bars_to_csv() {
    let mut ticks = dirty_ticks();
    CleaningPipeline::default().clean(&mut ticks).unwrap();

    let aggregator = IntervalAggregator::unbounded(Duration::minutes(1)).unwrap();
    let mut sink = CsvBarSink::new(Vec::new()).unwrap();
    let emitted = aggregator.aggregate(&ticks, &mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(emitted, 3);
    assert_eq!(lines.len(), emitted + 1);
    assert_eq!(lines[0], "timestamp,open,high,low,close,volume");
    assert_eq!(lines[1], "2024-01-02 09:30:00,100,102.5,100,102,11");
    assert!(lines[3].starts_with("2024-01-02 09:33:00,101,101,101,101,4"));
}
