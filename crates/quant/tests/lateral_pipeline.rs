//! Integration tests for the full analytics path:
//! prices → returns → distances → neighborhood → features / screening.

use quant::{
    DistanceMatrixBuilder, LateralEngine, ScreenConfig, build_distance_matrix,
    ewma_correlation_matrix, find_neighbors, return_panel, screen, transform_features,
};
use types::{
    InsiderBuyRecord, InsiderType, MetricType, MultiPanel, NaiveDate, OhlcvBar, PricePanel, Shares,
};

const DAYS: usize = 40;

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
}

fn daily_return(ticker: &str, i: usize) -> f64 {
    let x = i as f64;
    let a = 0.01 * (0.7 * x).sin() + 0.004 * (2.3 * x).sin();
    match ticker {
        "AAA" => a,
        "BBB" => 1.2 * a + 0.0003 * (5.1 * x).cos(),
        "CCC" => 0.01 * (1.3 * x).cos(),
        _ => 0.008 * (0.37 * x + 1.0).sin(),
    }
}

fn universe() -> MultiPanel {
    let panels = ["AAA", "BBB", "CCC", "DDD"]
        .iter()
        .enumerate()
        .map(|(k, &t)| {
            let mut close = 100.0_f64;
            let bars = (0..DAYS)
                .map(|i| {
                    close *= daily_return(t, i).exp();
                    // Independent high and low spreads keep the canonical block full rank.
                    let x = i as f64 + 3.0 * k as f64;
                    let up = 1.0 + 0.005 * (1.0 + (1.7 * x).sin().powi(2));
                    let down = 1.0 + 0.004 * (1.0 + (0.9 * x + 0.5).cos().powi(2));
                    OhlcvBar::new(day(i), close, close * up, close / down, close, 1_000)
                })
                .collect();
            PricePanel::new(t, bars).unwrap()
        })
        .collect();
    MultiPanel::from_panels(panels).unwrap()
}

#[test]
fn pairwise_and_panel_paths_agree() {
    let returns = return_panel(&universe(), true).unwrap();
    let pairwise = build_distance_matrix(&returns, MetricType::Ewma { span: 20 }).unwrap();
    let panel = ewma_correlation_matrix(&returns, 20).unwrap().to_distance();

    for i in 0..pairwise.len() {
        for j in 0..pairwise.len() {
            assert!(
                (pairwise.get(i, j) - panel.get(i, j)).abs() < 1e-10,
                "({i}, {j}): {} vs {}",
                pairwise.get(i, j),
                panel.get(i, j)
            );
        }
    }
}

#[test]
fn neighborhood_ranking_matches_distances() {
    let returns = return_panel(&universe(), false).unwrap();
    let matrix = DistanceMatrixBuilder::new(MetricType::EWMA_DEFAULT)
        .build(&returns)
        .unwrap();

    let hood = find_neighbors(&matrix, "AAA", 2).unwrap();
    assert_eq!(hood.neighbors, vec!["BBB", "DDD"]);

    let d_bbb = matrix.between("AAA", "BBB").unwrap();
    let d_ddd = matrix.between("AAA", "DDD").unwrap();
    assert_eq!(hood.distances, vec![d_bbb, d_ddd]);
    let expected = 2.0 / (d_bbb * d_bbb + d_ddd * d_ddd);
    assert!((hood.tightness - expected).abs() < 1e-9 * expected);
}

#[test]
fn canonical_metric_builds_valid_matrix() {
    let returns = return_panel(&universe(), false).unwrap();
    let matrix = build_distance_matrix(&returns, MetricType::Canonical).unwrap();
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 0.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            assert!(matrix.get(i, j) > -1e-9 && matrix.get(i, j) < 1.0 + 1e-9);
        }
    }
    // BBB is close to a linear map of AAA, so its canonical score is near one.
    assert!(matrix.between("AAA", "BBB").unwrap() < 0.05);
}

#[test]
fn engine_screens_and_extracts_features() {
    let mut engine = LateralEngine::new(universe()).unwrap();
    let metric = MetricType::Ewma { span: 30 };

    let director = [InsiderType::Director].into_iter().collect();
    let buys = vec![
        InsiderBuyRecord::new("acc-1", "CCC", day(10), day(12), director, Shares(500), 20.0).unwrap(),
        InsiderBuyRecord::new(
            "acc-2",
            "AAA",
            day(15),
            day(17),
            [InsiderType::Officer].into_iter().collect(),
            Shares(100),
            99.0,
        )
        .unwrap(),
    ];

    let outcome = screen(
        &buys,
        engine.distances(metric).unwrap(),
        &ScreenConfig {
            k: 1,
            start_date: Some(day(5)),
        },
    );
    assert_eq!(outcome.candidates.len(), 2);
    assert_eq!(outcome.candidates[0].record.ticker, "AAA");

    let hood = &outcome.candidates[0].neighborhood;
    let features = engine.features(hood).unwrap();
    let direct = transform_features(&universe().select(&["AAA", "BBB"]).unwrap()).unwrap();
    assert_eq!(features, direct);
    assert_eq!(features.nrows(), DAYS);
}
