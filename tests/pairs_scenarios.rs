use indexmap::IndexMap;
use pears::core::density::{Density1d, Density2d, DensityError, DensityEstimator};
use pears::core::limits::min_max;
use pears::render::Axis;
use pears::render::figure::Artist;
use pears::{Key, PairsConfig, PairsError, PairsPlot, Variables};
use rand::prelude::*;

fn uniform_columns(vars: usize, samples: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..vars)
        .map(|k| {
            (0..samples)
                .map(|_| k as f64 * 3.0 + rng.random_range(-1.0..1.0))
                .collect()
        })
        .collect()
}

#[test]
fn two_variables_min_max_with_scatter() {
    let cols = uniform_columns(2, 500, 1);
    let fig = PairsPlot::default()
        .render(&cols, &Variables::default())
        .unwrap();

    for i in 0..2 {
        let p = fig.panel(i, i).unwrap();
        assert_eq!(p.curves().count(), 1);
        assert_eq!(p.x_axis.limits, min_max(&cols[i]));
    }

    let lower = fig.panel(1, 0).unwrap();
    let kinds: Vec<&str> = lower
        .artists
        .iter()
        .map(|a| match a {
            Artist::Scatter { .. } => "scatter",
            Artist::Contour(_) => "contour",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["scatter", "contour"]);
    assert_eq!(lower.x_axis.limits, min_max(&cols[0]));
    assert_eq!(lower.y_axis.limits, min_max(&cols[1]));

    assert!(!fig.panel(0, 1).unwrap().visible);
    assert!(fig.panel(0, 1).unwrap().artists.is_empty());
}

#[test]
fn truth_length_mismatch_is_a_contract_violation() {
    let cols = uniform_columns(3, 100, 2);
    let truths = [0.0, 1.0];
    let vars = Variables {
        truths: Some(&truths),
        ..Default::default()
    };
    let err = PairsPlot::default().render(&cols, &vars).unwrap_err();
    assert!(matches!(err, PairsError::ContractViolation(_)), "{err}");
}

#[test]
fn label_length_mismatch_is_a_contract_violation() {
    let cols = uniform_columns(2, 100, 3);
    let labels = vec!["only one".to_string()];
    let vars = Variables {
        labels: Some(&labels),
        ..Default::default()
    };
    let err = PairsPlot::default().render(&cols, &vars).unwrap_err();
    assert!(matches!(err, PairsError::ContractViolation(_)));
}

#[test]
fn empty_index_set_is_a_contract_violation() {
    let cols = uniform_columns(2, 100, 4);
    let vars = Variables {
        indices: Some(&[]),
        ..Default::default()
    };
    let err = PairsPlot::default().render(&cols, &vars).unwrap_err();
    assert!(matches!(err, PairsError::ContractViolation(_)));
}

#[test]
fn named_dataset_resolves_keys_and_reports_missing_ones() {
    let cols = uniform_columns(3, 200, 5);
    let named: IndexMap<String, Vec<f64>> = ["alpha", "beta", "gamma"]
        .iter()
        .map(|s| s.to_string())
        .zip(cols)
        .collect();

    let indices = [Key::from("gamma"), Key::from("alpha")];
    let vars = Variables {
        indices: Some(&indices),
        ..Default::default()
    };
    let fig = PairsPlot::default().render(&named, &vars).unwrap();
    assert_eq!(fig.n(), 2);
    let label = fig.panel(1, 0).unwrap().axis(Axis::Y).shown_label().unwrap();
    assert_eq!(label.text, "alpha");
    assert_eq!(fig.panel(1, 0).unwrap().x_axis.limits, min_max(&named["gamma"]));

    let missing = [Key::from("alpha"), Key::from("delta")];
    let vars = Variables {
        indices: Some(&missing),
        ..Default::default()
    };
    let err = PairsPlot::default().render(&named, &vars).unwrap_err();
    match err {
        PairsError::IndexResolution { key } => assert_eq!(key, Key::from("delta")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_indices_are_plotted_verbatim() {
    let cols = uniform_columns(2, 200, 6);
    let indices = [Key::from(1usize), Key::from(1usize)];
    let vars = Variables {
        indices: Some(&indices),
        ..Default::default()
    };
    let fig = PairsPlot::default().render(&cols, &vars).unwrap();
    assert_eq!(fig.n(), 2);
    assert_eq!(fig.panel(0, 0).unwrap().x_axis.limits, fig.panel(1, 1).unwrap().x_axis.limits);
}

#[test]
fn constant_series_fails_on_its_diagonal_panel() {
    let mut cols = uniform_columns(3, 100, 7);
    cols[1] = vec![2.5; 100];
    let err = PairsPlot::default()
        .render(&cols, &Variables::default())
        .unwrap_err();
    match err {
        PairsError::Estimation { row, col, source } => {
            assert_eq!((row, col), (1, 1));
            assert_eq!(source, DensityError::ZeroVariance);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Marginals succeed, every joint estimate fails.
struct NoJoint;

impl DensityEstimator for NoJoint {
    fn estimate_1d(&self, _: &[f64]) -> Result<Density1d, DensityError> {
        Ok(Density1d {
            coords: vec![0.0, 1.0],
            values: vec![0.5, 0.5],
        })
    }

    fn estimate_2d(&self, xs: &[f64], _: &[f64]) -> Result<Density2d, DensityError> {
        Err(DensityError::TooFewSamples(xs.len()))
    }
}

#[test]
fn joint_estimation_failure_names_the_first_lower_panel() {
    let cols = uniform_columns(3, 50, 8);
    let err = PairsPlot::default()
        .with_estimator(NoJoint)
        .render(&cols, &Variables::default())
        .unwrap_err();
    assert!(matches!(err, PairsError::Estimation { row: 1, col: 0, .. }));
    assert!(err.to_string().contains("(1, 0)"));
}

#[test]
fn invalid_config_fails_before_rendering() {
    let cols = uniform_columns(2, 50, 9);
    let mut config = PairsConfig::default();
    config.kde.levels = vec![0.0];
    let err = PairsPlot::new(config)
        .render(&cols, &Variables::default())
        .unwrap_err();
    assert!(matches!(err, PairsError::InvalidConfig(_)));
}

#[test]
fn empty_sigma_levels_are_rejected() {
    let cols = uniform_columns(2, 50, 10);
    let mut config = PairsConfig::default();
    config.kde.levels = Vec::new();
    let err = PairsPlot::new(config)
        .render(&cols, &Variables::default())
        .unwrap_err();
    assert!(matches!(err, PairsError::InvalidConfig(_)));
}

#[test]
fn empty_series_has_no_axis_range() {
    let cols = vec![Vec::new(), vec![1.0, 2.0]];
    let err = PairsPlot::default()
        .with_estimator(NoJoint)
        .render(&cols, &Variables::default())
        .unwrap_err();
    match err {
        PairsError::EmptySeries { key } => assert_eq!(key, Key::from(0usize)),
        other => panic!("unexpected error: {other}"),
    }
}
