use foretune_tune::{
    BayesSearchConfig, BayesianOptimisation, Domain, GradientBoostTuner, HyperparameterSpace,
};
use ndarray::{Array1, Array2};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

fn regression_data(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let uniform = Uniform::new(0.0, 1.0).unwrap();
    let noise = Normal::new(0.0, 0.1).unwrap();
    let x = Array2::from_shape_fn((n, 3), |_| uniform.sample(&mut rng));
    let y = x
        .rows()
        .into_iter()
        .map(|r| 4.0 * r[0] - 2.0 * r[1] * r[2] + noise.sample(&mut rng))
        .collect();
    (x, y)
}

fn quick_config(seed: u64) -> BayesSearchConfig {
    BayesSearchConfig::default()
        .with_n_iter(5)
        .with_n_initial_points(3)
        .with_n_candidates(100)
        .with_cv_folds(3)
        .with_seed(Some(seed))
        .with_verbose(false)
}

#[test]
fn default_space_search_stays_in_bounds() {
    let (x, y) = regression_data(30, 1);
    let tuner = GradientBoostTuner::new(quick_config(17));
    let search = tuner.bayesian_optimisation(x.view(), y.view()).unwrap();

    let space = GradientBoostTuner::default_space();
    assert!(space.contains(search.best_params()));
    for trial in search.trials() {
        assert!(space.contains(&trial.params));
    }
    let depth = search.best_params()["max_depth"].as_i64().unwrap();
    assert!((3..=13).contains(&depth));
    let trees = search.best_params()["n_estimators"].as_i64().unwrap();
    assert_eq!(search.best_estimator().n_trees() as i64, trees);
}

#[test]
fn seeded_search_is_reproducible() {
    let (x, y) = regression_data(40, 2);
    let space = HyperparameterSpace::new()
        .with("n_estimators", Domain::Integer { low: 10, high: 40 })
        .unwrap()
        .with("max_depth", Domain::Integer { low: 1, high: 4 })
        .unwrap()
        .with("learning_rate", Domain::Real { low: 0.05, high: 0.5 })
        .unwrap()
        .with("subsample", Domain::Real { low: 0.5, high: 1.0 })
        .unwrap();
    let run = || {
        GradientBoostTuner::new(quick_config(99).with_n_iter(8))
            .with_space(space.clone())
            .bayesian_optimisation(x.view(), y.view())
            .unwrap()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.trials(), b.trials());
    assert_eq!(a.best_params(), b.best_params());
    assert_eq!(a.best_estimator(), b.best_estimator());
}

#[test]
fn best_score_is_max_over_trials() {
    let (x, y) = regression_data(40, 3);
    let space = HyperparameterSpace::new()
        .with("n_estimators", Domain::Integer { low: 5, high: 30 })
        .unwrap()
        .with("learning_rate", Domain::Real { low: 0.05, high: 0.8 })
        .unwrap();
    let search = GradientBoostTuner::new(quick_config(5))
        .with_space(space)
        .bayesian_optimisation(x.view(), y.view())
        .unwrap();
    let max = search
        .trials()
        .iter()
        .map(|t| t.score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(search.best_score(), max);
}
