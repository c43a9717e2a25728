//! Integration tests for foretune-gbm.

use foretune_gbm::{GbmParams, GbmRegressor};
use ndarray::{Array1, Array2, s};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

fn friedman_like(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let unit = Uniform::new(0.0_f64, 1.0).unwrap();
    let noise = Normal::new(0.0, 0.1).unwrap();
    let x = Array2::from_shape_fn((n, 3), |_| unit.sample(&mut rng));
    let y = x
        .rows()
        .into_iter()
        .map(|r| 10.0 * (3.0 * r[0]).sin() + 5.0 * r[1] * r[1] + noise.sample(&mut rng))
        .collect();
    (x, y)
}

#[test]
fn generalises_to_held_out_rows() {
    let (x, y) = friedman_like(300, 7);
    let (train_x, test_x) = (x.slice(s![..240, ..]), x.slice(s![240.., ..]));
    let (train_y, test_y) = (y.slice(s![..240]), y.slice(s![240..]));

    let params = GbmParams::default()
        .with_n_estimators(100)
        .with_max_depth(3)
        .with_learning_rate(0.1)
        .with_seed(Some(1));
    let model = GbmRegressor::new(params).fit(train_x, train_y).unwrap();
    let r2 = model.score(test_x, test_y).unwrap();
    assert!(r2 > 0.8, "held-out R² = {r2}");
}

#[test]
fn more_rounds_fit_training_data_better() {
    let (x, y) = friedman_like(150, 3);
    let short = GbmParams::default().with_n_estimators(5).with_seed(Some(2));
    let long = short.clone().with_n_estimators(60);
    let r2_short = GbmRegressor::new(short)
        .fit(x.view(), y.view())
        .unwrap()
        .score(x.view(), y.view())
        .unwrap();
    let r2_long = GbmRegressor::new(long)
        .fit(x.view(), y.view())
        .unwrap()
        .score(x.view(), y.view())
        .unwrap();
    assert!(r2_long > r2_short);
}

#[test]
fn large_gamma_prunes_everything() {
    let (x, y) = friedman_like(100, 5);
    let params = GbmParams::default()
        .with_n_estimators(10)
        .with_gamma(1e9)
        .with_seed(Some(0));
    let model = GbmRegressor::new(params).fit(x.view(), y.view()).unwrap();
    assert_eq!(model.max_tree_depth(), 0);
    let pred = model.predict(x.view()).unwrap();
    let first = pred[0];
    assert!(pred.iter().all(|p| (p - first).abs() < 1e-9));
}

#[test]
fn subsample_changes_with_seed() {
    let (x, y) = friedman_like(80, 11);
    let base = GbmParams::default().with_n_estimators(10).with_subsample(0.5);
    let a = GbmRegressor::new(base.clone().with_seed(Some(1)))
        .fit(x.view(), y.view())
        .unwrap();
    let b = GbmRegressor::new(base.with_seed(Some(2)))
        .fit(x.view(), y.view())
        .unwrap();
    assert_ne!(a.predict(x.view()).unwrap(), b.predict(x.view()).unwrap());
}
