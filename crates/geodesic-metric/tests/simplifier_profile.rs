//! The process-wide simplifier is only a default; these tests swap it and
//! must not run alongside each other.

use geodesic_metric::{linear_expand, BasisSpec, Metric, MetricConfig, Simplifier, Transform};
use geodesic_symbolic::{parse, Expr, Symbol};
use serial_test::serial;

fn polar_config() -> MetricConfig {
    MetricConfig::new()
        .with_g("1 1")
        .with_coords(["r", "th"].map(Symbol::new))
}

#[test]
#[serial]
fn test_metric_snapshots_global_pipeline() {
    let before = Metric::new(BasisSpec::indexed("e"), polar_config()).unwrap();
    assert_eq!(before.simplifier().mode_names(), vec!["simplify"]);

    let inside = {
        let _guard = Simplifier::profile(Simplifier::new(vec![Transform::trigsimp()]));
        Metric::new(BasisSpec::indexed("e"), polar_config()).unwrap()
    };
    assert_eq!(inside.simplifier().mode_names(), vec!["trigsimp"]);

    let after = Metric::new(BasisSpec::indexed("e"), polar_config()).unwrap();
    assert_eq!(after.simplifier().mode_names(), vec!["simplify"]);
}

#[test]
#[serial]
fn test_explicit_pipeline_overrides_global() {
    let _guard = Simplifier::profile(Simplifier::none());
    let config = polar_config().with_simplifier(Simplifier::new(vec![Transform::expand()]));
    let m = Metric::new(BasisSpec::indexed("e"), config).unwrap();
    assert_eq!(m.simplifier().mode_names(), vec!["expand"]);
}

#[test]
#[serial]
fn test_profile_restores_after_panic() {
    let result = std::panic::catch_unwind(|| {
        let _guard = Simplifier::profile(Simplifier::none());
        panic!("pipeline failure");
    });
    assert!(result.is_err());
    assert_eq!(Simplifier::global().mode_names(), vec!["simplify"]);
}

#[test]
#[serial]
fn test_global_pipeline_applies_to_coefficients_only() {
    let expr = parse("(sin(th)^2 + cos(th)^2)*x").unwrap() * Expr::nc_sym("e_1");
    let simplified = Simplifier::global().apply(&expr);
    assert_eq!(simplified, parse("x").unwrap() * Expr::nc_sym("e_1"));
    assert_eq!(linear_expand(&simplified).len(), 1);
}
