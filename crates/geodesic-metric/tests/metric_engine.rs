//! End-to-end checks of metric construction, connection and signature.

use geodesic_metric::{
    BasisSpec, ChristoffelKind, Metric, MetricConfig, MetricError, MetricInput, PseudoscalarSign, Signature,
    SignatureHint,
};
use geodesic_symbolic::{expand, parse, Expr, Matrix, Symbol};

fn e(text: &str) -> Expr {
    parse(text).unwrap()
}

fn coords(names: &[&str]) -> Vec<Symbol> {
    names.iter().map(|n| Symbol::new(*n)).collect()
}

fn spherical() -> Metric {
    geodesic_tracing::init_test_tracing();
    let x = vec![e("r*sin(th)*cos(phi)"), e("r*sin(th)*sin(phi)"), e("r*cos(th)")];
    Metric::new(
        BasisSpec::indexed("e"),
        MetricConfig::new()
            .with_g(MetricInput::embedding(x))
            .with_coords(coords(&["r", "th", "phi"])),
    )
    .unwrap()
}

fn assert_symmetric_in_first_two(a: &[Vec<Vec<Expr>>]) {
    let n = a.len();
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                assert!(
                    expand(&(&a[i][j][k] - &a[j][i][k])).is_zero(),
                    "[{i}][{j}][{k}] = {} but [{j}][{i}][{k}] = {}",
                    a[i][j][k],
                    a[j][i][k]
                );
            }
        }
    }
}

#[test]
fn test_polar_embedding() {
    let x = vec![e("r*cos(th)"), e("r*sin(th)")];
    let m = Metric::new(
        BasisSpec::indexed("e"),
        MetricConfig::new()
            .with_g(MetricInput::embedding(x))
            .with_coords(coords(&["r", "th"])),
    )
    .unwrap();

    assert_eq!(m.g(), &Matrix::diagonal(vec![e("1"), e("r^2")]));
    assert!(m.is_ortho());
    assert!(!m.g_is_numeric());
    assert!(m.connect_flg());
    assert_eq!(m.basis(), &[Expr::nc_sym("e_r"), Expr::nc_sym("e_th")]);
    assert_eq!(m.r_symbols(), &[Expr::nc_sym("e^r"), Expr::nc_sym("e^th")]);
}

#[test]
fn test_spherical_embedding() {
    let m = spherical();
    assert_eq!(m.g(), &Matrix::diagonal(vec![e("1"), e("r^2"), e("r^2*sin(th)^2")]));
    assert!(m.is_ortho());

    let gamma = m.christoffel_symbols(ChristoffelKind::First).unwrap().unwrap();
    assert_eq!(gamma[1][1][0], e("-r"));
    assert_eq!(gamma[2][2][0], e("-r*sin(th)^2"));
    assert_eq!(gamma[2][2][1], e("-r^2*sin(th)*cos(th)"));
}

#[test]
fn test_symmetry_of_g_dg_and_first_kind() {
    let m = spherical();
    assert!(m.g().is_symmetric());
    assert_symmetric_in_first_two(m.dg().unwrap());
    assert_symmetric_in_first_two(m.christoffel_symbols(ChristoffelKind::First).unwrap().unwrap());
}

#[test]
fn test_general_symbolic_metric_symmetry() {
    let m = Metric::new(
        BasisSpec::indexed("e"),
        MetricConfig::new().with_g("g").with_coords(coords(&["u", "v"])),
    )
    .unwrap();
    assert!(m.g().is_symmetric());
    assert_symmetric_in_first_two(m.dg().unwrap());
    assert_symmetric_in_first_two(m.christoffel_symbols(ChristoffelKind::First).unwrap().unwrap());
}

#[test]
fn test_flat_metric_has_no_connection() {
    let m = Metric::new(
        BasisSpec::named(["e_x", "e_y", "e_z"]),
        MetricConfig::new().with_g("1 1 1").with_coords(coords(&["x", "y", "z"])),
    )
    .unwrap();
    assert!(!m.connect_flg());
    assert!(m.de().is_none());
    assert!(m.christoffel_symbols(ChristoffelKind::First).unwrap().is_none());
}

#[test]
fn test_identity_metric() {
    let m = Metric::new("e1 e2 e3".parse().unwrap(), MetricConfig::new().with_g("1 1 1")).unwrap();
    assert_eq!(m.g(), &Matrix::identity(3));
    assert!(m.is_ortho());
    assert!(m.g_is_numeric());
    assert_eq!(m.signature(), Signature::new(3, 0));
    assert_eq!(m.pseudoscalar_sign(), PseudoscalarSign::Minus);
}

#[test]
fn test_signature_hints() {
    let cases = [
        (SignatureHint::Euclidean, Ok(Signature::new(4, 0))),
        (SignatureHint::MinkowskiPlus, Ok(Signature::new(3, 1))),
        (SignatureHint::MinkowskiMinus, Ok(Signature::new(1, 3))),
        (SignatureHint::Positive(2), Ok(Signature::new(2, 2))),
        (SignatureHint::Positive(5), Err(())),
    ];
    for (hint, expected) in cases {
        let result = Metric::new(
            BasisSpec::named(["a", "b", "c", "d"]),
            MetricConfig::new().with_sig(hint),
        );
        match (result, expected) {
            (Ok(m), Ok(sig)) => assert_eq!(m.signature(), sig, "hint {hint}"),
            (Err(MetricError::SignatureOutOfRange { hint: 5, n: 4 }), Err(())) => {}
            (other, _) => panic!("hint {hint}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_numeric_orthogonal_signature_ignores_hint() {
    let m = Metric::new(
        BasisSpec::named(["t", "x", "y", "z"]),
        MetricConfig::new().with_g("1 -1 -1 -1").with_sig(SignatureHint::Euclidean),
    )
    .unwrap();
    assert_eq!(m.signature(), Signature::new(1, 3));
}

#[test]
fn test_normalization_requires_orthogonal_metric() {
    let err = Metric::new(
        BasisSpec::named(["a", "b"]),
        MetricConfig::new().with_g("# #,# #").with_norm(true),
    )
    .unwrap_err();
    assert!(matches!(err, MetricError::NonOrthogonalNormalization));
}

#[test]
fn test_normalized_spherical_basis() {
    let x = vec![e("r*sin(th)*cos(phi)"), e("r*sin(th)*sin(phi)"), e("r*cos(th)")];
    let m = Metric::new(
        BasisSpec::indexed("e"),
        MetricConfig::new()
            .with_g(MetricInput::embedding(x))
            .with_coords(coords(&["r", "th", "phi"]))
            .with_norm(true),
    )
    .unwrap();
    assert_eq!(m.e_norm().unwrap(), &[e("1"), e("r"), e("r*sin(th)")]);
    assert_eq!(m.g(), &Matrix::identity(3));
    assert_eq!(m.g_raw()[(2, 2)], e("r^2*sin(th)^2"));
}

#[test]
fn test_inverse_metric() {
    for spec in ["2 1,1 3", "# #,# #", "1 0 0,0 2 1/2,0 1/2 1"] {
        let names: Vec<String> = (0..spec.split(',').count()).map(|i| format!("e{i}")).collect();
        let m = Metric::new(BasisSpec::Named(names), MetricConfig::new().with_g(spec)).unwrap();
        let product = m.g().mul(m.inverse_metric().unwrap()).unwrap().simplify();
        assert_eq!(product, Matrix::identity(m.n()), "metric {spec}");
    }
}

#[test]
fn test_second_kind_raises_with_inverse() {
    let m = spherical();
    let gamma2 = m.christoffel_symbols(ChristoffelKind::Second).unwrap().unwrap();
    // Γ_rθ^θ = 1/r
    assert_eq!(gamma2[0][1][1], e("1/r"));
    // Γ_φφ^θ = -sin θ cos θ
    assert_eq!(gamma2[2][2][1], e("-sin(th)*cos(th)"));
}

#[test]
fn test_json_configuration() {
    let config = MetricConfig::from_json(r#"{"g": "1 1 -1", "sig": "m+", "wedge": false}"#).unwrap();
    let m = Metric::new(BasisSpec::named(["x", "y", "t"]), config).unwrap();
    assert_eq!(m.signature(), Signature::new(2, 1));
    assert!(!m.wedge());

    let err = MetricConfig::from_json(r#"{"metric": "1 1"}"#).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'metric' is not an allowed option"));
    assert!(message.contains("coords"));
}
