use std::sync::Arc;

use approx::assert_abs_diff_eq;
use solver::{IntegratorConfig, SolverError, SystemDynamics, TimeSpan};

/// Logistic growth y' = r y (1 - y / k).
fn logistic() -> Arc<dyn SystemDynamics> {
    fn rhs(_: f64, y: &[f64], p: &[f64], _: &[f64], dydt: &mut [f64]) -> Result<(), SolverError> {
        if p.len() != 2 {
            return Err(SolverError::DimensionMismatch {
                what: "parameters",
                expected: 2,
                got: p.len(),
            });
        }
        dydt[0] = p[0] * y[0] * (1.0 - y[0] / p[1]);
        Ok(())
    }
    Arc::new(rhs)
}

fn logistic_exact(y0: f64, r: f64, k: f64, t: f64) -> f64 {
    k / (1.0 + (k - y0) / y0 * (-r * t).exp())
}

#[test]
fn config_parses_with_defaults() {
    let config: IntegratorConfig =
        serde_json::from_str(r#"{ "method": "rk45", "action_duration": 0.5 }"#).unwrap();
    match &config {
        IntegratorConfig::Rk45(dp) => {
            assert_eq!(dp.rtol, 1e-6);
            assert_eq!(dp.atol, 1e-8);
            assert_eq!(dp.max_steps, 100_000);
        }
        IntegratorConfig::Rk4(_) => panic!("expected rk45"),
    }
    assert_eq!(config.action_duration(), 0.5);

    let rk4 = r#"{ "method": "rk4", "action_duration": 2.0, "step_size": 0.01 }"#;
    let config: IntegratorConfig = serde_json::from_str(rk4).unwrap();
    assert!(matches!(config, IntegratorConfig::Rk4(ref c) if c.step_size == 0.01));
}

#[test]
fn unknown_method_fails_to_parse() {
    let rodas = r#"{ "method": "rodas5", "action_duration": 1.0 }"#;
    let parsed = serde_json::from_str::<IntegratorConfig>(rodas);
    assert!(parsed.is_err());
}

#[test]
fn backends_agree_on_logistic_growth() {
    let span = TimeSpan::starting_at(0.0, 4.0);
    let (y0, r, k) = (0.1, 1.3, 2.0);
    let expected = logistic_exact(y0, r, k, span.duration());

    let rk45: IntegratorConfig = serde_json::from_str(
        r#"{ "method": "rk45", "action_duration": 4.0, "rtol": 1e-10, "atol": 1e-12 }"#,
    )
    .unwrap();
    let rk4: IntegratorConfig = serde_json::from_str(
        r#"{ "method": "rk4", "action_duration": 4.0, "step_size": 0.001 }"#,
    )
    .unwrap();

    for config in [rk45, rk4] {
        let integrator = config.build(logistic()).unwrap();
        assert_eq!(integrator.action_duration(), 4.0);
        let next = integrator.integrate(&[y0], &[r, k], &[], span).unwrap();
        assert_abs_diff_eq!(next[0], expected, epsilon = 1e-8);
    }
}

#[test]
fn dynamics_dimension_errors_surface_from_every_backend() {
    for config in [
        IntegratorConfig::Rk45(solver::DormandPrinceConfig::new(1.0)),
        IntegratorConfig::Rk4(solver::RungeKutta4Config::new(1.0)),
    ] {
        let integrator = config.build(logistic()).unwrap();
        let err = integrator.integrate(&[0.5], &[1.0], &[], TimeSpan::new(0.0, 1.0)).unwrap_err();
        assert!(matches!(err, SolverError::DimensionMismatch { what: "parameters", .. }));
    }
}

#[test]
fn invalid_duration_fails_to_build() {
    let config: IntegratorConfig =
        serde_json::from_str(r#"{ "method": "rk4", "action_duration": 0.0 }"#).unwrap();
    assert!(matches!(config.build(logistic()), Err(SolverError::InvalidConfig(_))));
}
