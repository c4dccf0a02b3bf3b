//! 28Mg(d,p)29Mg at 9.473 MeV/u in a 2.5 T field.

mod common;

use common::mg28_dp;
use ik_kinematics::{BatchSummary, ForbiddenReason, LinearSweep, QueryError, SweepGrid, solve_batch};

#[test]
fn reference_angle_is_frozen() {
    let solver = mg28_dp();
    let solution = solver.solve(0.0, -20.0).unwrap();

    println!(
        "theta_cm = {:.9} deg after {} iterations",
        solution.theta_cm_deg, solution.iterations
    );
    assert!(
        (solution.theta_cm_deg - 36.743_367_457_757_98).abs() < 1e-6,
        "theta_cm drifted: {}",
        solution.theta_cm_deg
    );
}

#[test]
fn converged_residual_below_tolerance() {
    let solver = mg28_dp();
    let tol = solver.newton_config().abs_tol;
    let cap = solver.newton_config().max_iterations;

    for (ex, z) in [(0.0, -40.0), (0.0, -20.0), (1.0, 10.0), (3.0, 100.0), (5.0, -20.0)] {
        let solution = solver.solve(ex, z).unwrap();
        let residual = solver.residual(ex, z, solution.p_para_cm).unwrap();
        assert!(residual.abs() < tol, "ex={ex} z={z}: residual {residual}");
        assert_eq!(residual, solution.residual_cm);
        assert!(solution.iterations < cap);
    }
}

#[test]
fn excited_states_move_angle_forward() {
    let solver = mg28_dp();
    let ground = solver.solve(0.0, -20.0).unwrap().theta_cm_deg;
    let excited = solver.solve(2.0, -20.0).unwrap().theta_cm_deg;
    assert!((excited - 32.242_399_453_267_69).abs() < 1e-6);
    assert!(excited < ground);
}

#[test]
fn forbidden_region_never_yields_angle() {
    let solver = mg28_dp();
    let threshold = solver.frame().excitation_threshold_mev();

    for ex in [threshold + 1e-3, 25.0, 100.0] {
        let err = solver.solve(ex, -20.0).unwrap_err();
        assert_eq!(
            err,
            QueryError::Forbidden {
                ex_mev: ex,
                reason: ForbiddenReason::AboveThreshold
            }
        );
    }

    // Below threshold but the ejectile is too slow to reach -20 cm
    let err = solver.solve(8.0, -20.0).unwrap_err();
    assert!(err.is_forbidden());
    assert!(!err.is_not_converged());
}

#[test]
fn repeated_queries_are_identical() {
    let solver = mg28_dp();
    let first = solver.solve(0.0, -20.0).unwrap();
    for _ in 0..10 {
        assert_eq!(solver.solve(0.0, -20.0).unwrap(), first);
    }

    let copy = solver.clone();
    assert_eq!(copy.solve(0.0, -20.0).unwrap(), first);
}

#[test]
fn zero_position_is_deterministic() {
    let solver = mg28_dp();
    let a = solver.solve(0.0, 0.0).unwrap();
    let b = solver.solve(0.0, 0.0).unwrap();
    assert_eq!(a, b);
    assert!((a.theta_cm_deg - 47.639_057_399_901_19).abs() < 1e-6);

    // Continuous with a small neighbouring position
    let near = solver.solve(0.0, -0.05).unwrap();
    assert!((near.theta_cm_deg - a.theta_cm_deg).abs() < 0.05);
}

#[test]
fn batch_matches_serial_evaluation() {
    let solver = mg28_dp();
    let grid = SweepGrid {
        ex_mev: LinearSweep::new(0.0, 4.0, 5).unwrap(),
        z_cm: LinearSweep::new(-60.0, 240.0, 31).unwrap(),
    };
    let queries = grid.queries();
    let records = solve_batch(&solver, &queries);

    assert_eq!(records.len(), grid.len());
    for record in &records {
        assert_eq!(record.outcome, solver.solve_query(record.query));
    }

    let summary = BatchSummary::from_records(&records);
    assert_eq!(summary.total, grid.len());
    assert_eq!(summary.not_converged, 0);
    assert_eq!(summary.invalid, 0);
    assert!(summary.solved > 0);
    assert!(summary.forbidden > 0);
    assert_eq!(summary.solved + summary.forbidden, summary.total);
}

#[test]
fn forward_kinematics_covers_backward_array() {
    let solver = mg28_dp();
    let mut previous = f64::NEG_INFINITY;
    for theta in [20.0, 30.0, 40.0, 60.0, 90.0, 120.0] {
        let pos = solver.position_for_angle(0.0, theta).unwrap();
        assert!(pos.z_cm > previous, "z not increasing at {theta}");
        assert!(pos.orbit_radius_cm * 2.0 >= solver.array_radius_cm());
        previous = pos.z_cm;
    }
    let pos = solver.position_for_angle(0.0, 90.0).unwrap();
    assert!((pos.z_cm - 106.212_227_607_194).abs() < 1e-6);
}
