//! CalibrationEngine against a fake bridge: zero acquisition, the tiered
//! search, and its abort paths.

use scalecal::app::events::CalEvent;
use scalecal::calibration::search::{SearchDecision, decide};
use scalecal::calibration::{CalibrationEngine, SearchOutcome};
use scalecal::config::SystemConfig;

use crate::mock_hw::{CellCall, FakeLoadCell, ScriptedConsole};

fn engine_at(factor: i32) -> CalibrationEngine {
    CalibrationEngine::new(&SystemConfig {
        initial_calibration_factor: factor,
        ..SystemConfig::default()
    })
}

// ── Zero acquisition ──────────────────────────────────────────

#[test]
fn zero_is_average_of_twenty_raw_samples_after_tare() {
    let mut engine = engine_at(60_000);
    let mut cell = FakeLoadCell::fixed(0.0).with_raw(100);
    let mut io = ScriptedConsole::new(b"");

    let zero = engine.acquire_zero(&mut cell, &mut io);

    assert_eq!(zero, 100);
    assert_eq!(engine.zero_factor(), 100);
    // Scale cleared, then tare, then the samples.
    assert_eq!(cell.calls[0], CellCall::SetScale(1.0));
    assert_eq!(cell.calls[1], CellCall::Tare);
    assert_eq!(cell.count(&CellCall::ReadRaw), 20);
    assert_eq!(
        io.events,
        vec![
            CalEvent::ZeroAcquireStarted,
            CalEvent::ZeroAcquired { zero_factor: 100 }
        ]
    );
    assert!(io.has_line("Zero factor now = 100"));
}

#[test]
fn zero_acquisition_leaves_calibration_factor_alone() {
    let mut engine = engine_at(42_000);
    let mut cell = FakeLoadCell::fixed(0.0).with_raw(-5);
    let mut io = ScriptedConsole::new(b"");

    engine.acquire_zero(&mut cell, &mut io);

    assert_eq!(engine.zero_factor(), -5);
    assert_eq!(engine.calibration_factor(), 42_000);
}

// ── Search ────────────────────────────────────────────────────

#[test]
fn already_calibrated_scale_converges_on_first_reading() {
    let mut engine = engine_at(60_000);
    // 300000 / 60000 = 5.00 kg
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(5.0, &mut cell, &mut io);

    assert_eq!(
        outcome,
        SearchOutcome::Converged {
            factor: 60_000,
            iterations: 1
        }
    );
    assert_eq!(cell.scales_set(), vec![60_000.0]);
    let samples = io.search_samples();
    assert_eq!(samples.len(), 1);
    assert_eq!((samples[0].target_q, samples[0].reading_q), (500, 500));
    assert!(io.has_line("5.00 kg calibration_factor: 60000"));
    assert!(io.has_line("500 , 500"));
    assert!(io.has_line("=== Calibration finished ==="));
    assert!(io.has_line("Calibrate factor now = 60000"));
}

#[test]
fn every_step_follows_the_tier_rule() {
    let mut engine = engine_at(60_000);
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(10.0, &mut cell, &mut io);
    assert!(outcome.is_converged(), "got {:?}", outcome);

    let samples = io.search_samples();
    // 5.00 kg against 10.00 kg: 500 hundredths off, coarse step down.
    assert_eq!(samples[1].factor, 59_000);

    for pair in samples.windows(2) {
        let expected = match decide(pair[0].target_q, pair[0].reading_q) {
            SearchDecision::Step(delta) => delta,
            other => panic!("search continued after {:?}", other),
        };
        assert_eq!(pair[1].factor - pair[0].factor, expected);
    }

    let last = samples.last().expect("at least one sample");
    assert_eq!(last.reading_q, last.target_q);
    assert_eq!(engine.calibration_factor(), last.factor);
}

#[test]
fn heavy_reading_raises_factor() {
    let mut engine = engine_at(60_000);
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"");

    // 5.00 kg against 3.00 kg: 200 hundredths over, coarse step up.
    let outcome = engine.auto_calibrate(3.0, &mut cell, &mut io);

    assert!(outcome.is_converged());
    assert!(engine.calibration_factor() > 60_000);
    assert_eq!(io.search_samples()[1].factor, 61_000);
}

#[test]
fn vanished_reading_aborts_without_a_further_step() {
    let mut engine = engine_at(60_000);
    let mut cell = FakeLoadCell::sequence(&[1.00, 0.50, 0.001]);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(0.2, &mut cell, &mut io);

    // 100 vs 20 → +10, 50 vs 20 → +10, 0 → abort.
    assert_eq!(
        outcome,
        SearchOutcome::Aborted {
            factor: 60_020,
            iterations: 3
        }
    );
    assert_eq!(engine.calibration_factor(), 60_020);
    assert_eq!(cell.count(&CellCall::ReadUnits), 3);
    assert!(io.has_line("Infinity calibration detect! will return to menu (ABORT)"));
    assert!(!io.has_line("=== Calibration finished ==="));
    assert!(
        !io.events
            .iter()
            .any(|e| matches!(e, CalEvent::SearchStepRejected { .. }))
    );
}

#[test]
fn zero_target_aborts_instead_of_converging() {
    let mut engine = engine_at(60_000);
    let mut cell = FakeLoadCell::fixed(0.0);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(0.0, &mut cell, &mut io);

    assert!(matches!(outcome, SearchOutcome::Aborted { iterations: 1, .. }));
}

#[test]
fn step_that_would_zero_the_factor_aborts() {
    let mut engine = engine_at(10);
    // 100 vs 150 hundredths → medium step down, 10 - 10 = 0.
    let mut cell = FakeLoadCell::fixed(1.0);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(1.5, &mut cell, &mut io);

    assert_eq!(
        outcome,
        SearchOutcome::Aborted {
            factor: 10,
            iterations: 1
        }
    );
    assert_eq!(engine.calibration_factor(), 10);
    assert!(cell.scales_set().iter().all(|f| *f != 0.0));
    assert_eq!(
        io.events.last(),
        Some(&CalEvent::SearchStepRejected {
            factor: 10,
            iterations: 1
        })
    );
    assert!(io.has_line("Next step would set calibration factor 10 to 0, will return to menu (ABORT)"));
    assert!(!io.has_line("Infinity calibration detect! will return to menu (ABORT)"));
}

#[test]
fn zero_factor_refuses_to_search() {
    let mut engine = engine_at(60_000);
    let mut io = ScriptedConsole::new(b"");
    engine.set_calibration_manual(0.0, &mut io);

    let mut cell = FakeLoadCell::inverse(300_000.0);
    let outcome = engine.auto_calibrate(5.0, &mut cell, &mut io);

    assert_eq!(outcome, SearchOutcome::Refused);
    assert!(cell.calls.is_empty());
    assert!(io.has_line("Calibration factor is 0! Set it with command 4 first"));
}

#[test]
fn iteration_cap_reports_where_it_stopped() {
    let mut engine = CalibrationEngine::new(&SystemConfig {
        max_search_iterations: Some(5),
        ..SystemConfig::default()
    });
    let mut cell = FakeLoadCell::inverse(300_000.0);
    let mut io = ScriptedConsole::new(b"");

    let outcome = engine.auto_calibrate(10.0, &mut cell, &mut io);

    assert_eq!(
        outcome,
        SearchOutcome::IterationLimit {
            factor: 55_000,
            iterations: 5
        }
    );
    assert!(io.has_line("No convergence after 5 readings, will return to menu (ABORT)"));
    assert!(io.has_line("Calibrate factor now = 55000"));
}
