use pacman_core::entity::ghost::GhostMode;
use pacman_core::error::GameError;
use pacman_core::systems::ghost::{ModeSchedule, Phase};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

#[test]
fn test_classic_sequence_ends_in_permanent_chase() {
    let mut schedule = ModeSchedule::classic();
    let mut modes = vec![schedule.mode()];

    for millis in [7000, 20000, 7000, 20000, 5000, 20000, 5000] {
        let transitions = schedule.advance(millis as f32 / 1000.0);
        assert_that(&transitions.len()).is_equal_to(1);
        modes.push(schedule.mode());
    }

    use GhostMode::{Chase, Scatter};
    assert_eq!(modes, vec![Scatter, Chase, Scatter, Chase, Scatter, Chase, Scatter, Chase]);

    // The final chase phase never ends.
    let transitions = schedule.advance(20.0);
    assert_that(&transitions.is_empty()).is_true();
    let transitions = schedule.advance(10_000.0);
    assert_that(&transitions.is_empty()).is_true();
    assert_eq!(schedule.mode(), Chase);
    assert_that(&schedule.is_settled()).is_true();
}

#[test]
fn test_large_delta_crosses_several_phases() {
    let mut schedule = ModeSchedule::classic();

    let transitions = schedule.advance(7.0 + 20.0 + 7.0 + 1.0);

    assert_eq!(
        transitions.as_slice(),
        &[
            (GhostMode::Scatter, GhostMode::Chase),
            (GhostMode::Chase, GhostMode::Scatter),
            (GhostMode::Scatter, GhostMode::Chase),
        ]
    );
    assert_eq!(schedule.index(), 3);
    assert_that(&((schedule.elapsed() - 1.0).abs() < 1e-4)).is_true();
}

#[test]
fn test_small_steps_accumulate() {
    let mut schedule = ModeSchedule::classic();
    let mut changes = 0;
    // 7 seconds at 60 ticks per second, plus a little slack for float error.
    for _ in 0..(7 * 60 + 2) {
        changes += schedule.advance(1.0 / 60.0).len();
    }
    assert_eq!(changes, 1);
    assert_eq!(schedule.mode(), GhostMode::Chase);
}

#[test]
fn test_invalid_delta_is_ignored() {
    let mut schedule = ModeSchedule::classic();
    for dt in [f32::NAN, f32::INFINITY, -3.0, 0.0] {
        assert_that(&schedule.advance(dt).is_empty()).is_true();
    }
    assert_eq!(schedule.elapsed(), 0.0);
}

#[test]
fn test_reset_returns_to_first_phase() {
    let mut schedule = ModeSchedule::classic();
    schedule.advance(30.0);
    schedule.reset();
    assert_eq!(schedule.index(), 0);
    assert_eq!(schedule.mode(), GhostMode::Scatter);
    assert_eq!(schedule.elapsed(), 0.0);
}

#[test]
fn test_last_finite_phase_holds() {
    let mut schedule = ModeSchedule::new(vec![
        Phase::new(GhostMode::Scatter, 1.0),
        Phase::new(GhostMode::Chase, 2.0),
    ])
    .unwrap();

    assert_eq!(schedule.advance(100.0).len(), 1);
    assert_eq!(schedule.mode(), GhostMode::Chase);
    assert_that(&schedule.is_settled()).is_true();
}

#[test]
fn test_rejects_invalid_schedules() {
    assert!(matches!(ModeSchedule::new(vec![]), Err(GameError::InvalidConfig(_))));
    assert!(matches!(
        ModeSchedule::new(vec![Phase::new(GhostMode::Frightened, 5.0)]),
        Err(GameError::InvalidConfig(_))
    ));
    assert!(matches!(
        ModeSchedule::new(vec![Phase::new(GhostMode::Scatter, 0.0)]),
        Err(GameError::InvalidConfig(_))
    ));
    assert!(matches!(
        ModeSchedule::new(vec![Phase::new(GhostMode::Chase, f32::NAN)]),
        Err(GameError::InvalidConfig(_))
    ));
}
