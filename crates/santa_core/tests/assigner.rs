mod common;

use common::{
    assert_valid_assignment, family_document, family_permanent_exclusions, id, ROSTER,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_core::{
    assign, build_exclusions, plan_assignment, validate_feasibility, EngineError, ExclusionTable,
};

fn family_table() -> ExclusionTable {
    let doc = family_document();
    build_exclusions(&doc.roster(), &family_permanent_exclusions(), &doc.history, 3)
}

#[test]
fn fixture_exclusions_are_feasible() {
    validate_feasibility(&family_table()).unwrap();
}

#[test]
fn fifty_runs_never_break_invariants() {
    let table = family_table();
    let mut rng = rand::thread_rng();

    for _ in 0..50 {
        let drawn = assign(&table, &mut rng).unwrap();
        assert_valid_assignment(&drawn, &table);
    }
}

#[test]
fn everyone_gives_and_receives_exactly_once_across_seeds() {
    let table = family_table();
    for seed in 0..20 {
        let drawn = assign(&table, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(drawn.len(), ROSTER.len());
        assert_valid_assignment(&drawn, &table);
    }
}

#[test]
fn spouses_never_draw_each_other() {
    let table = family_table();
    let mut rng = rand::thread_rng();

    for _ in 0..25 {
        let drawn = assign(&table, &mut rng).unwrap();
        assert_ne!(drawn.receiver_for(&id("matt")), Some(&id("stacy")));
        assert_ne!(drawn.receiver_for(&id("stacy")), Some(&id("matt")));
        assert_ne!(drawn.receiver_for(&id("ruthie")), Some(&id("tom")));
        assert_ne!(drawn.receiver_for(&id("tom")), Some(&id("ruthie")));
    }
}

#[test]
fn fully_excluded_giver_fails_before_search() {
    let mut table = family_table();
    table.exclude_all(&id("matt"));

    let err = validate_feasibility(&table).unwrap_err();
    assert_eq!(err, EngineError::InfeasibleConstraints { giver: id("matt") });
}

#[test]
fn plan_assignment_stops_at_feasibility() {
    let doc = family_document();
    // With only matt, ruthie and stacy left, matt's spouse plus his 2022
    // draw cover the whole roster.
    let roster: Vec<_> = doc
        .roster()
        .into_iter()
        .filter(|member| ["matt", "stacy", "ruthie"].contains(&member.as_str()))
        .collect();

    let err = plan_assignment(
        &roster,
        &family_permanent_exclusions(),
        &doc.history,
        4,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InfeasibleConstraints { .. }));
}
