mod common;

use common::{assert_valid_assignment, family_config, family_document, id};
use rand::rngs::StdRng;
use rand::SeedableRng;
use santa_core::{
    AssignmentStore, EngineError, EnsureOutcome, MemoryStore, Participant, Period, PeriodService,
    PeriodStatus, SantaConfig, SantaDocument, ServiceError, StoreError, StoreResult,
};
use std::io;

struct ReadOnlyStore {
    inner: MemoryStore,
}

impl AssignmentStore for ReadOnlyStore {
    fn load(&self) -> StoreResult<SantaDocument> {
        self.inner.load()
    }

    fn replace(&self, _document: &SantaDocument) -> StoreResult<()> {
        Err(StoreError::Io {
            path: "read-only".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only"),
        })
    }
}

#[test]
fn ensure_commits_assignment_and_history_in_one_write() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let period = Period::new(2025);
    assert_eq!(service.status(period).unwrap(), PeriodStatus::NoAssignmentYet);
    let table = service.exclusions().unwrap();

    let outcome = service
        .ensure_period_assigned_with_rng(period, &mut StdRng::seed_from_u64(1))
        .unwrap();
    let assignment = match outcome {
        EnsureOutcome::Committed(assignment) => assignment,
        other => panic!("expected a fresh commit, got {other:?}"),
    };

    assert_valid_assignment(&assignment, &table);
    assert_eq!(service.store().replace_count(), 1);
    assert_eq!(service.status(period).unwrap(), PeriodStatus::Committed);

    let stored = service.store().snapshot();
    assert_eq!(stored.assignments.get(&period), Some(&assignment));
    assert_eq!(stored.history.get(&period), Some(&assignment));
}

#[test]
fn ensure_is_idempotent_for_the_same_period() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let period = Period::new(2025);

    service.ensure_period_assigned(period).unwrap();
    let after_first = service.store().snapshot();

    let second = service.ensure_period_assigned(period).unwrap();
    assert_eq!(second, EnsureOutcome::AlreadyAssigned);
    assert_eq!(service.store().replace_count(), 1);
    assert_eq!(service.store().snapshot(), after_first);
}

#[test]
fn committed_period_feeds_next_period_exclusions() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let EnsureOutcome::Committed(first) = service.ensure_period_assigned(Period::new(2025)).unwrap()
    else {
        panic!("2025 should be freshly committed");
    };

    let table = service.exclusions().unwrap();
    for (giver, receiver) in &first {
        assert!(table.is_excluded(giver, receiver));
    }
}

#[test]
fn engine_failure_persists_nothing() {
    let mut document = SantaDocument::default();
    document
        .participants
        .insert(id("matt"), Participant::new("Matt"));
    document
        .participants
        .insert(id("stacy"), Participant::new("Stacy"));
    let service = PeriodService::new(MemoryStore::new(document.clone()), family_config());

    let err = service.ensure_period_assigned(Period::new(2025)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::InfeasibleConstraints { .. })
    ));
    assert_eq!(service.store().replace_count(), 0);
    assert_eq!(service.store().snapshot(), document);
    assert_eq!(
        service.status(Period::new(2025)).unwrap(),
        PeriodStatus::NoAssignmentYet
    );
}

#[test]
fn empty_roster_is_refused_and_period_stays_open() {
    let service = PeriodService::new(MemoryStore::new(SantaDocument::default()), family_config());
    let period = Period::new(2025);

    let err = service.ensure_period_assigned(period).unwrap_err();
    assert!(matches!(err, ServiceError::Engine(EngineError::EmptyRoster)));
    assert_eq!(service.store().replace_count(), 0);
    assert_eq!(service.status(period).unwrap(), PeriodStatus::NoAssignmentYet);
}

#[test]
fn write_failure_surfaces_and_leaves_period_unassigned() {
    let store = ReadOnlyStore {
        inner: MemoryStore::new(family_document()),
    };
    let service = PeriodService::new(store, family_config());

    let err = service.ensure_period_assigned(Period::new(2025)).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Io { .. })));
    assert_eq!(
        service.status(Period::new(2025)).unwrap(),
        PeriodStatus::NoAssignmentYet
    );
}

#[test]
fn recipient_lookup_returns_display_name() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let period = Period::new(2025);

    let err = service.recipient_for(period, &id("matt")).unwrap_err();
    assert!(matches!(err, ServiceError::PeriodNotAssigned(p) if p == period));

    let EnsureOutcome::Committed(assignment) = service.ensure_period_assigned(period).unwrap()
    else {
        panic!("2025 should be freshly committed");
    };

    let recipient = service.recipient_for(period, &id("Matt")).unwrap();
    let expected = assignment.receiver_for(&id("matt")).unwrap();
    assert_eq!(&recipient.receiver, expected);
    let participants = family_document().participants;
    assert_eq!(recipient.display, participants[expected].display);

    let err = service.recipient_for(period, &id("stranger")).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownParticipant(_)));
}

#[test]
fn recipient_who_left_falls_back_to_id() {
    let mut document = family_document();
    document.participants.remove(&id("tom"));
    document.assignments.insert(
        Period::new(2019),
        common::assignment(&[("matt", "tom"), ("tom", "matt")]),
    );
    let service = PeriodService::new(MemoryStore::new(document), SantaConfig::default());

    let recipient = service.recipient_for(Period::new(2019), &id("matt")).unwrap();
    assert_eq!(recipient.display, "tom");
}

#[test]
fn forecast_chains_years_without_writing() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let table = service.exclusions().unwrap();

    let forecast = service
        .forecast(Period::new(2025), 2, &mut rand::thread_rng())
        .unwrap();

    assert_eq!(forecast.len(), 2);
    assert_eq!(forecast[0].0, Period::new(2025));
    assert_eq!(forecast[1].0, Period::new(2026));
    assert_valid_assignment(&forecast[0].1, &table);
    for (giver, receiver) in &forecast[1].1 {
        assert_ne!(forecast[0].1.receiver_for(giver), Some(receiver));
    }
    assert_eq!(service.store().replace_count(), 0);
}

#[test]
fn forecast_stops_at_the_last_period() {
    let service = PeriodService::new(MemoryStore::new(family_document()), family_config());
    let last = Period::new(u32::MAX);

    let single = service.forecast(last, 1, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].0, last);

    let err = service.forecast(last, 2, &mut StdRng::seed_from_u64(3)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::PeriodOutOfRange { start, count: 2 } if start == last
    ));
    assert_eq!(service.store().replace_count(), 0);
}
