#![allow(dead_code)]

use santa_core::{
    Assignment, ExclusionTable, ParticipantId, PermanentExclusions, SantaConfig, SantaDocument,
};
use serde_json::json;
use std::collections::HashSet;

pub const ROSTER: [&str; 7] = ["matt", "stacy", "ruthie", "bob", "eddie", "maggie", "tom"];

pub fn id(raw: &str) -> ParticipantId {
    ParticipantId::parse(raw).unwrap()
}

pub fn ids(raw: &[&str]) -> Vec<ParticipantId> {
    raw.iter().map(|value| id(value)).collect()
}

pub fn assignment(pairs: &[(&str, &str)]) -> Assignment {
    pairs.iter().map(|(g, r)| (id(g), id(r))).collect()
}

/// Spouse pairs ruthie/tom and matt/stacy.
pub fn family_permanent_exclusions() -> PermanentExclusions {
    let mut permanent = PermanentExclusions::new();
    permanent.insert_pair(id("ruthie"), id("tom"));
    permanent.insert_pair(id("matt"), id("stacy"));
    permanent
}

pub fn family_config() -> SantaConfig {
    SantaConfig {
        exclusion_window: 3,
        permanent_exclusions: family_permanent_exclusions(),
        ..SantaConfig::default()
    }
}

/// Seven participants with four years of rotating history.
pub fn family_document() -> SantaDocument {
    serde_json::from_value(json!({
        "participants": {
            "matt": { "display": "Matt", "password_hash": "hash-matt" },
            "stacy": { "display": "Stacy", "password_hash": "hash-stacy" },
            "ruthie": { "display": "Ruthie", "password_hash": "hash-ruthie" },
            "bob": { "display": "Bob", "password_hash": "hash-bob" },
            "eddie": { "display": "Eddie", "password_hash": "hash-eddie" },
            "maggie": { "display": "Maggie", "password_hash": "hash-maggie" },
            "tom": { "display": "Tom", "password_hash": "hash-tom" }
        },
        "history": {
            "2021": {
                "matt": "stacy", "stacy": "ruthie", "ruthie": "bob", "bob": "eddie",
                "eddie": "maggie", "maggie": "tom", "tom": "matt"
            },
            "2022": {
                "matt": "ruthie", "stacy": "bob", "ruthie": "eddie", "bob": "maggie",
                "eddie": "tom", "maggie": "matt", "tom": "stacy"
            },
            "2023": {
                "matt": "bob", "stacy": "eddie", "ruthie": "maggie", "bob": "tom",
                "eddie": "matt", "maggie": "stacy", "tom": "ruthie"
            },
            "2024": {
                "matt": "eddie", "stacy": "maggie", "ruthie": "tom", "bob": "matt",
                "eddie": "stacy", "maggie": "ruthie", "tom": "bob"
            }
        },
        "assignments": {}
    }))
    .unwrap()
}

/// Asserts bijection, no fixed points and no excluded pair.
pub fn assert_valid_assignment(assignment: &Assignment, table: &ExclusionTable) {
    let roster: HashSet<&ParticipantId> = table.roster().iter().collect();
    let givers: HashSet<&ParticipantId> = assignment.givers().collect();
    let receivers: HashSet<&ParticipantId> = assignment.receivers().collect();

    assert_eq!(assignment.len(), roster.len());
    assert_eq!(givers, roster);
    assert_eq!(receivers, roster);

    for (giver, receiver) in assignment {
        assert_ne!(giver, receiver, "{giver} drew themselves");
        assert!(
            !table.is_excluded(giver, receiver),
            "{giver} drew excluded receiver {receiver}"
        );
    }
}
