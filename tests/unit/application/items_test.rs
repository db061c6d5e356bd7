// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use enrichrs::application::items::{build_request_items, SkipReason};
use enrichrs::domain::models::enrichment::EntityKind;

#[test]
fn test_company_rows_are_normalized_and_deduplicated() {
    let rows = [
        "https://www.Acme.com/about",
        "",
        "globex.com",
        "acme.com",
        "not a domain",
    ];

    let prepared = build_request_items(EntityKind::Company, rows);

    let items: Vec<(&str, &str)> = prepared
        .items
        .iter()
        .map(|i| (i.external_id.as_str(), i.identifier.as_str()))
        .collect();
    assert_eq!(items, vec![("row_0", "acme.com"), ("row_2", "globex.com")]);

    let skipped: Vec<(usize, SkipReason)> =
        prepared.skipped.iter().map(|s| (s.row, s.reason)).collect();
    assert_eq!(
        skipped,
        vec![
            (1, SkipReason::Empty),
            (3, SkipReason::Duplicate),
            (4, SkipReason::Invalid),
        ]
    );
    assert_eq!(prepared.skipped[2].raw, "not a domain");
}

#[test]
fn test_person_rows_require_profile_urls() {
    let rows = vec![
        "linkedin.com/in/jane-doe?utm=1".to_string(),
        "https://www.linkedin.com/company/acme".to_string(),
        "https://www.linkedin.com/in/john/".to_string(),
    ];

    let prepared = build_request_items(EntityKind::Person, &rows);

    assert_eq!(prepared.items.len(), 2);
    assert_eq!(prepared.items[0].external_id, "row_0");
    assert_eq!(
        prepared.items[0].identifier,
        "https://linkedin.com/in/jane-doe/"
    );
    assert_eq!(prepared.items[1].external_id, "row_2");
    assert_eq!(prepared.skipped.len(), 1);
    assert_eq!(prepared.skipped[0].reason, SkipReason::Invalid);
}
