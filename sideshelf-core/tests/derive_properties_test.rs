//! Properties of filtering, sorting and merging over a mixed catalog

use pretty_assertions::assert_eq;
use sideshelf_core::catalog::{
    derive_records, locale_cmp, merge_dedup, AppRecord, SortMode,
};
use std::cmp::Ordering;

fn record(id: Option<&str>, name: &str, developer: &str, size: u64, date: &str) -> AppRecord {
    AppRecord {
        bundle_identifier: id.map(str::to_string),
        name: name.to_string(),
        developer_name: Some(developer.to_string()),
        localized_description: Some(format!("{name} for iPhone and iPad")),
        size,
        version_date: Some(date.to_string()),
        ..Default::default()
    }
}

fn catalog() -> Vec<AppRecord> {
    vec![
        record(Some("com.delta.emu"), "Delta", "Riley Testut", 52_000_000, "2024-05-01"),
        record(Some("com.provenance"), "Provenance", "Provenance Team", 80_000_000, "2023-11-20"),
        record(Some("io.utm"), "UTM", "osy", 300_000_000, "2024-06-15T10:00:00Z"),
        record(Some("com.kodi"), "kodi", "Team Kodi", 0, "not a date"),
        record(None, "Ümlaut Reader", "delta labs", 1_000, "2022-01-01"),
        record(Some("org.ppsspp"), "PPSSPP", "Henrik", 52_000_000, "2024-05-01"),
    ]
}

#[test]
fn test_every_result_contains_the_query() {
    let apps = catalog();

    for query in ["delta", "DELTA", "team", "io.", "iphone", "emu", "zzz"] {
        let needle = query.to_lowercase();
        let derived = derive_records(&apps, SortMode::Name, query);

        for app in derived.apps() {
            let fields = [
                Some(app.name.as_str()),
                app.developer_name.as_deref(),
                app.bundle_identifier.as_deref(),
                app.localized_description.as_deref(),
            ];
            assert!(
                fields
                    .iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle)),
                "{} does not match {query}",
                app.name
            );
        }

        let expected = apps
            .iter()
            .filter(|app| {
                app.name.to_lowercase().contains(&needle)
                    || app
                        .developer_name
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || app
                        .bundle_identifier
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
                    || app
                        .localized_description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .count();
        assert_eq!(derived.len(), expected, "count for {query}");
    }
}

#[test]
fn test_empty_query_preserves_every_record() {
    let apps = catalog();

    for sort in SortMode::ALL {
        let derived = derive_records(&apps, sort, "   ");
        assert_eq!(derived.len(), apps.len());
        for app in &apps {
            assert!(derived.apps().iter().any(|d| std::ptr::eq(*d, app)));
        }
    }
}

#[test]
fn test_sort_orders_are_monotonic() {
    let apps = catalog();

    let by_size = derive_records(&apps, SortMode::Size, "").into_vec();
    assert!(by_size.windows(2).all(|w| w[0].size >= w[1].size));

    let by_date = derive_records(&apps, SortMode::Date, "").into_vec();
    assert!(by_date
        .windows(2)
        .all(|w| w[0].date_sort_key() >= w[1].date_sort_key()));
    // Unparsable dates sink to the bottom
    assert_eq!(by_date.last().map(|app| app.name.as_str()), Some("kodi"));

    let by_name = derive_records(&apps, SortMode::Name, "").into_vec();
    assert!(by_name
        .windows(2)
        .all(|w| locale_cmp(&w[0].name, &w[1].name) != Ordering::Greater));
}

#[test]
fn test_ties_keep_input_order() {
    let apps = catalog();
    let by_size = derive_records(&apps, SortMode::Size, "").into_vec();

    let tied: Vec<&str> = by_size
        .iter()
        .filter(|app| app.size == 52_000_000)
        .map(|app| app.name.as_str())
        .collect();
    assert_eq!(tied, vec!["Delta", "PPSSPP"]);
}

#[test]
fn test_merge_keeps_first_duplicate() {
    let standard = vec![
        record(Some("X"), "From Standard", "a", 1, "2024-01-01"),
        record(None, "Nameless Twin", "a", 1, "2024-01-01"),
    ];
    let nsfw = vec![
        record(Some("X"), "From Nsfw", "b", 2, "2024-02-01"),
        record(None, "Nameless Twin", "b", 2, "2024-02-01"),
        record(Some("Y"), "Unique", "b", 3, "2024-03-01"),
    ];

    let merged = merge_dedup([standard, nsfw]);
    let with_x: Vec<&AppRecord> = merged
        .iter()
        .filter(|app| app.bundle_identifier.as_deref() == Some("X"))
        .collect();

    assert_eq!(with_x.len(), 1);
    assert_eq!(with_x[0].name, "From Standard");
    assert_eq!(merged.len(), 3);
    assert_eq!(
        merged
            .iter()
            .find(|app| app.name == "Nameless Twin")
            .and_then(|app| app.developer_name.as_deref()),
        Some("a")
    );
}

#[test]
fn test_unknown_tint_falls_back_to_default() {
    let app: AppRecord =
        serde_json::from_str(r#"{"name":"Tinted","tintColor":"notacolor"}"#).unwrap();
    assert_eq!(app.tint(), "#3b82f6");
}
