use std::sync::Arc;

use super::common::*;
use crate::discovery::directory::domain::{PlayerId, SearchRequest};
use crate::discovery::directory::{DirectoryService, DirectoryServiceError};
use crate::discovery::origin::{OriginRequest, PlacementError};
use crate::discovery::repository::RepositoryError;
use crate::discovery::test_support::{zip_directory, AUSTIN};

fn from_austin(radius_miles: Option<f64>) -> SearchRequest {
    SearchRequest {
        origin: OriginRequest {
            latitude: Some(AUSTIN.latitude),
            longitude: Some(AUSTIN.longitude),
            ..OriginRequest::default()
        },
        radius_miles,
        keyword: None,
    }
}

fn vendor_names(service: &MemoryService, request: &SearchRequest) -> Vec<String> {
    service
        .search_vendors(request)
        .expect("search runs")
        .into_iter()
        .map(|m| m.candidate.name)
        .collect()
}

#[test]
fn radius_search_puts_featured_then_nearest_first() {
    let service = build_service();
    seed_vendors(&service);

    assert_eq!(
        vendor_names(&service, &from_austin(Some(30.0))),
        vec!["Georgetown Guild", "austin dice", "Round Rock Games"]
    );
}

#[test]
fn radius_search_attaches_distances_within_radius() {
    let service = build_service();
    seed_vendors(&service);

    let matches = service
        .search_vendors(&from_austin(Some(20.0)))
        .expect("search runs");
    assert_eq!(matches.len(), 2);
    for found in &matches {
        let distance = found.distance_miles.expect("distance attached");
        assert!(distance <= 20.0, "{} at {distance}", found.candidate.name);
    }
}

#[test]
fn browse_all_sorts_by_featured_then_name() {
    let service = build_service();
    seed_vendors(&service);

    assert_eq!(
        vendor_names(&service, &from_austin(None)),
        vec![
            "Georgetown Guild",
            "Alamo Meeples",
            "austin dice",
            "Mail Order Minis",
            "Round Rock Games",
        ]
    );
}

#[test]
fn unresolvable_search_location_falls_back_to_name_order() {
    let service = build_service();
    seed_vendors(&service);

    let request = SearchRequest {
        origin: OriginRequest {
            search: Some("Atlantis".to_string()),
            profile_zip: Some("78701".to_string()),
            ..OriginRequest::default()
        },
        radius_miles: Some(30.0),
        keyword: None,
    };
    let matches = service.search_vendors(&request).expect("search runs");
    assert_eq!(matches.len(), 5);
    assert!(matches.iter().all(|m| m.distance_miles.is_none()));
}

#[test]
fn profile_zip_drives_search_when_no_search_text() {
    let service = build_service();
    seed_vendors(&service);

    let request = SearchRequest {
        origin: OriginRequest {
            profile_zip: Some("75201".to_string()),
            ..OriginRequest::default()
        },
        radius_miles: Some(25.0),
        keyword: None,
    };
    assert!(vendor_names(&service, &request).is_empty());
}

#[test]
fn keyword_filters_before_ranking() {
    let service = build_service();
    seed_vendors(&service);

    let mut request = from_austin(None);
    request.keyword = Some("  GUILD ".to_string());
    assert_eq!(vendor_names(&service, &request), vec!["Georgetown Guild"]);
}

#[test]
fn players_match_on_favorite_games_and_are_never_featured() {
    let service = build_service();
    service
        .add_player(player("Mara", Some("78664"), &["Terraforming Mars"]))
        .expect("added");
    service
        .add_player(player("Ben", Some("78701"), &["Wingspan", "Root"]))
        .expect("added");
    service
        .add_player(player("Cleo", None, &["Root"]))
        .expect("added");

    let mut request = from_austin(Some(50.0));
    request.keyword = Some("root".to_string());
    let names: Vec<String> = service
        .search_players(&request)
        .expect("search runs")
        .into_iter()
        .map(|m| m.candidate.display_name)
        .collect();
    assert_eq!(names, vec!["Ben"]);

    request.radius_miles = None;
    let names: Vec<String> = service
        .search_players(&request)
        .expect("search runs")
        .into_iter()
        .map(|m| m.candidate.display_name)
        .collect();
    assert_eq!(names, vec!["Ben", "Cleo"]);
}

#[test]
fn add_vendor_rejects_blank_names_and_unknown_zips() {
    let service = build_service();
    assert!(matches!(
        service.add_vendor(vendor("   ", None, false)),
        Err(DirectoryServiceError::MissingName)
    ));
    assert!(matches!(
        service.add_vendor(vendor("Lost Shop", Some("12345"), false)),
        Err(DirectoryServiceError::Placement(PlacementError::UnknownZip(_)))
    ));
}

#[test]
fn toggling_availability_persists_and_overlaps() {
    let service = build_service();
    let mut first = player("Mara", Some("78664"), &[]);
    first.availability = weekly(&[SUNDAY_AFTERNOON]);
    let first = service.add_player(first).expect("added");
    let second = service
        .add_player(player("Ben", Some("78701"), &[]))
        .expect("added");

    let updated = service
        .toggle_player_availability(&second.id, FRIDAY_EVENING)
        .expect("toggled on");
    assert!(updated.availability.contains(&FRIDAY_EVENING));
    service
        .toggle_player_availability(&second.id, SUNDAY_AFTERNOON)
        .expect("toggled on");

    assert_eq!(
        service
            .common_availability(&first.id, &second.id)
            .expect("overlap computed"),
        vec![SUNDAY_AFTERNOON]
    );

    let updated = service
        .toggle_player_availability(&second.id, FRIDAY_EVENING)
        .expect("toggled off");
    assert!(!updated.availability.contains(&FRIDAY_EVENING));
    let stored = service.get_player(&second.id).expect("stored");
    assert_eq!(stored.availability, weekly(&[SUNDAY_AFTERNOON]));
}

#[test]
fn toggling_unknown_player_is_not_found() {
    let service = build_service();
    assert!(matches!(
        service.toggle_player_availability(&PlayerId("player-404".to_string()), FRIDAY_EVENING),
        Err(DirectoryServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn repository_outages_surface_as_errors() {
    let service = DirectoryService::new(Arc::new(UnavailableRepository), zip_directory());
    assert!(matches!(
        service.search_vendors(&from_austin(Some(10.0))),
        Err(DirectoryServiceError::Repository(RepositoryError::Unavailable(_)))
    ));
}
