//! End-to-end flow tests for streamwhere
//!
//! Tests the complete lookup journey from search to availability,
//! driving the TMDB client against mocked endpoints and feeding the
//! responses through the availability resolvers.

use mockito::{Matcher, Server};
use streamwhere::api::{TmdbClient, TmdbError};
use streamwhere::availability::{
    countries_with_provider, dedup_providers, resolve_country, select_provider,
};
use streamwhere::models::{MediaKind, TitleKind};

// =============================================================================
// Mock Response Fixtures
// =============================================================================

fn mock_search_response() -> &'static str {
    r#"{
        "page": 1,
        "results": [
            {
                "id": 414906,
                "media_type": "movie",
                "title": "The Batman",
                "release_date": "2022-03-01",
                "overview": "When a sadistic serial killer begins murdering key political figures in Gotham, Batman is forced to investigate the city's hidden corruption.",
                "poster_path": "/74xTEgt7R36Fpooo50r9T25onhq.jpg",
                "vote_average": 7.8
            },
            {
                "id": 1396,
                "media_type": "tv",
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "overview": "A chemistry teacher diagnosed with lung cancer teams up with a former student to cook and sell methamphetamine.",
                "poster_path": "/ggFHVNu6YYI5L9pCfOacjizRGt.jpg",
                "vote_average": 9.5
            }
        ],
        "total_results": 2,
        "total_pages": 1
    }"#
}

fn mock_movie_details_response() -> &'static str {
    r#"{
        "id": 414906,
        "title": "The Batman",
        "release_date": "2022-03-01",
        "runtime": 176,
        "genres": [{"id": 80, "name": "Crime"}, {"id": 9648, "name": "Mystery"}],
        "overview": "When a sadistic serial killer begins murdering key political figures in Gotham, Batman is forced to investigate the city's hidden corruption.",
        "vote_average": 7.8,
        "poster_path": "/74xTEgt7R36Fpooo50r9T25onhq.jpg",
        "recommendations": {
            "results": [
                {
                    "id": 272,
                    "media_type": "movie",
                    "title": "Batman Begins",
                    "release_date": "2005-06-10",
                    "vote_average": 7.7
                }
            ]
        }
    }"#
}

fn mock_tv_details_response() -> &'static str {
    r#"{
        "id": 1396,
        "name": "Breaking Bad",
        "first_air_date": "2008-01-20",
        "number_of_seasons": 5,
        "number_of_episodes": 62,
        "genres": [{"id": 18, "name": "Drama"}],
        "overview": "A chemistry teacher diagnosed with lung cancer teams up with a former student to cook and sell methamphetamine.",
        "vote_average": 9.5
    }"#
}

/// Four countries: two with subscription offers, one with ad-supported
/// streaming only, and one malformed entry ("BR") that keeps its key but
/// contributes no offers.
fn mock_watch_providers_response() -> &'static str {
    r#"{
        "id": 414906,
        "results": {
            "US": {
                "link": "https://www.themoviedb.org/movie/414906/watch?locale=US",
                "flatrate": [
                    {"provider_id": 8, "provider_name": "Netflix", "logo_path": "/netflix.jpg", "display_priority": 0}
                ],
                "buy": [
                    {"provider_id": 10, "provider_name": "Amazon Video"}
                ]
            },
            "GB": {
                "link": "https://www.themoviedb.org/movie/414906/watch?locale=GB",
                "flatrate": [
                    {"provider_id": 8, "provider_name": "Netflix"},
                    {"provider_id": 29, "provider_name": "Sky Go"}
                ]
            },
            "BR": 7,
            "NZ": {
                "ads": [
                    {"provider_id": 73, "provider_name": "Tubi TV"}
                ]
            }
        }
    }"#
}

fn mock_regions_response() -> &'static str {
    r#"{
        "results": [
            {"iso_3166_1": "US", "english_name": "United States of America", "native_name": "United States"},
            {"iso_3166_1": "GB", "english_name": "United Kingdom", "native_name": "United Kingdom"},
            {"iso_3166_1": "NZ", "english_name": "New Zealand", "native_name": "New Zealand"}
        ]
    }"#
}

// =============================================================================
// Full Lookup Journey (Mocked)
// =============================================================================

#[tokio::test]
async fn test_search_to_availability_flow() {
    // Complete flow: search -> details -> providers + regions -> resolve

    let mut server = Server::new_async().await;

    let search_mock = server
        .mock("GET", "/search/multi")
        .match_query(Matcher::AllOf(vec![Matcher::UrlEncoded(
            "query".into(),
            "the batman".into(),
        )]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_search_response())
        .create_async()
        .await;

    // Client appends ?append_to_response=recommendations
    let details_mock = server
        .mock("GET", "/movie/414906")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_movie_details_response())
        .create_async()
        .await;

    let providers_mock = server
        .mock("GET", "/movie/414906/watch/providers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_watch_providers_response())
        .create_async()
        .await;

    let regions_mock = server
        .mock("GET", "/watch/providers/regions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_regions_response())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());

    // === STEP 1: Search ===
    let results = client.search("the batman").await.unwrap();
    let movie = results
        .iter()
        .find(|r| r.media_kind == MediaKind::Movie)
        .expect("Should find The Batman");
    assert_eq!(movie.id, 414906);
    assert_eq!(movie.year, Some(2022));

    search_mock.assert_async().await;

    // === STEP 2: Details ===
    let details = client.title_details(MediaKind::Movie, movie.id).await.unwrap();
    assert_eq!(details.title, "The Batman");
    assert_eq!(details.kind, TitleKind::Movie { runtime: 176 });
    assert_eq!(details.recommendations.len(), 1);

    details_mock.assert_async().await;

    // === STEP 3: Providers and regions, fetched together ===
    let (catalog, regions) = tokio::try_join!(
        client.watch_providers(MediaKind::Movie, movie.id),
        client.watch_regions()
    )
    .unwrap();

    providers_mock.assert_async().await;
    regions_mock.assert_async().await;

    // === STEP 4: By-provider view ===
    let providers = dedup_providers(&catalog);
    let names: Vec<&str> = providers.iter().map(|p| p.provider_name.as_str()).collect();
    assert_eq!(names, ["Netflix", "Sky Go", "Tubi TV"]);

    let selected = select_provider(&providers, None).unwrap();
    assert_eq!(selected.provider_id, 8);

    let netflix_countries = countries_with_provider(&catalog, selected.provider_id, &regions);
    let codes: Vec<&str> = netflix_countries.iter().map(|c| c.iso_code.as_str()).collect();
    assert_eq!(codes, ["US", "GB"]);
    assert_eq!(netflix_countries[0].display_name, "United States");

    // Focusing another provider narrows the countries
    let sky_go = select_provider(&providers, Some("29")).unwrap();
    let sky_countries = countries_with_provider(&catalog, sky_go.provider_id, &regions);
    assert_eq!(sky_countries.len(), 1);
    assert_eq!(sky_countries[0].iso_code, "GB");

    // === STEP 5: By-country view ===
    let availability = resolve_country(&catalog, None, &regions);

    // Every catalog key is listed, the malformed "BR" entry included
    let available: Vec<&str> = availability
        .available
        .iter()
        .map(|c| c.iso_code.as_str())
        .collect();
    assert_eq!(available, ["US", "GB", "BR", "NZ"]);

    let br = availability.available.iter().find(|c| c.iso_code == "BR").unwrap();
    assert_eq!(br.display_name, "N/A");

    // No request: first catalog country wins
    assert_eq!(availability.country.unwrap().iso_code, "US");
    let labels: Vec<&str> = availability.groups.iter().map(|g| g.label()).collect();
    assert_eq!(labels, ["Stream", "Buy"]);

    // Requesting GB switches the breakdown
    let gb_view = resolve_country(&catalog, Some("GB"), &regions);
    assert_eq!(gb_view.country.unwrap().iso_code, "GB");
    assert_eq!(gb_view.groups.len(), 1);
    assert_eq!(gb_view.groups[0].offers.len(), 2);
}

#[tokio::test]
async fn test_tv_availability_flow() {
    // TV titles go through /tv/{id} endpoints with the same downstream logic

    let mut server = Server::new_async().await;

    let details_mock = server
        .mock("GET", "/tv/1396")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_tv_details_response())
        .create_async()
        .await;

    let providers_mock = server
        .mock("GET", "/tv/1396/watch/providers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "id": 1396,
                "results": {
                    "GB": {"flatrate": [{"provider_id": 29, "provider_name": "Sky Go"}]}
                }
            }"#,
        )
        .create_async()
        .await;

    let regions_mock = server
        .mock("GET", "/watch/providers/regions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_regions_response())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());

    let details = client.title_details(MediaKind::Tv, 1396).await.unwrap();
    assert_eq!(details.title, "Breaking Bad");
    assert_eq!(
        details.kind,
        TitleKind::Tv {
            seasons: 5,
            episodes: 62
        }
    );

    let (catalog, regions) = tokio::try_join!(
        client.watch_providers(MediaKind::Tv, 1396),
        client.watch_regions()
    )
    .unwrap();

    let view = resolve_country(&catalog, Some("GB"), &regions);
    let country = view.country.unwrap();
    assert_eq!(country.iso_code, "GB");
    assert_eq!(country.display_name, "United Kingdom");
    assert_eq!(view.groups[0].offers[0].provider_name, "Sky Go");

    details_mock.assert_async().await;
    providers_mock.assert_async().await;
    regions_mock.assert_async().await;
}

// =============================================================================
// Error Handling
// =============================================================================

#[tokio::test]
async fn test_concurrent_fetch_fails_when_one_endpoint_fails() {
    // try_join aborts the pair when either fetch errors

    let mut server = Server::new_async().await;

    let _providers_mock = server
        .mock("GET", "/movie/414906/watch/providers")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let _regions_mock = server
        .mock("GET", "/watch/providers/regions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_regions_response())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());

    let result = tokio::try_join!(
        client.watch_providers(MediaKind::Movie, 414906),
        client.watch_regions()
    );

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::ServerError(500))
    ));
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movie/999999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"success": false, "status_message": "The resource you requested could not be found."}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let err = client
        .title_details(MediaKind::Movie, 999_999_999)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TmdbError>(),
        Some(TmdbError::NotFound)
    ));
}

// =============================================================================
// Empty-Data Edge Cases
// =============================================================================

#[tokio::test]
async fn test_title_with_no_offers_resolves_nowhere() {
    // A valid title can have an empty provider catalog

    let mut server = Server::new_async().await;

    let _providers_mock = server
        .mock("GET", "/movie/414906/watch/providers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 414906, "results": {}}"#)
        .create_async()
        .await;

    let _regions_mock = server
        .mock("GET", "/watch/providers/regions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_regions_response())
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let (catalog, regions) = tokio::try_join!(
        client.watch_providers(MediaKind::Movie, 414906),
        client.watch_regions()
    )
    .unwrap();

    assert!(dedup_providers(&catalog).is_empty());
    assert!(select_provider(&dedup_providers(&catalog), None).is_none());

    let view = resolve_country(&catalog, Some("US"), &regions);
    assert!(view.available.is_empty());
    assert!(view.country.is_none());
}

#[tokio::test]
async fn test_client_handles_concurrent_lookups() {
    // One client shared across tasks, as the command layer uses it

    let mut server = Server::new_async().await;

    let providers_mock = server
        .mock("GET", "/movie/414906/watch/providers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_watch_providers_response())
        .expect(3)
        .create_async()
        .await;

    let client = std::sync::Arc::new(TmdbClient::with_base_url("test_key", server.url()));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.watch_providers(MediaKind::Movie, 414906).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    for result in results {
        let catalog = result.unwrap().unwrap();
        assert_eq!(catalog.len(), 4);
    }

    providers_mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_region_list_falls_back_to_placeholder_names() {
    let mut server = Server::new_async().await;

    let _providers_mock = server
        .mock("GET", "/movie/414906/watch/providers")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_watch_providers_response())
        .create_async()
        .await;

    let _regions_mock = server
        .mock("GET", "/watch/providers/regions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let (catalog, regions) = tokio::try_join!(
        client.watch_providers(MediaKind::Movie, 414906),
        client.watch_regions()
    )
    .unwrap();

    // Codes still resolve, display names don't
    let countries = countries_with_provider(&catalog, 8, &regions);
    assert_eq!(countries[0].iso_code, "US");
    assert_eq!(countries[0].display_name, "N/A");
}
