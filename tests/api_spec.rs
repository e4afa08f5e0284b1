use axum_test::TestServer;
use pinpoint::api::{create_router, AppState};
use pinpoint::geo::HostLocator;
use pinpoint::models::{Coordinates, CreateMarkerInput, Marker};
use pinpoint::store::MarkerStore;
use uuid::Uuid;

fn state_with_device(fix: Option<Coordinates>) -> AppState {
    let store = MarkerStore::open_memory().expect("Failed to create store");
    store.migrate().expect("Failed to migrate");
    AppState {
        store,
        geocoder: None,
        ip: None,
        device: HostLocator::new(fix),
    }
}

fn setup() -> TestServer {
    let app = create_router(state_with_device(None));
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_marker(server: &TestServer, name: &str, latitude: f64, longitude: f64) -> Marker {
    server
        .post("/api/v1/markers")
        .json(&CreateMarkerInput {
            name: name.to_string(),
            latitude,
            longitude,
        })
        .await
        .json::<Marker>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
    }
}

mod markers {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn list_is_empty_for_a_fresh_store() {
        let server = setup();

        let response = server.get("/api/v1/markers").await;

        response.assert_status_ok();
        let markers: Vec<Marker> = response.json();
        assert!(markers.is_empty());
    }

    #[tokio::test]
    async fn create_returns_the_new_marker() {
        let server = setup();

        let response = server
            .post("/api/v1/markers")
            .json(&CreateMarkerInput {
                name: "Home".to_string(),
                latitude: 10.0,
                longitude: 20.0,
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let marker: Marker = response.json();
        assert_eq!(marker.name, "Home");
        assert_eq!(marker.latitude, 10.0);
        assert_eq!(marker.longitude, 20.0);
    }

    #[tokio::test]
    async fn create_rejects_an_empty_name() {
        let server = setup();

        let response = server
            .post("/api/v1/markers")
            .json(&CreateMarkerInput {
                name: "   ".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_coordinates() {
        let server = setup();

        let response = server
            .post("/api/v1/markers")
            .json(&CreateMarkerInput {
                name: "Nowhere".to_string(),
                latitude: 120.0,
                longitude: 0.0,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detail_returns_the_marker_by_id() {
        let server = setup();
        let created = create_marker(&server, "Work", -23.5, -46.6).await;

        let response = server.get(&format!("/api/v1/markers/{}", created.id)).await;

        response.assert_status_ok();
        let marker: Marker = response.json();
        assert_eq!(marker, created);
    }

    #[tokio::test]
    async fn detail_is_not_found_for_an_unknown_id() {
        let server = setup();

        let response = server.get(&format!("/api/v1/markers/{}", Uuid::new_v4())).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_preserves_creation_order() {
        let server = setup();
        create_marker(&server, "First", 1.0, 1.0).await;
        create_marker(&server, "Second", 2.0, 2.0).await;
        create_marker(&server, "Third", 3.0, 3.0).await;

        let markers: Vec<Marker> = server.get("/api/v1/markers").await.json();

        let names: Vec<_> = markers.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn delete_removes_the_marker() {
        let server = setup();
        let created = create_marker(&server, "Gone", 5.0, 5.0).await;

        server
            .delete(&format!("/api/v1/markers/{}", created.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/v1/markers/{}", created.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_of_an_unknown_id_is_a_no_op() {
        let server = setup();
        create_marker(&server, "Kept", 1.0, 1.0).await;

        server
            .delete(&format!("/api/v1/markers/{}", Uuid::new_v4()))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let markers: Vec<Marker> = server.get("/api/v1/markers").await.json();
        assert_eq!(markers.len(), 1);
    }
}

mod location {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn resolves_from_the_device_fix() {
        let app = create_router(state_with_device(Some(Coordinates::new(10.0, 20.0))));
        let server = TestServer::new(app).expect("Failed to create test server");

        let response = server.get("/api/v1/location").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "resolved");
        assert_eq!(body["latitude"], 10.0);
        assert_eq!(body["longitude"], 20.0);
    }

    #[tokio::test]
    async fn is_unavailable_without_any_position_source() {
        let server = setup();

        let response = server.get("/api/v1/location").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "unavailable");
        assert!(body["message"].is_string());
    }
}

mod places {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn search_is_unavailable_without_a_geocoding_key() {
        let server = setup();

        let response = server.get("/api/v1/places/search?q=paulista").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn reverse_is_unavailable_without_a_geocoding_key() {
        let server = setup();

        let response = server
            .get("/api/v1/places/reverse?latitude=-23.5&longitude=-46.6")
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn resolve_confirm_list_detail() {
        // Location resolves to (10.0, 20.0); the user confirms "Home"
        // without moving the map.
        let app = create_router(state_with_device(Some(Coordinates::new(10.0, 20.0))));
        let server = TestServer::new(app).expect("Failed to create test server");

        let location: serde_json::Value = server.get("/api/v1/location").await.json();
        assert_eq!(location["status"], "resolved");

        let marker = create_marker(
            &server,
            "Home",
            location["latitude"].as_f64().unwrap(),
            location["longitude"].as_f64().unwrap(),
        )
        .await;

        // The list shows exactly one entry linking to the detail route.
        let markers: Vec<Marker> = server.get("/api/v1/markers").await.json();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Home");
        assert_eq!(markers[0].latitude, 10.0);
        assert_eq!(markers[0].longitude, 20.0);

        let detail: Marker = server
            .get(&format!("/api/v1/markers/{}", markers[0].id))
            .await
            .json();
        assert_eq!(detail, marker);
    }
}
