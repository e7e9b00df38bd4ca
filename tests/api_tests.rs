use std::time::Duration;

use axum_test::TestServer;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use mixer_api::{
    api::{create_router, AppState},
    models::{
        AgeRestrictions, Complaint, ContentType, DictionaryEntry, LibraryItem, RiskLevel,
        Supplement, DOSAGE_FALLBACK,
    },
    services::{stores::MemoryStore, HistoryWriterHandle, RecommendationEngine, SelectionPolicy},
};

fn supplement(name: &str, min_age: Option<u32>) -> Supplement {
    Supplement {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        default_dosage: Some("1 tablet daily".to_string()),
        side_effects: Some("Mild nausea".to_string()),
        risk_level: RiskLevel::new(2).unwrap(),
        contraindications: None,
        age_restrictions: min_age.map(|min| AgeRestrictions {
            min_age: Some(min),
            max_age: None,
        }),
        indications: vec![],
    }
}

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for name in [
        "Biotin",
        "Calcium",
        "Iron",
        "Magnesium",
        "Omega-3",
        "Vitamin C",
        "Vitamin D",
        "Zinc",
    ] {
        store.add_supplement(supplement(name, None)).await;
    }
    store.add_supplement(supplement("Ashwagandha", Some(18))).await;
    store
        .add_complaint(Complaint {
            id: Uuid::new_v4(),
            name: "Fatigue".to_string(),
            category: "energy".to_string(),
        })
        .await;
    store
}

async fn create_test_server(store: MemoryStore) -> (TestServer, HistoryWriterHandle) {
    let (state, handle) = AppState::in_memory(store, RecommendationEngine::default());
    let app = create_router(state);
    (TestServer::new(app).unwrap(), handle)
}

fn valid_form() -> Value {
    json!({
        "age": "10",
        "height": "140",
        "weight": "35",
        "complaints": [],
        "risk_accepted": true
    })
}

#[tokio::test]
async fn test_health_check_sets_request_id() {
    let (server, _handle) = create_test_server(MemoryStore::new()).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_catalog_lists_complaints_and_supplements() {
    let (server, _handle) = create_test_server(seeded_store().await).await;

    let response = server.get("/api/v1/mixer/catalog").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["complaints"].as_array().unwrap().len(), 1);
    assert_eq!(body["supplements"].as_array().unwrap().len(), 9);
    assert_eq!(body["supplements"][0]["name"], "Ashwagandha");
}

#[tokio::test]
async fn test_one_shot_recommendations_are_capped_and_age_filtered() {
    let store = seeded_store().await;
    let (server, handle) = create_test_server(store.clone()).await;

    let request_id = Uuid::new_v4();
    let response = server
        .post("/api/v1/mixer/recommendations")
        .add_header("x-request-id", request_id.to_string())
        .json(&valid_form())
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let names: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["supplement_name"].as_str().unwrap())
        .collect();
    // Ashwagandha sorts first but is adults-only
    assert_eq!(names, vec!["Biotin", "Calcium", "Iron", "Magnesium", "Omega-3"]);
    assert_eq!(body["recommendations"][0]["success_rate"], "Medium");
    assert_eq!(body["recommendations"][0]["risk_level"], 2);
    assert_eq!(body["empty"], false);
    assert!(body["disclaimer"].as_str().unwrap().contains("not personalised medical advice"));

    handle.shutdown().await;
    let submissions = store.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].age, 10);
    assert_eq!(submissions[0].request_id, Some(request_id));
    assert_eq!(submissions[0].recommendations.len(), 5);
}

#[tokio::test]
async fn test_risk_not_accepted_is_rejected_without_history() {
    let store = seeded_store().await;
    let (server, handle) = create_test_server(store.clone()).await;

    let mut form = valid_form();
    form["risk_accepted"] = json!(false);
    let response = server.post("/api/v1/mixer/recommendations").json(&form).await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["fields"][0]["field"], "risk_accepted");

    handle.shutdown().await;
    assert!(store.submissions().await.is_empty());
}

#[tokio::test]
async fn test_invalid_numbers_are_reported_per_field() {
    let (server, _handle) = create_test_server(seeded_store().await).await;

    let response = server
        .post("/api/v1/mixer/recommendations")
        .json(&json!({ "age": "abc", "height": 0, "weight": "70", "risk_accepted": true }))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["age", "height"]);
}

#[tokio::test]
async fn test_empty_catalog_yields_empty_result() {
    let (server, _handle) = create_test_server(MemoryStore::new()).await;

    let response = server
        .post("/api/v1/mixer/recommendations")
        .json(&valid_form())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["empty"], true);
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (server, _handle) = create_test_server(seeded_store().await).await;

    let response = server.post("/api/v1/mixer/sessions").await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let session: Value = response.json();
    assert_eq!(session["phase"], "collecting");
    let id = session["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/api/v1/mixer/sessions/{}/submit", id))
        .json(&valid_form())
        .await;
    response.assert_status_ok();
    let presenting: Value = response.json();
    assert_eq!(presenting["phase"], "presenting");
    assert_eq!(presenting["results"]["recommendations"].as_array().unwrap().len(), 5);

    // A second submit must go through reset first
    let response = server
        .post(&format!("/api/v1/mixer/sessions/{}/submit", id))
        .json(&valid_form())
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    let response = server
        .post(&format!("/api/v1/mixer/sessions/{}/reset", id))
        .await;
    response.assert_status_ok();
    let reset: Value = response.json();
    assert_eq!(reset["phase"], "collecting");
    assert!(reset["results"].is_null());

    let response = server.get(&format!("/api/v1/mixer/sessions/{}", id)).await;
    let fetched: Value = response.json();
    assert_eq!(fetched["phase"], "collecting");
}

#[tokio::test]
async fn test_expired_sessions_are_pruned_on_create() {
    let (state, _handle) =
        AppState::in_memory(MemoryStore::new(), RecommendationEngine::default());
    let state = state.with_session_ttl(Duration::from_millis(20));
    let server = TestServer::new(create_router(state.clone())).unwrap();

    let first: Value = server.post("/api/v1/mixer/sessions").await.json();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second: Value = server.post("/api/v1/mixer/sessions").await.json();

    assert_eq!(state.sessions.read().await.len(), 1);
    server
        .get(&format!("/api/v1/mixer/sessions/{}", first["id"].as_str().unwrap()))
        .await
        .assert_status_not_found();
    server
        .get(&format!("/api/v1/mixer/sessions/{}", second["id"].as_str().unwrap()))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let (server, _handle) = create_test_server(MemoryStore::new()).await;
    let response = server
        .get(&format!("/api/v1/mixer/sessions/{}", Uuid::new_v4()))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_complaint_overlap_policy_ranks_indicated_first() {
    let fatigue = Complaint {
        id: Uuid::new_v4(),
        name: "Fatigue".to_string(),
        category: "energy".to_string(),
    };
    let store = seeded_store().await;
    store.add_complaint(fatigue.clone()).await;
    let mut iron = supplement("Zz Iron bisglycinate", None);
    iron.indications = vec![fatigue.id];
    iron.default_dosage = None;
    store.add_supplement(iron).await;

    let (state, _handle) =
        AppState::in_memory(store, RecommendationEngine::new(SelectionPolicy::ComplaintOverlap));
    let server = TestServer::new(create_router(state)).unwrap();

    let mut form = valid_form();
    form["age"] = json!(30);
    form["complaints"] = json!([fatigue.id]);
    let response = server.post("/api/v1/mixer/recommendations").json(&form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendations"][0]["supplement_name"], "Zz Iron bisglycinate");
    assert_eq!(body["recommendations"][0]["success_rate"], "High");
    assert_eq!(body["recommendations"][0]["dosage"], DOSAGE_FALLBACK);
    assert_eq!(body["recommendations"][1]["success_rate"], "Low");
}

#[tokio::test]
async fn test_library_and_dictionary() {
    let store = MemoryStore::new();
    let item = LibraryItem {
        id: Uuid::new_v4(),
        title: "Vitamin D primer".to_string(),
        description: "Overview".to_string(),
        content_type: ContentType::Pdf,
        file_url: "https://example.org/vitd.pdf".to_string(),
        preview_text: "Sunlight and supplements".to_string(),
        created_at: Utc::now(),
    };
    store.add_library_item(item.clone()).await;
    for (term, definition) in [
        ("Zinc", "Trace mineral"),
        ("Adaptogen", "Herb thought to help with stress"),
    ] {
        store
            .add_dictionary_entry(DictionaryEntry {
                id: Uuid::new_v4(),
                term: term.to_string(),
                definition: definition.to_string(),
                created_at: Utc::now(),
            })
            .await;
    }
    let (server, _handle) = create_test_server(store).await;

    let library: Vec<Value> = server.get("/api/v1/library").await.json();
    assert_eq!(library.len(), 1);
    assert_eq!(library[0]["content_type"], "pdf");

    let response = server.get(&format!("/api/v1/library/{}", item.id)).await;
    response.assert_status_ok();
    server
        .get(&format!("/api/v1/library/{}", Uuid::new_v4()))
        .await
        .assert_status_not_found();

    let all: Vec<Value> = server.get("/api/v1/dictionary").await.json();
    assert_eq!(all[0]["term"], "Adaptogen");

    let found: Vec<Value> = server
        .get("/api/v1/dictionary")
        .add_query_param("q", "MINERAL")
        .await
        .json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["term"], "Zinc");
}
