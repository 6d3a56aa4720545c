//! HTTP-level integration tests for sensor ingestion, the evaluator, the
//! status log, and alert lifecycle.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, build_test_app, delete_auth, get, get_auth, patch_json_auth, post_json,
    post_json_auth,
};
use machwatch_db::models::machine::CreateMachine;
use machwatch_db::models::machine_status::CreateMachineStatus;
use machwatch_db::repositories::{MachineRepo, MachineStatusRepo};
use sqlx::PgPool;

async fn seed_machine(pool: &PgPool, serial: &str) -> machwatch_db::models::machine::Machine {
    MachineRepo::create(
        pool,
        &CreateMachine {
            name: format!("Machine {serial}"),
            model: "M-200".to_string(),
            machine_type: "press".to_string(),
            serial_number: serial.to_string(),
            location: "Hall B".to_string(),
            last_service: None,
        },
    )
    .await
    .expect("machine creation should succeed")
}

/// A quiet reading payload for the given machine.
fn quiet_reading(machine_id: i64) -> serde_json::Value {
    serde_json::json!({
        "machine": machine_id,
        "temperature1": 20.0, "temperature2": 21.0,
        "temperature3": 19.5, "temperature4": 22.0,
        "speed1": 400.0, "speed2": 350.0, "speed3": 0.0, "speed4": 120.0,
        "door1_state": false, "door2_state": false
    })
}

// ---------------------------------------------------------------------------
// Sensor data
// ---------------------------------------------------------------------------

/// Latest-read returns the most recently inserted reading.
#[sqlx::test(migrations = "../db/migrations")]
async fn latest_returns_most_recent_reading(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-LATEST").await;
    let app = build_test_app(pool);

    let mut first = quiet_reading(machine.id);
    first["temperature1"] = serde_json::json!(25.0);
    let response = post_json(app.clone(), "/api/sensor-data", first).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut second = quiet_reading(machine.id);
    second["temperature1"] = serde_json::json!(30.0);
    let response = post_json(app.clone(), "/api/sensor-data", second).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        app,
        &format!("/api/sensor-data/machine/{}/latest", machine.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["temperature1"], 30.0);
}

/// A machine with no readings answers with a synthetic all-zero reading.
#[sqlx::test(migrations = "../db/migrations")]
async fn latest_synthesizes_zero_reading(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-EMPTY").await;
    let app = build_test_app(pool);

    let response = get(
        app,
        &format!("/api/sensor-data/machine/{}/latest", machine.id),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], 0);
    assert_eq!(json["temperature1"], 0.0);
    assert_eq!(json["door1_open"], false);
}

/// Partial payloads default missing channels to zero and doors to closed.
#[sqlx::test(migrations = "../db/migrations")]
async fn partial_payload_defaults_to_zero(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-PARTIAL").await;
    let app = build_test_app(pool);

    let body = serde_json::json!({ "machine": machine.id, "temperature1": 33.0 });
    let response = post_json(app, "/api/sensor-data", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["temperature1"], 33.0);
    assert_eq!(json["temperature4"], 0.0);
    assert_eq!(json["speed1"], 0.0);
    assert_eq!(json["door2_open"], false);
}

/// Ingestion for an unknown machine is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn reading_for_unknown_machine_is_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/sensor-data", quiet_reading(777)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// History returns at most 100 rows, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn reading_history_is_capped_and_ordered(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-HIST").await;
    let app = build_test_app(pool);

    for i in 0..105 {
        let mut body = quiet_reading(machine.id);
        body["speed1"] = serde_json::json!(f64::from(i));
        let response = post_json(app.clone(), "/api/sensor-data", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app, &format!("/api/sensor-data/machine/{}", machine.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows[0]["speed1"], 104.0, "newest reading first");
}

/// The admin purge deletes everything and reports the count.
#[sqlx::test(migrations = "../db/migrations")]
async fn purge_deletes_all_readings(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-PURGE").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "purger", "admin").await;

    for _ in 0..3 {
        post_json(app.clone(), "/api/sensor-data", quiet_reading(machine.id)).await;
    }

    let response = delete_auth(app.clone(), "/api/sensor-data/all", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["deletedCount"], 3);

    let response = get(app, &format!("/api/sensor-data/machine/{}", machine.id)).await;
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Machine status
// ---------------------------------------------------------------------------

/// A machine with no status history reports offline.
#[sqlx::test(migrations = "../db/migrations")]
async fn current_status_defaults_to_offline(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-OFF").await;
    let app = build_test_app(pool);

    let response = get(app, &format!("/api/machine-status/machine/{}", machine.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "offline");
    assert_eq!(json["id"], 0);
}

/// Current status is the most recent row; history caps at 20 newest-first.
#[sqlx::test(migrations = "../db/migrations")]
async fn status_history_capped_at_twenty(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-LOG").await;

    // Alternate through statuses so the newest rows are distinguishable.
    for i in 0..25 {
        let status = if i % 2 == 0 { "online" } else { "maintenance" };
        MachineStatusRepo::create(
            &pool,
            &CreateMachineStatus {
                machine_id: machine.id,
                status: status.parse().unwrap(),
                changed_by: None,
            },
        )
        .await
        .unwrap();
    }

    let app = build_test_app(pool);

    let response = get(
        app.clone(),
        &format!("/api/machine-status/machine/{}", machine.id),
    )
    .await;
    let current = body_json(response).await;
    assert_eq!(current["status"], "online", "25th insert (i=24) was online");

    let response = get(app, &format!("/api/machine-status/history/{}", machine.id)).await;
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0]["status"], "online");
}

/// Recording a status requires technician+ and validates the status value.
#[sqlx::test(migrations = "../db/migrations")]
async fn status_create_validates_input(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-VAL").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "techv", "technician").await;

    let bad = serde_json::json!({ "machine": machine.id, "status": "running" });
    let response = post_json_auth(app.clone(), "/api/machine-status", &token, bad).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown = serde_json::json!({ "machine": 31337, "status": "online" });
    let response = post_json_auth(app.clone(), "/api/machine-status", &token, unknown).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let good = serde_json::json!({ "machine": machine.id, "status": "online" });
    let response = post_json_auth(app, "/api/machine-status", &token, good).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "online");
    assert!(json["changed_by"].is_number(), "defaults to the caller");
}

// ---------------------------------------------------------------------------
// Evaluator via ingestion
// ---------------------------------------------------------------------------

/// A critical temperature raises a critical alert and flips online to
/// error; a follow-up normal reading resolves it and recovers the status.
#[sqlx::test(migrations = "../db/migrations")]
async fn critical_breach_then_recovery(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-BREACH").await;
    MachineStatusRepo::create(
        &pool,
        &CreateMachineStatus {
            machine_id: machine.id,
            status: "online".parse().unwrap(),
            changed_by: None,
        },
    )
    .await
    .unwrap();

    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "observer", "viewer").await;

    let mut hot = quiet_reading(machine.id);
    hot["temperature1"] = serde_json::json!(90.0);
    let response = post_json(app.clone(), "/api/sensor-data", hot).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        app.clone(),
        &format!("/api/alerts/machine/{}", machine.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "temperature");
    assert_eq!(alerts[0]["severity"], "critical");
    assert_eq!(alerts[0]["is_active"], true);

    let response = get(
        app.clone(),
        &format!("/api/machine-status/machine/{}", machine.id),
    )
    .await;
    let status = body_json(response).await;
    assert_eq!(status["status"], "error");

    // Recovery reading.
    let mut cool = quiet_reading(machine.id);
    cool["temperature1"] = serde_json::json!(50.0);
    let response = post_json(app.clone(), "/api/sensor-data", cool).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(
        app.clone(),
        &format!("/api/alerts/machine/{}", machine.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["is_active"], false);
    assert!(alerts[0]["resolved_at"].is_string());

    let response = get(app, &format!("/api/machine-status/machine/{}", machine.id)).await;
    let status = body_json(response).await;
    assert_eq!(status["status"], "online");
}

/// A warning-band value raises a medium alert without a status flip.
#[sqlx::test(migrations = "../db/migrations")]
async fn warning_breach_raises_medium_alert(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-WARN").await;
    MachineStatusRepo::create(
        &pool,
        &CreateMachineStatus {
            machine_id: machine.id,
            status: "online".parse().unwrap(),
            changed_by: None,
        },
    )
    .await
    .unwrap();

    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "warnwatch", "viewer").await;

    let mut warm = quiet_reading(machine.id);
    warm["speed2"] = serde_json::json!(900.0);
    post_json(app.clone(), "/api/sensor-data", warm).await;

    let response = get_auth(app.clone(), "/api/alerts/active", &token).await;
    let json = body_json(response).await;
    let alerts = json.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["alert_type"], "speed");
    assert_eq!(alerts[0]["severity"], "medium");

    let response = get(app, &format!("/api/machine-status/machine/{}", machine.id)).await;
    let status = body_json(response).await;
    assert_eq!(status["status"], "online");
}

/// Concurrent breaching samples yield exactly one active alert per type.
#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_breaches_raise_single_alert(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-RACE").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "racer", "viewer").await;

    let mut hot = quiet_reading(machine.id);
    hot["temperature1"] = serde_json::json!(95.0);

    let (a, b) = tokio::join!(
        post_json(app.clone(), "/api/sensor-data", hot.clone()),
        post_json(app.clone(), "/api/sensor-data", hot),
    );
    assert_eq!(a.status(), StatusCode::CREATED);
    assert_eq!(b.status(), StatusCode::CREATED);

    let response = get_auth(
        app,
        &format!("/api/alerts?machine_id={}&is_active=true", machine.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let active = json.as_array().unwrap();
    let temp_alerts: Vec<_> = active
        .iter()
        .filter(|a| a["alert_type"] == "temperature")
        .collect();
    assert_eq!(temp_alerts.len(), 1, "partial unique index must dedupe");
}

// ---------------------------------------------------------------------------
// Alert lifecycle
// ---------------------------------------------------------------------------

/// Manual resolution is idempotent: the second call returns the same
/// terminal row with an unchanged resolved_at.
#[sqlx::test(migrations = "../db/migrations")]
async fn resolve_is_idempotent(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-RES").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "resolver", "technician").await;

    let body = serde_json::json!({
        "machine": machine.id, "alert_type": "other",
        "severity": "high", "message": "observed oil leak"
    });
    let response = post_json_auth(app.clone(), "/api/alerts", &token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let alert = body_json(response).await;
    let id = alert["id"].as_i64().unwrap();

    let response =
        patch_json_auth(app.clone(), &format!("/api/alerts/{id}/resolve"), &token, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["is_active"], false);
    let resolved_at = first["resolved_at"].as_str().unwrap().to_string();

    let response =
        patch_json_auth(app.clone(), &format!("/api/alerts/{id}/resolve"), &token, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["resolved_at"], resolved_at, "terminal state is stable");

    let response = patch_json_auth(
        app,
        "/api/alerts/99999/resolve",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Manual creation respects the one-active-per-type rule with a 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_active_manual_alert_conflicts(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-MANUAL").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "creator", "technician").await;

    let body = serde_json::json!({
        "machine": machine.id, "alert_type": "maintenance",
        "severity": "low", "message": "belt wear"
    });
    let response = post_json_auth(app.clone(), "/api/alerts", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(app, "/api/alerts", &token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The alert list honors severity and active-state filters.
#[sqlx::test(migrations = "../db/migrations")]
async fn alert_list_filters_apply(pool: PgPool) {
    let machine = seed_machine(&pool, "SN-FILTER").await;
    let app = build_test_app(pool.clone());
    let token = auth_token(&pool, app.clone(), "filterer", "technician").await;

    for (alert_type, severity) in [("maintenance", "low"), ("other", "critical")] {
        let body = serde_json::json!({
            "machine": machine.id, "alert_type": alert_type,
            "severity": severity, "message": "seeded"
        });
        let response = post_json_auth(app.clone(), "/api/alerts", &token, body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get_auth(app.clone(), "/api/alerts?severity=critical", &token).await;
    let json = body_json(response).await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["alert_type"], "other");

    let response = get_auth(app, "/api/alerts?severity=ridiculous", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
