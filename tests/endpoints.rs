//! Resource endpoint tests against a mock Toggl API.

use serde_json::{json, Value};
use togglr::{
    ApiToken, Client, Config, Error, ListProjects, ListTimeEntries, NewProject, StartTimeEntry,
    TimeEntryUpdate,
};
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = Config::new(ApiToken::new("test-token"))
        .with_base_url(format!("{}/api/v9", server.uri()))
        .unwrap();
    Client::new(config).unwrap()
}

fn time_entry(id: u64, stop: Value, duration: i64) -> Value {
    json!({
        "id": id,
        "workspace_id": 10,
        "project_id": null,
        "billable": false,
        "start": "2024-03-01T09:30:00Z",
        "stop": stop,
        "duration": duration,
        "description": "Writing",
        "tags": ["docs"],
        "at": "2024-03-01T09:30:00Z",
        "user_id": 5
    })
}

fn project(id: u64) -> Value {
    json!({
        "id": id,
        "workspace_id": 10,
        "client_id": null,
        "name": "Website",
        "is_private": false,
        "active": true,
        "at": "2024-03-01T09:30:00Z",
        "color": "#06aaf5",
        "billable": null
    })
}

#[tokio::test]
async fn test_me_get_with_related_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/me"))
        .and(query_param("with_related_data", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "email": "test@example.com",
            "fullname": "Test User",
            "timezone": "Europe/Berlin",
            "default_workspace_id": 10,
            "beginning_of_week": 1,
            "image_url": null,
            "created_at": "2024-01-01T00:00:00Z",
            "workspaces": [{"id": 10}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let user = client_for(&mock_server).me().get(true).await.unwrap();

    assert_eq!(user.fullname, "Test User");
    assert_eq!(user.default_workspace_id, 10);
    assert_eq!(user.image_url, None);
    assert_eq!(user.has_password, None);
}

#[tokio::test]
async fn test_me_quota() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/me/quota"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"organization_id": 3, "remaining": 29, "total": 30, "resets_in_secs": 1800}
        ])))
        .mount(&mock_server)
        .await;

    let quota = client_for(&mock_server).me().quota().await.unwrap();
    assert_eq!(quota.len(), 1);
    assert_eq!(quota[0].remaining, 29);
}

#[tokio::test]
async fn test_workspaces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/workspaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 10, "name": "Personal", "premium": false},
            {"id": 11, "name": "Team", "premium": true, "default_hourly_rate": null}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v9/workspaces/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12, "name": 5})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let workspaces = client.workspaces().list().await.unwrap();
    assert_eq!(workspaces.len(), 2);
    assert!(workspaces[1].premium);

    let err = client.workspaces().get(12).await.unwrap_err();
    assert!(matches!(err, Error::Schema(_)));
    assert_eq!(
        err.to_string(),
        "Validation error: name: Expected string, received number, premium: Required"
    );
}

#[tokio::test]
async fn test_time_entry_list_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/me/time_entries"))
        .and(query_param("start_date", "2024-03-01"))
        .and(query_param("end_date", "2024-03-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            time_entry(1, json!("2024-03-01T10:30:00Z"), 3600),
            time_entry(2, Value::Null, -1709285400)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = ListTimeEntries {
        start_date: Some("2024-03-01".to_string()),
        end_date: Some("2024-03-31".to_string()),
        meta: false,
    };
    let entries = client_for(&mock_server)
        .time_entries()
        .list(&filter)
        .await
        .unwrap();

    assert_eq!(entries.len(), 2);
    assert!(!entries[0].is_running());
    assert!(entries[1].is_running());
    assert_eq!(entries[0].tags, Some(vec!["docs".to_string()]));
}

#[tokio::test]
async fn test_time_entry_list_reports_indexed_paths() {
    let mock_server = MockServer::start().await;

    let mut broken = time_entry(2, Value::Null, -1);
    broken["billable"] = json!("yes");

    Mock::given(method("GET"))
        .and(path("/api/v9/me/time_entries"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([time_entry(1, Value::Null, -1), broken])),
        )
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .time_entries()
        .list(&ListTimeEntries::default())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Validation error: 1.billable: Expected boolean, received string"
    );
}

#[tokio::test]
async fn test_current_time_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/me/time_entries/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v9/me/time_entries/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(time_entry(9, Value::Null, -5)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert_eq!(client.time_entries().current().await.unwrap(), None);

    let running = client.time_entries().current().await.unwrap().unwrap();
    assert_eq!(running.id, 9);
    assert!(running.is_running());
}

#[tokio::test]
async fn test_start_and_stop_time_entry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v9/workspaces/10/time_entries"))
        .and(body_partial_json(json!({
            "workspace_id": 10,
            "created_with": "togglr",
            "description": "Writing",
            "billable": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(time_entry(3, Value::Null, -100)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v9/workspaces/10/time_entries/3/stop"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(time_entry(3, json!("2024-03-01T10:30:00Z"), 3600)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v9/workspaces/10/time_entries/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let entries = client.time_entries();

    let started = entries
        .start(
            10,
            StartTimeEntry {
                description: Some("Writing".to_string()),
                billable: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(started.is_running());

    let stopped = entries.stop(10, 3).await.unwrap();
    assert_eq!(stopped.duration, 3600);

    entries.delete(10, 3).await.unwrap();
}

#[tokio::test]
async fn test_update_time_entry() {
    let mock_server = MockServer::start().await;

    let mut updated = time_entry(3, json!("2024-03-01T10:30:00Z"), 3600);
    updated["description"] = json!("Reviewing");

    Mock::given(method("PUT"))
        .and(path("/api/v9/workspaces/10/time_entries/3"))
        .and(body_json(json!({"description": "Reviewing", "tags": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&mock_server)
        .await;

    let update = TimeEntryUpdate {
        description: Some("Reviewing".to_string()),
        tags: Some(Vec::new()),
        ..Default::default()
    };
    let entry = client_for(&mock_server)
        .time_entries()
        .update(10, 3, &update)
        .await
        .unwrap();

    assert_eq!(entry.description.as_deref(), Some("Reviewing"));
    assert!(!entry.is_running());
}

#[tokio::test]
async fn test_update_time_entry_validates_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v9/workspaces/10/time_entries/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .time_entries()
        .update(10, 3, &TimeEntryUpdate::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Schema(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_projects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v9/workspaces/10/projects"))
        .and(query_param("active", "true"))
        .and(query_param("client_ids", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project(20)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v9/workspaces/10/projects"))
        .and(body_partial_json(json!({"name": "Website", "color": "#06aaf5"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(project(21)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v9/workspaces/10/projects/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let projects = client.projects();

    let filter = ListProjects {
        active: Some(true),
        client_ids: vec![1, 2],
    };
    let listed = projects.list(10, &filter).await.unwrap();
    assert_eq!(listed[0].name, "Website");
    assert_eq!(listed[0].billable, None);

    let created = projects
        .create(
            10,
            &NewProject {
                name: "Website".to_string(),
                color: Some("#06aaf5".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, 21);

    let err = projects.get(10, 99).await.unwrap_err();
    assert_eq!(err.to_string(), "Resource not found");
}
