mod common;

use std::sync::Arc;
use std::time::Duration;

use a2a_agent::{AgentClient, ClientConfig, ServerConfig};
use a2a_auth::{AuthConfig, HmacAuth, RequestSigner, StaticSecrets};
use a2a_contract::{CreateTask, ErrorCode, Task, TaskId, TaskStatus};
use a2a_task_store::TaskStore;
use serde_json::json;

use common::{app, client, spawn};

#[tokio::test]
async fn test_run_task_against_live_agent() {
    let (app, _) = app(ServerConfig::default());
    let base = format!("http://{}", spawn(app).await);

    let task = client()
        .run_task(&base, &CreateTask::new("ECHO", json!({"n": 3})), Some("tr_test"))
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Succeeded);
    assert_eq!(task.result, Some(json!({"n": 3})));

    let meta = client().discover(&base).await.unwrap();
    assert!(meta.supports("ECHO"));
}

#[tokio::test]
async fn test_remote_errors_surface_payload() {
    let (app, _) = app(ServerConfig::default());
    let base = format!("http://{}", spawn(app).await);

    let err = client()
        .create_task(&base, &CreateTask::new("UNKNOWN", json!({"a": 1})), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);

    let err = client()
        .get_task(&base, &TaskId::from("t_nope"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_unreachable_agent_is_an_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client()
        .create_task(
            &format!("http://{addr}"),
            &CreateTask::new("ECHO", json!({"a": 1})),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
}

#[tokio::test]
async fn test_reply_url_delivers_completion_event() {
    // Receiver plays the caller: it owns a pending task waiting for the event.
    let (receiver, receiver_store) = app(ServerConfig::default());
    let receiver_addr = spawn(receiver).await;
    let waiting = TaskId::generate();
    receiver_store.put(Task::pending(waiting.clone())).await.unwrap();

    let (worker, worker_store) = app(ServerConfig::default());
    let worker_base = format!("http://{}", spawn(worker).await);

    let request = CreateTask::new("SLOW", json!({"n": 9}))
        .with_reply_url(format!("http://{receiver_addr}/tasks/{waiting}/events"));
    let ack = client().create_task(&worker_base, &request, None).await.unwrap();
    assert_eq!(ack.status, TaskStatus::Pending);

    let mut delivered = None;
    for _ in 0..100 {
        let task = receiver_store.get(&waiting).await.unwrap().unwrap();
        if task.is_terminal() {
            delivered = Some(task);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let delivered = delivered.expect("completion event never arrived");
    assert_eq!(delivered.status, TaskStatus::Succeeded);
    assert_eq!(delivered.result, Some(json!({"n": 9})));

    let own = worker_store.get(&ack.task_id).await.unwrap().unwrap();
    assert_eq!(own.status, TaskStatus::Succeeded);
}

#[tokio::test]
async fn test_reply_url_failure_event_carries_error() {
    let (receiver, receiver_store) = app(ServerConfig::default());
    let receiver_addr = spawn(receiver).await;
    let waiting = TaskId::generate();
    receiver_store.put(Task::pending(waiting.clone())).await.unwrap();

    let (worker, _) = app(ServerConfig::default());
    let worker_base = format!("http://{}", spawn(worker).await);

    let request = CreateTask::new("FAIL", json!({"n": 1}))
        .with_reply_url(format!("http://{receiver_addr}/tasks/{waiting}/events"));
    client().create_task(&worker_base, &request, None).await.unwrap();

    let mut delivered = None;
    for _ in 0..100 {
        let task = receiver_store.get(&waiting).await.unwrap().unwrap();
        if task.is_terminal() {
            delivered = Some(task);
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let delivered = delivered.expect("failure event never arrived");
    assert_eq!(delivered.status, TaskStatus::Failed);
    assert_eq!(delivered.error.unwrap().code, ErrorCode::Internal);
}

#[tokio::test]
async fn test_signed_client_passes_auth() {
    let secrets = StaticSecrets::new().with("agent.concierge", "s3cret");
    let config = ServerConfig {
        auth: Some(HmacAuth::new(Arc::new(secrets), AuthConfig::default())),
        ..ServerConfig::default()
    };
    let (app, _) = app(config);
    let base = format!("http://{}", spawn(app).await);
    let request = CreateTask::new("ECHO", json!({"n": 1}));

    let err = client().create_task(&base, &request, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let wrong = AgentClient::new(
        ClientConfig::default(),
        Some(RequestSigner::new("agent.concierge", "guess")),
    )
    .unwrap();
    let err = wrong.create_task(&base, &request, None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);

    let signed = AgentClient::new(
        ClientConfig::default(),
        Some(RequestSigner::new("agent.concierge", "s3cret")),
    )
    .unwrap();
    let task = signed.run_task(&base, &request, None).await.unwrap();
    assert_eq!(task.status, TaskStatus::Succeeded);
}
