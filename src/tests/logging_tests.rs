use crate::core::constants::{EXPENSE_ADDED, GROUP_CREATED, USER_REGISTERED};
use crate::core::errors::SplitError;
use crate::infrastructure::logging::{LoggingService, in_memory::InMemoryLogging};
use crate::tests::{create_test_service, group_with, register};
use serde_json::json;

#[tokio::test]
async fn test_log_action_records_group_and_user() {
    let logging = InMemoryLogging::new();
    logging
        .log_action(GROUP_CREATED, Some("g1"), json!({ "group_id": "g1", "name": "Trip" }), Some("u1"))
        .await
        .unwrap();

    let logs = logging.get_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, GROUP_CREATED);
    assert_eq!(logs[0].group_id.as_deref(), Some("g1"));
    assert_eq!(logs[0].user_id.as_deref(), Some("u1"));
    assert_eq!(logs[0].details["name"], json!("Trip"));
}

#[tokio::test]
async fn test_log_action_rejects_inconsistent_details() {
    let logging = InMemoryLogging::new();

    let result = logging.log_action(EXPENSE_ADDED, Some("g1"), json!("not an object"), None).await;
    assert!(matches!(result, Err(SplitError::LoggingError(_))));

    let result = logging
        .log_action(EXPENSE_ADDED, Some("g1"), json!({ "group_id": "g2" }), None)
        .await;
    assert!(matches!(result, Err(SplitError::LoggingError(_))));

    let result = logging
        .log_action(USER_REGISTERED, None, json!({ "group_id": "g1" }), None)
        .await;
    assert!(matches!(result, Err(SplitError::LoggingError(_))));

    assert!(logging.get_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_service_actions_land_in_app_log() {
    let service = create_test_service();
    let alice = register(&service, "Alice").await;
    let bob = register(&service, "Bob").await;
    let group = group_with(&service, &[&alice, &bob]).await;

    let logs = service.get_app_logs().await.unwrap();
    let registered: Vec<_> = logs.iter().filter(|l| l.action == USER_REGISTERED).collect();
    assert_eq!(registered.len(), 2);
    assert!(registered.iter().all(|l| l.group_id.is_none()));

    let created = logs.iter().find(|l| l.action == GROUP_CREATED).unwrap();
    assert_eq!(created.group_id.as_deref(), Some(group.id.as_str()));
    assert_eq!(created.user_id.as_deref(), Some(alice.id.as_str()));
}
