use std::path::PathBuf;

use studio::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::Validation("blank title".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::TaskNotFound("task-1".to_string());
    assert_eq!(missing.exit_code(), exit_codes::NOT_FOUND);

    let op = Error::LockFailed(PathBuf::from(".studio/board.lock"));
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::TaskNotFound("task-1".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::NOT_FOUND);
    assert!(json.error.contains("Task not found"));
    assert_eq!(
        json.details.and_then(|value| value["task_id"].as_str().map(str::to_string)),
        Some("task-1".to_string())
    );
}
