//! Tests for JsonFileStore
//!
//! Every test works inside its own temporary directory.

use shared::{ParticipantId, ProjectId};
use tokio::fs;

use super::common::{sample_draft, sample_submission, test_roster};
use crate::core::{FinalAllocation, SubmissionState};
use crate::error::EquityError;
use crate::services::JsonFileStore;
use crate::traits::DocumentStore;

fn setup_store() -> (tempfile::TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = JsonFileStore::with_base_dir(dir.path().to_path_buf());
    (dir, store)
}

#[tokio::test]
async fn test_draft_round_trip() {
    let (_dir, store) = setup_store();
    let project = ProjectId::new();
    let draft = sample_draft("uid-ada");

    store.save_draft(&project, &draft).await.unwrap();
    let loaded = store
        .load_draft(&project, &draft.owner_id)
        .await
        .unwrap()
        .expect("draft should exist");

    assert_eq!(loaded, draft);
    assert_eq!(loaded.sheet(&test_roster()), draft.sheet(&test_roster()));
}

#[tokio::test]
async fn test_layout_on_disk() {
    let (dir, store) = setup_store();
    let project = ProjectId::new();

    store.save_submission(&project, &sample_submission("uid-bo")).await.unwrap();
    store
        .save_state(&project, &ParticipantId::new("uid-bo"), SubmissionState::Submitted)
        .await
        .unwrap();
    store.save_allocation(&project, &FinalAllocation::new()).await.unwrap();

    let project_dir = dir.path().join(project.to_string());
    assert!(project_dir.join("submissions").join("uid-bo.json").exists());
    assert!(project_dir.join("state").join("uid-bo.json").exists());
    assert!(project_dir.join("allocation.json").exists());
    // no temp files left behind
    assert!(!project_dir.join("allocation.json.tmp").exists());

    let raw = fs::read_to_string(project_dir.join("submissions").join("uid-bo.json"))
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["ownerId"], "uid-bo");
    assert!(json["data"]["row_0"]["col_0"].is_object());
}

#[tokio::test]
async fn test_state_and_allocation_defaults() {
    let (_dir, store) = setup_store();
    let project = ProjectId::new();
    let owner = ParticipantId::new("uid-ada");

    assert_eq!(store.load_state(&project, &owner).await.unwrap(), SubmissionState::Editing);
    assert_eq!(store.load_allocation(&project).await.unwrap(), FinalAllocation::new());

    store.save_state(&project, &owner, SubmissionState::Submitted).await.unwrap();
    assert_eq!(store.load_state(&project, &owner).await.unwrap(), SubmissionState::Submitted);
}

#[tokio::test]
async fn test_allocation_write_is_a_single_document() {
    let (_dir, store) = setup_store();
    let project = ProjectId::new();
    let roster = test_roster();

    let mut allocation = FinalAllocation::new();
    allocation.set_percentage(&roster[0].id, Some(50.0)).unwrap();
    allocation.set_percentage(&roster[1].id, Some(50.0)).unwrap();
    allocation.acknowledge(&roster[0].id, &roster[0].id, true, &roster).unwrap();
    store.save_allocation(&project, &allocation).await.unwrap();

    allocation.set_percentage(&roster[0].id, Some(45.0)).unwrap();
    store.save_allocation(&project, &allocation).await.unwrap();

    let loaded = store.load_allocation(&project).await.unwrap();
    assert_eq!(loaded.percentage(&roster[0].id), Some(45.0));
    assert!(loaded.acknowledgments().is_empty());
}

#[tokio::test]
async fn test_corrupt_document_is_a_persistence_error() {
    let (dir, store) = setup_store();
    let project = ProjectId::new();
    let path = dir.path().join(project.to_string()).join("allocation.json");
    fs::create_dir_all(path.parent().unwrap()).await.unwrap();
    fs::write(&path, b"{ not json").await.unwrap();

    let err = store.load_allocation(&project).await.unwrap_err();
    assert!(matches!(err, EquityError::Persistence { .. }));
    assert!(err.is_retryable());
}
