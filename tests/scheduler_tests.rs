use std::sync::Arc;

use stagehand::scheduler::{JobMetadata, JobRecord, JobRegistry, JobStatus};
use uuid::Uuid;

#[test]
fn test_job_record_defaults() {
    let runner_id = Uuid::new_v4();
    let job = JobRecord::new(Some(runner_id));

    assert_eq!(job.status, JobStatus::Scheduled);
    assert_eq!(job.runner_id, Some(runner_id));
    assert!(job.output.is_empty());
    assert!(job.finished_at.is_none());
}

#[test]
fn test_job_ids_are_unique() {
    let a = JobRecord::new(None);
    let b = JobRecord::new(None);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_status_display() {
    assert_eq!(JobStatus::Scheduled.to_string(), "scheduled");
    assert_eq!(JobStatus::Running.to_string(), "running");
    assert_eq!(JobStatus::Successful.to_string(), "successful");
    assert_eq!(JobStatus::Failed.to_string(), "failed");
    assert_eq!(JobStatus::Canceled.to_string(), "canceled");
}

#[test]
fn test_status_parse_round_trip() {
    for status in [
        JobStatus::Scheduled,
        JobStatus::Running,
        JobStatus::Successful,
        JobStatus::Failed,
        JobStatus::Canceled,
    ] {
        let parsed: JobStatus = status.to_string().parse().unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_status_parse_rejects_unknown() {
    assert!("starting".parse::<JobStatus>().is_err());
    assert!("".parse::<JobStatus>().is_err());
    assert!("SUCCESSFUL".parse::<JobStatus>().is_err());
}

#[test]
fn test_status_terminality() {
    assert!(!JobStatus::Scheduled.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
    assert!(JobStatus::Successful.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
    assert!(JobStatus::Canceled.is_terminal());
}

#[test]
fn test_metadata_mirrors_record() {
    let mut job = JobRecord::new(Some(Uuid::new_v4()));
    job.status = JobStatus::Running;

    let meta = JobMetadata::from(&job);
    assert_eq!(meta.id, job.id);
    assert_eq!(meta.runner_id, job.runner_id);
    assert_eq!(meta.status, JobStatus::Running);
    assert_eq!(meta.created_at, job.created_at);
}

#[tokio::test]
async fn test_registry_insert_and_get() {
    let registry = JobRegistry::new();
    let job = JobRecord::new(None);
    let id = job.id;

    registry.insert(job).await;

    let shared = registry.get(&id).await.expect("job should be present");
    assert_eq!(shared.read().await.status, JobStatus::Scheduled);
    assert_eq!(registry.len().await, 1);
    assert!(registry.contains(&id).await);
}

#[tokio::test]
async fn test_registry_unknown_id_is_absent() {
    let registry = JobRegistry::new();
    assert!(registry.get(&Uuid::new_v4()).await.is_none());
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_registry_mutation_visible_through_all_handles() {
    let registry = JobRegistry::new();
    let job = JobRecord::new(None);
    let id = job.id;

    let writer = registry.insert(job).await;
    {
        let mut job = writer.write().await;
        job.status = JobStatus::Running;
    }

    let reader = registry.get(&id).await.unwrap();
    assert_eq!(reader.read().await.status, JobStatus::Running);
}

#[tokio::test]
async fn test_registry_concurrent_inserts() {
    let registry = Arc::new(JobRegistry::new());

    let mut handles = Vec::new();
    for _ in 0..100 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            registry.insert(JobRecord::new(None)).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(registry.len().await, 100);
    assert_eq!(registry.ids().await.len(), 100);
}
