use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jobdag::config::ConfigFile;
use jobdag::dag::{CycleDetected, PetgraphSort, TopologicalSort};
use jobdag::errors::{ErrorKind, JobError};
use jobdag::job::StructuralValidator;
use jobdag::service::JobService;
use jobdag::store::RecordStore;
use jobdag::types::{TaskList, TaskName};
use jobdag_test_utils::builders::read_drop_write;
use jobdag_test_utils::{init_tracing, with_timeout};
use tempfile::tempdir;

fn service_in(dir: &std::path::Path, timeout: Duration) -> JobService {
    service_with_sorter(dir, timeout, Arc::new(PetgraphSort))
}

fn service_with_sorter(
    dir: &std::path::Path,
    timeout: Duration,
    sorter: Arc<dyn TopologicalSort>,
) -> JobService {
    let store = RecordStore::open(
        dir.join("job.json"),
        dir.join("data"),
        Box::new(StructuralValidator),
    )
    .unwrap();
    JobService::new(Arc::new(store), sorter, timeout)
}

/// Sort that reports when a run reaches it, then blocks until released.
struct GatedSort {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl TopologicalSort for GatedSort {
    fn order(&self, graph: &TaskList) -> Result<Vec<TaskName>, CycleDetected> {
        let _ = self.entered.lock().unwrap().send(());
        let _ = self.release.lock().unwrap().recv();
        PetgraphSort.order(graph)
    }
}

#[tokio::test]
async fn test_service_create_read_update_delete() {
    init_tracing();
    with_timeout(async {
        let dir = tempdir().unwrap();
        let service = service_in(dir.path(), Duration::from_secs(5));

        let body = read_drop_write("in.csv", "x", "out.csv");
        let job_id = service.create(body.clone()).await.unwrap();
        assert_eq!(service.read(job_id).await.unwrap().body, body);

        let replacement = read_drop_write("other.csv", "y", "other_out.csv");
        assert!(service.update(job_id, replacement.clone()).await.unwrap());
        assert_eq!(service.read(job_id).await.unwrap().body, replacement);
        assert_eq!(service.list().await.unwrap().len(), 1);

        assert!(service.delete(job_id).await.unwrap());
        assert!(!service.delete(job_id).await.unwrap());
        assert!(matches!(
            service.read(job_id).await,
            Err(JobError::NotFound(_))
        ));
    })
    .await;
}

#[tokio::test]
async fn test_service_runs_stored_job() {
    with_timeout(async {
        let dir = tempdir().unwrap();
        let service = service_in(dir.path(), Duration::from_secs(5));
        std::fs::write(dir.path().join("data/in.csv"), "id,x\n1,a\n").unwrap();

        let job_id = service
            .create(read_drop_write("in.csv", "x", "out.csv"))
            .await
            .unwrap();
        let report = service.run(job_id).await.unwrap();

        assert_eq!(report.job_id, job_id);
        assert_eq!(report.logs.len(), 3);
        let out = std::fs::read_to_string(dir.path().join("data/out.csv")).unwrap();
        assert_eq!(out, "id\n1\n");

        // Running again hits the file written by the first run.
        let err = service.run(job_id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteConflict);
    })
    .await;
}

#[tokio::test]
async fn test_service_run_unknown_job_is_not_found() {
    let dir = tempdir().unwrap();
    let service = service_in(dir.path(), Duration::from_secs(5));

    let err = service.run(11).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_service_times_out_while_store_is_held() {
    let dir = tempdir().unwrap();
    let service = service_in(dir.path(), Duration::from_millis(100));
    let holder = Arc::clone(service.store());

    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let blocker = std::thread::spawn(move || {
        holder.exclusive(|_| {
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(500));
        })
    });
    locked_rx.recv().unwrap();

    let err = service.list().await.unwrap_err();
    assert!(matches!(err, JobError::Timeout(d) if d == Duration::from_millis(100)));

    blocker.join().unwrap();
    // Once the holder releases the store, calls go through again.
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_service_from_config_creates_storage() {
    let dir = tempdir().unwrap();
    let mut cfg = ConfigFile::default();
    cfg.storage.database = dir.path().join("db/job.json");
    cfg.storage.data_dir = dir.path().join("tables");

    let service = JobService::from_config(&cfg).unwrap();

    assert!(dir.path().join("db/job.json").exists());
    assert!(dir.path().join("tables").is_dir());
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_abandoned_create_is_never_committed() {
    let dir = tempdir().unwrap();
    let service = service_in(dir.path(), Duration::from_millis(100));
    let holder = Arc::clone(service.store());

    let (locked_tx, locked_rx) = channel();
    let blocker = std::thread::spawn(move || {
        holder.exclusive(|_| {
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(400));
        })
    });
    locked_rx.recv().unwrap();

    let err = service
        .create(read_drop_write("in.csv", "x", "out.csv"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);

    blocker.join().unwrap();
    // Give the abandoned worker time to take the lock and bail out.
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(service.list().await.unwrap().is_empty());
    // The next create gets the first id: nothing was handed out in between.
    let job_id = service
        .create(read_drop_write("in.csv", "x", "out.csv"))
        .await
        .unwrap();
    assert_eq!(job_id, 1);
}

#[tokio::test]
async fn test_abandoned_delete_leaves_record_in_place() {
    let dir = tempdir().unwrap();
    let service = service_in(dir.path(), Duration::from_millis(100));
    let job_id = service
        .create(read_drop_write("in.csv", "x", "out.csv"))
        .await
        .unwrap();
    let holder = Arc::clone(service.store());

    let (locked_tx, locked_rx) = channel();
    let blocker = std::thread::spawn(move || {
        holder.exclusive(|_| {
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(400));
        })
    });
    locked_rx.recv().unwrap();

    assert!(matches!(
        service.delete(job_id).await,
        Err(JobError::Timeout(_))
    ));

    blocker.join().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(service.read(job_id).await.unwrap().job_id, job_id);
}

#[tokio::test]
async fn test_store_calls_wait_for_a_running_job() {
    let dir = tempdir().unwrap();
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let sorter = GatedSort {
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    let service = service_with_sorter(dir.path(), Duration::from_secs(5), Arc::new(sorter));
    std::fs::write(dir.path().join("data/in.csv"), "id,x\n1,a\n").unwrap();

    with_timeout(async {
        let job_id = service
            .create(read_drop_write("in.csv", "x", "out.csv"))
            .await
            .unwrap();

        let runner = service.clone();
        let run = tokio::spawn(async move { runner.run(job_id).await });
        tokio::task::spawn_blocking(move || entered_rx.recv())
            .await
            .unwrap()
            .unwrap();

        // The run holds the store while it is parked inside the sort.
        let creator = service.clone();
        let create = tokio::spawn(async move {
            creator
                .create(read_drop_write("b.csv", "y", "b_out.csv"))
                .await
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!create.is_finished());

        release_tx.send(()).unwrap();
        let report = run.await.unwrap().unwrap();
        assert_eq!(report.job_id, job_id);
        assert_eq!(create.await.unwrap().unwrap(), 2);
    })
    .await;
}
