//! Identity store behavior against the real filesystem.

use std::path::Path;
use std::sync::Arc;

use agentid::{IdentityError, IdentityStore, Phase, ServiceContext, StoreConfig};
use tokio::sync::Barrier;

const HOST: &str = "11111111-1111-1111-1111-111111111111";

fn record_path(root: &Path, agent: &str) -> std::path::PathBuf {
    root.join(HOST).join("agents").join(agent).join("instance_uuid")
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn first_call_writes_record_and_second_reads_it() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");
    let ctx = ServiceContext::live();
    let config = StoreConfig::new(&root);
    let store = IdentityStore::new(&ctx, &config);

    let first = store.get_or_create_instance_id(HOST, "metrics-agent").await.unwrap();
    let record = record_path(&root, "metrics-agent");
    let written = std::fs::read_to_string(&record).unwrap();
    let modified = std::fs::metadata(&record).unwrap().modified().unwrap();

    let second = store.get_or_create_instance_id(HOST, "metrics-agent").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(written, format!("{first}\n"));
    assert_eq!(std::fs::read_to_string(&record).unwrap(), written);
    assert_eq!(std::fs::metadata(&record).unwrap().modified().unwrap(), modified);
    assert!(uuid::Uuid::parse_str(first.as_str()).is_ok());
}

#[tokio::test]
async fn agents_on_one_host_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let store = IdentityStore::new(&ctx, &config);

    let a = store.get_or_create_instance_id(HOST, "agent-a").await.unwrap();
    let b = store.get_or_create_instance_id(HOST, "agent-b").await.unwrap();

    assert_ne!(a, b);
    assert_eq!(entries(&dir.path().join(HOST).join("agents")), vec!["agent-a", "agent-b"]);
}

#[tokio::test]
async fn whitespace_in_record_does_not_leak() {
    let dir = tempfile::tempdir().unwrap();
    let record = record_path(dir.path(), "a");
    std::fs::create_dir_all(record.parent().unwrap()).unwrap();
    std::fs::write(&record, "0b7e5e9c-8f55-4c1e-9b51-6f0e3a5d2c11 \n\n").unwrap();

    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let id = IdentityStore::new(&ctx, &config).get_or_create_instance_id(HOST, "a").await.unwrap();

    assert_eq!(id.as_str(), "0b7e5e9c-8f55-4c1e-9b51-6f0e3a5d2c11");
}

#[tokio::test]
async fn invalid_input_leaves_root_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let store = IdentityStore::new(&ctx, &config);

    let err = store.get_or_create_instance_id("", "a").await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidArgument { field: "host id", .. }));
    let err = store.get_or_create_instance_id(HOST, "").await.unwrap_err();
    assert!(matches!(err, IdentityError::InvalidArgument { field: "agent name", .. }));

    assert!(entries(dir.path()).is_empty());
}

#[tokio::test]
async fn interrupted_run_is_completed_by_the_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let agent_dir = dir.path().join(HOST).join("agents").join("a");
    std::fs::create_dir_all(&agent_dir).unwrap();
    // A staged copy left behind by a process killed before linking it.
    std::fs::write(agent_dir.join(".instance_uuid.deadbeef.tmp"), "lost-id\n").unwrap();

    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let id = IdentityStore::new(&ctx, &config).get_or_create_instance_id(HOST, "a").await.unwrap();

    assert_ne!(id.as_str(), "lost-id");
    assert_eq!(std::fs::read_to_string(agent_dir.join("instance_uuid")).unwrap(), format!("{id}\n"));
    assert_eq!(entries(&dir.path().join(HOST).join("agents")), vec!["a"]);
    assert_eq!(
        entries(&agent_dir).iter().filter(|n| n.as_str() == "instance_uuid").count(),
        1
    );
}

#[tokio::test]
async fn file_in_place_of_host_dir_is_a_provisioning_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(HOST), "not a directory").unwrap();

    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let err = IdentityStore::new(&ctx, &config)
        .get_or_create_instance_id(HOST, "a")
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Some(Phase::ProvisionDirectory));
    assert!(err.to_string().starts_with("directory provisioning failed"));
}

#[tokio::test]
async fn file_in_place_of_agent_dir_is_a_provisioning_error() {
    let dir = tempfile::tempdir().unwrap();
    let agents = dir.path().join(HOST).join("agents");
    std::fs::create_dir_all(&agents).unwrap();
    std::fs::write(agents.join("a"), "not a directory").unwrap();

    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let err = IdentityStore::new(&ctx, &config)
        .get_or_create_instance_id(HOST, "a")
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Some(Phase::ProvisionDirectory));
    assert!(err.to_string().contains("Not a directory"));
}

#[tokio::test]
async fn unreadable_record_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(record_path(dir.path(), "a")).unwrap();

    let ctx = ServiceContext::live();
    let config = StoreConfig::new(dir.path());
    let err = IdentityStore::new(&ctx, &config)
        .get_or_create_instance_id(HOST, "a")
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Some(Phase::ReadRecord));
    assert!(err.to_string().contains("record read failed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_use_converges_on_one_id() {
    const CALLERS: usize = 16;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let barrier = Arc::new(Barrier::new(CALLERS));

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let root = root.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                // Separate contexts, as separate processes would have.
                let ctx = ServiceContext::live();
                let config = StoreConfig::new(root);
                barrier.wait().await;
                IdentityStore::new(&ctx, &config).get_or_create_instance_id(HOST, "a").await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }

    assert!(ids.windows(2).all(|w| w[0] == w[1]), "callers disagreed: {ids:?}");
    let record = record_path(&root, "a");
    assert_eq!(std::fs::read_to_string(record).unwrap(), format!("{}\n", ids[0]));
    assert_eq!(entries(&root.join(HOST).join("agents").join("a")), vec!["instance_uuid"]);
}
