use studiobook_app_lib::db::DbPool;
use studiobook_app_lib::models::client::ClientCreateInput;
use studiobook_app_lib::services::backup_service::BackupService;
use studiobook_app_lib::services::client_service::ClientService;
use tempfile::tempdir;

#[test]
fn backup_then_restore_rolls_the_store_back() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("studio.sqlite")).expect("db pool");
    let clients = ClientService::new(pool.clone());
    let backup = BackupService::new(pool);

    let kept = clients
        .create(ClientCreateInput {
            name: "Mara Lindt".into(),
            ..Default::default()
        })
        .expect("client before backup");

    let backup_path = dir.path().join("backups").join("studio-backup.sqlite");
    let summary = backup
        .backup_to(&backup_path.display().to_string())
        .expect("backup");
    assert!(summary.size_bytes > 0);
    assert!(backup_path.is_file());

    let dropped = clients
        .create(ClientCreateInput {
            name: "Jonas Weber".into(),
            ..Default::default()
        })
        .expect("client after backup");

    backup
        .restore_from(&backup_path.display().to_string())
        .expect("restore");

    // The pre-backup record survives, the later one is gone.
    assert!(clients.get(&kept.id).is_ok());
    assert!(clients.get(&dropped.id).is_err());
}

#[test]
fn restore_from_missing_file_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("studio.sqlite")).expect("db pool");
    let backup = BackupService::new(pool);

    let missing = dir.path().join("nothing-here.sqlite");
    assert!(backup
        .restore_from(&missing.display().to_string())
        .is_err());
}

#[test]
fn backup_creates_missing_parent_directories() {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("studio.sqlite")).expect("db pool");
    let backup = BackupService::new(pool);

    let nested = dir.path().join("a").join("b").join("backup.sqlite");
    backup
        .backup_to(&nested.display().to_string())
        .expect("backup into nested dir");
    assert!(nested.is_file());
}
