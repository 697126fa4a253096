use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use employee_directory::db::{seed, EmployeeStore, MemoryStore, SeedOutcome, SqliteStore};
use employee_directory::errors::StoreError;
use employee_directory::models::employee::{EmployeeUpdate, Gender, NewEmployee};

fn new_employee(name: &str) -> NewEmployee {
    NewEmployee {
        full_name: name.to_string(),
        gender: Gender::Other,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
        profile_image: "https://example.com/avatar.svg".to_string(),
        state: "Delhi".to_string(),
        is_active: true,
    }
}

async fn stores() -> Vec<(&'static str, Box<dyn EmployeeStore>)> {
    vec![
        ("memory", Box::new(MemoryStore::new()) as Box<dyn EmployeeStore>),
        ("sqlite", Box::new(SqliteStore::connect("sqlite::memory:", 1).await.unwrap()) as Box<dyn EmployeeStore>),
    ]
}

#[tokio::test]
async fn ids_are_distinct_and_codes_sequential() {
    for (kind, store) in stores().await {
        let mut ids = HashSet::new();
        for n in 1..=12u32 {
            let created = store.create(new_employee(&format!("E{n}"))).await.unwrap();
            assert!(ids.insert(created.id), "{kind}: duplicate id");
            assert_eq!(created.employee_id, Some(format!("EMP{:03}", n)), "{kind}");
        }
    }
}

#[tokio::test]
async fn codes_are_never_reused_after_delete() {
    for (kind, store) in stores().await {
        store.create(new_employee("A")).await.unwrap();
        let newest = store.create(new_employee("B")).await.unwrap();
        store.delete(newest.id).await.unwrap();

        let next = store.create(new_employee("C")).await.unwrap();
        assert_eq!(next.employee_id.as_deref(), Some("EMP003"), "{kind}");
    }
}

#[tokio::test]
async fn get_returns_what_create_stored() {
    for (kind, store) in stores().await {
        let created = store.create(new_employee("Round Trip")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.id, created.id, "{kind}");
        assert_eq!(fetched.employee_id, created.employee_id, "{kind}");
        assert_eq!(fetched.full_name, created.full_name, "{kind}");
        assert_eq!(fetched.gender, created.gender, "{kind}");
        assert_eq!(fetched.date_of_birth, created.date_of_birth, "{kind}");
        assert_eq!(fetched.profile_image, created.profile_image, "{kind}");
        assert_eq!(fetched.state, created.state, "{kind}");
        assert_eq!(fetched.is_active, created.is_active, "{kind}");
    }
}

#[tokio::test]
async fn update_merges_only_given_fields() {
    for (kind, store) in stores().await {
        let created = store.create(new_employee("Before")).await.unwrap();
        let update = EmployeeUpdate {
            full_name: Some("After".to_string()),
            ..Default::default()
        };
        store.update(created.id, update).await.unwrap();

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.full_name, "After", "{kind}");
        assert_eq!(fetched.state, created.state, "{kind}");
        assert_eq!(fetched.gender, created.gender, "{kind}");
        assert_eq!(fetched.date_of_birth, created.date_of_birth, "{kind}");
        assert_eq!(fetched.is_active, created.is_active, "{kind}");
        assert_eq!(fetched.employee_id, created.employee_id, "{kind}");
    }
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    for (kind, store) in stores().await {
        let created = store.create(new_employee("Gone")).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(matches!(store.get(created.id).await, Err(StoreError::NotFound)), "{kind}");
        assert!(store.list().await.unwrap().is_empty(), "{kind}");
    }
}

#[tokio::test]
async fn toggling_twice_restores_status() {
    for (kind, store) in stores().await {
        let created = store.create(new_employee("Flip")).await.unwrap();
        let once = store.toggle_status(created.id).await.unwrap();
        assert_eq!(once.is_active, !created.is_active, "{kind}");
        let twice = store.toggle_status(created.id).await.unwrap();
        assert_eq!(twice.is_active, created.is_active, "{kind}");
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    for (kind, store) in stores().await {
        let missing = Uuid::new_v4();
        assert!(matches!(store.get(missing).await, Err(StoreError::NotFound)), "{kind}");
        assert!(matches!(store.delete(missing).await, Err(StoreError::NotFound)), "{kind}");
        assert!(matches!(store.toggle_status(missing).await, Err(StoreError::NotFound)), "{kind}");
        assert!(
            matches!(store.update(missing, EmployeeUpdate::default()).await, Err(StoreError::NotFound)),
            "{kind}"
        );
    }
}

#[tokio::test]
async fn seed_fills_an_empty_store_once() {
    for (kind, store) in stores().await {
        assert_eq!(store.seed().await.unwrap(), SeedOutcome::Seeded(5), "{kind}");

        let seeded = store.list().await.unwrap();
        let mut names: Vec<String> = seeded.iter().map(|e| e.full_name.clone()).collect();
        names.sort();
        let mut expected: Vec<String> = seed::sample_employees().into_iter().map(|e| e.full_name).collect();
        expected.sort();
        assert_eq!(names, expected, "{kind}");

        let mut codes: Vec<String> = seeded.iter().filter_map(|e| e.employee_id.clone()).collect();
        codes.sort();
        assert_eq!(codes, ["EMP001", "EMP002", "EMP003", "EMP004", "EMP005"], "{kind}");

        let outcome = store.seed().await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadyPopulated, "{kind}");
        assert_eq!(outcome.message(), "Database already has data");
        assert_eq!(store.list().await.unwrap().len(), 5, "{kind}");
    }
}

#[tokio::test]
async fn seed_skips_a_store_with_any_record() {
    for (kind, store) in stores().await {
        store.create(new_employee("Only")).await.unwrap();
        assert_eq!(store.seed().await.unwrap(), SeedOutcome::AlreadyPopulated, "{kind}");
        assert_eq!(store.list().await.unwrap().len(), 1, "{kind}");
    }
}

#[tokio::test]
async fn sqlite_data_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("employees.db").display());

    let created = {
        let store = SqliteStore::connect(&url, 2).await.unwrap();
        let created = store.create(new_employee("Durable")).await.unwrap();
        store.pool().close().await;
        created
    };

    let store = SqliteStore::connect(&url, 2).await.unwrap();
    let fetched = store.get(created.id).await.unwrap();
    assert_eq!(fetched.full_name, "Durable");

    let next = store.create(new_employee("Second")).await.unwrap();
    assert_eq!(next.employee_id.as_deref(), Some("EMP002"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sqlite_concurrent_writers_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("employees.db").display());
    let store = SqliteStore::connect(&url, 5).await.unwrap();

    let creates: Vec<_> = (0..40)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move { store.create(new_employee(&format!("C{n}"))).await })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in creates {
        let created = handle.await.unwrap().unwrap();
        assert!(codes.insert(created.employee_id.unwrap()), "duplicate code");
    }
    let expected: HashSet<String> = (1..=40).map(|n| format!("EMP{:03}", n)).collect();
    assert_eq!(codes, expected);

    let target = store.create(new_employee("Toggled")).await.unwrap().id;
    let toggles: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.toggle_status(target).await })
        })
        .collect();
    for handle in toggles {
        handle.await.unwrap().unwrap();
    }
    assert!(store.get(target).await.unwrap().is_active);

    let updates: Vec<_> = (0..10)
        .map(|n| {
            let store = store.clone();
            let update = EmployeeUpdate {
                state: Some(format!("S{n}")),
                ..Default::default()
            };
            tokio::spawn(async move { store.update(target, update).await })
        })
        .collect();
    for handle in updates {
        assert_eq!(handle.await.unwrap().unwrap().full_name, "Toggled");
    }
    assert_eq!(store.list().await.unwrap().len(), 41);
}
