use rust_decimal::Decimal;
use serde_json::json;
use tempfile::TempDir;
use vacancy_aggregator::error::Error;
use vacancy_aggregator::models::stats::RemoveOutcome;
use vacancy_aggregator::models::vacancy::Vacancy;
use vacancy_aggregator::storage::{Storage, StorageKind, VacancyStorage};

const FILE_KINDS: [StorageKind; 4] = [
    StorageKind::Json,
    StorageKind::Csv,
    StorageKind::Excel,
    StorageKind::Text,
];

fn sample() -> Vec<Vacancy> {
    vec![
        Vacancy::from_value(json!({
            "id": 1,
            "title": "Rust developer",
            "company": "Acme",
            "description": "Async services on tokio",
            "salary_from": 200000,
            "salary_to": 300000,
            "currency": "RUR",
            "area": "Moscow",
            "url": "https://hh.ru/vacancy/1",
        }))
        .unwrap(),
        Vacancy::from_value(json!({
            "id": 2,
            "title": "Python developer",
            "company": "Initech",
            "description": "Django and some Rust tooling",
            "salary_from": 150000,
            "currency": "RUR",
            "area": "Kazan",
        }))
        .unwrap(),
        Vacancy::from_value(json!({
            "id": 3,
            "title": "QA engineer",
            "company": "Acme",
        }))
        .unwrap(),
    ]
}

fn open(dir: &TempDir, kind: StorageKind) -> Storage {
    let path = kind.default_path(dir.path()).unwrap();
    Storage::file(kind, path).unwrap()
}

fn assert_same_records(left: &[Vacancy], right: &[Vacancy]) {
    assert_eq!(left.len(), right.len());
    for (a, b) in left.iter().zip(right) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.title, b.title);
        assert_eq!(a.company, b.company);
        assert_eq!(a.description, b.description);
        assert_eq!(a.salary_from, b.salary_from);
        assert_eq!(a.salary_to, b.salary_to);
        assert_eq!(a.currency, b.currency);
        assert_eq!(a.area, b.area);
        assert_eq!(a.url, b.url);
    }
}

#[tokio::test]
async fn save_then_load_keeps_every_field() {
    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir, kind);
        storage.replace(sample());
        storage.save().await.unwrap();

        let mut reopened = open(&dir, kind);
        reopened.load().await.unwrap();
        assert_same_records(reopened.vacancies(), &sample());
    }
}

#[tokio::test]
async fn save_then_load_keeps_empty_text() {
    let blank = || {
        vec![Vacancy::from_value(json!({
            "id": 4,
            "title": "",
            "company": "Acme",
            "description": "",
            "salary_from": 90000,
        }))
        .unwrap()]
    };

    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir, kind);
        storage.replace(blank());
        storage.save().await.unwrap();

        let mut reopened = open(&dir, kind);
        reopened.load().await.unwrap();
        assert_same_records(reopened.vacancies(), &blank());
        assert_eq!(reopened.vacancies()[0].title, "", "{}", kind);
        assert_eq!(reopened.vacancies()[0].description, "", "{}", kind);
    }
}

#[tokio::test]
async fn add_to_missing_file_creates_it_with_one_record() {
    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let path = kind.default_path(&dir.path().join("nested")).unwrap();
        let mut storage = Storage::file(kind, &path).unwrap();

        storage.add(sample().remove(0)).await.unwrap();
        assert!(path.exists(), "{} file was not created", kind);

        let mut reopened = Storage::file(kind, &path).unwrap();
        reopened.load().await.unwrap();
        assert_eq!(reopened.vacancies().len(), 1, "{}", kind);
        assert_eq!(reopened.vacancies()[0].id, 1);
    }
}

#[tokio::test]
async fn remove_missing_id_leaves_set_unchanged() {
    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir, kind);
        storage.replace(sample());
        storage.save().await.unwrap();

        assert_eq!(storage.remove(99).await.unwrap(), RemoveOutcome::NotFound);
        assert_eq!(storage.vacancies().len(), 3);

        assert_eq!(storage.remove(2).await.unwrap(), RemoveOutcome::Removed);
        let mut reopened = open(&dir, kind);
        reopened.load().await.unwrap();
        let ids: Vec<i64> = reopened.vacancies().iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

#[tokio::test]
async fn remove_drops_every_record_with_the_id() {
    let dir = TempDir::new().unwrap();
    let mut storage = open(&dir, StorageKind::Json);
    let mut records = sample();
    records.push(records[0].clone());
    storage.replace(records);
    storage.save().await.unwrap();

    assert_eq!(storage.remove(1).await.unwrap(), RemoveOutcome::Removed);
    assert_eq!(storage.vacancies().len(), 2);
}

#[tokio::test]
async fn search_is_case_sensitive_over_title_and_description() {
    let dir = TempDir::new().unwrap();
    let mut storage = open(&dir, StorageKind::Csv);
    storage.replace(sample());
    storage.save().await.unwrap();

    let found = storage.search("Python").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);

    let found = storage.search("Rust").await.unwrap();
    let ids: Vec<i64> = found.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let found = storage.search("Django").await.unwrap();
    let ids: Vec<i64> = found.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![2]);

    assert!(storage.search("rust developer").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_and_empty_files_load_empty() {
    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir, kind);
        storage.load().await.unwrap();
        assert!(storage.vacancies().is_empty());

        let path = kind.default_path(dir.path()).unwrap();
        std::fs::write(&path, "  \n").unwrap();
        storage.load().await.unwrap();
        assert!(storage.vacancies().is_empty());
    }
}

#[tokio::test]
async fn corrupt_json_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = StorageKind::Json.default_path(dir.path()).unwrap();
    std::fs::write(&path, "{ this is not json").unwrap();

    let mut storage = Storage::file(StorageKind::Json, &path).unwrap();
    storage.load().await.unwrap();
    assert!(storage.vacancies().is_empty());
}

#[tokio::test]
async fn record_with_string_id_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = StorageKind::Json.default_path(dir.path()).unwrap();
    std::fs::write(&path, r#"[{"id": "12", "title": "Tester"}]"#).unwrap();

    let mut storage = Storage::file(StorageKind::Json, &path).unwrap();
    let result = storage.load().await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn sentinels_survive_a_round_trip() {
    for kind in FILE_KINDS {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir, kind);
        storage
            .add(Vacancy::from_value(json!({ "id": 10 })).unwrap())
            .await
            .unwrap();

        let mut reopened = open(&dir, kind);
        reopened.load().await.unwrap();
        let vacancy = &reopened.vacancies()[0];
        assert_eq!(vacancy.title, "no data", "{}", kind);
        assert_eq!(vacancy.salary_from, Decimal::ZERO, "{}", kind);
        assert_eq!(vacancy.salary_to, Decimal::ZERO, "{}", kind);
    }
}
