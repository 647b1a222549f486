use serde_json::json;
use skills_core::model::{ProgressMap, Roadmap, SkillName, TopicKey, TopicProgress, TopicStatus};
use skills_core::normalize_value;
use skills_core::time::fixed_now;
use storage::repository::{ProgressRepository, RoadmapRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn skill(name: &str) -> SkillName {
    SkillName::new(name).unwrap()
}

#[tokio::test]
async fn sqlite_roundtrips_topic_progress_with_extra_fields() {
    let repo = connect("memdb_progress_roundtrip").await;
    let progress = normalize_value(&json!({
        "Ownership: moves": {
            "Viewed": true,
            "LastViewed": "2024-01-01T00:00:00.000Z",
            "QuizScore": 70,
            "hintsUsed": 2
        },
        "Borrowing": "completed"
    }));

    repo.save_progress(&skill("Rust"), &progress)
        .await
        .expect("save");
    let loaded = repo.load_progress(&skill("Rust")).await.expect("load");

    assert_eq!(loaded, progress);
    let ownership = loaded.get("Ownership").expect("ownership");
    assert_eq!(ownership.quiz_score(), 70.0);
    assert_eq!(ownership.extra().get("hintsUsed"), Some(&json!(2)));
    assert_eq!(loaded.status_of("Borrowing"), TopicStatus::Completed);
}

#[tokio::test]
async fn sqlite_save_topic_overwrites_single_row_and_scopes_by_skill() {
    let repo = connect("memdb_progress_overwrite").await;
    let key = TopicKey::from_label("Closures");

    let mut progress = TopicProgress::new();
    progress.mark_viewed(fixed_now());
    repo.save_topic(&skill("Rust"), &key, &progress)
        .await
        .expect("save viewed");

    progress.mark_completed(fixed_now());
    repo.save_topic(&skill("Rust"), &key, &progress)
        .await
        .expect("save completed");

    let rust = repo.load_progress(&skill("Rust")).await.expect("load rust");
    assert_eq!(rust.len(), 1);
    assert_eq!(rust.status_of("Closures"), TopicStatus::Completed);

    let python = repo.load_progress(&skill("Python")).await.expect("load python");
    assert_eq!(python, ProgressMap::new());
}

#[tokio::test]
async fn sqlite_roadmap_cache_replaces_previous_roadmap() {
    let repo = connect("memdb_roadmaps").await;
    let first = Roadmap::from_labels(["A: intro"]);
    let second = Roadmap::from_labels(["A: intro", "B: basics"]);

    assert!(repo.get_roadmap(&skill("Rust")).await.unwrap().is_none());

    repo.save_roadmap(&skill("Rust"), &first, fixed_now())
        .await
        .expect("save first");
    repo.save_roadmap(&skill("Rust"), &second, fixed_now())
        .await
        .expect("save second");

    let cached = repo
        .get_roadmap(&skill("Rust"))
        .await
        .expect("get")
        .expect("cached roadmap");
    assert_eq!(cached.roadmap, second);
    assert_eq!(cached.generated_at, fixed_now());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate_twice").await;
    repo.migrate().await.expect("second migrate");
}
