use imagehost_core::db::open_db_in_memory;
use imagehost_core::{NewTag, RepoError, SqliteTagRepository, TagRepository};

#[test]
fn create_then_find_returns_name_and_generated_id() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();

    let tag_id = repo.create_tag(&NewTag::new("wildlife")).unwrap();
    assert!(tag_id > 0);

    let found = repo.find_tag("wildlife").unwrap().unwrap();
    assert_eq!(found.id, tag_id);
    assert_eq!(found.name, "wildlife");
}

#[test]
fn find_missing_tag_reports_absence_not_a_fault() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();

    assert!(repo.find_tag("nonexistent").unwrap().is_none());
}

#[test]
fn ids_are_assigned_in_store_order_and_not_reused() {
    let mut conn = open_db_in_memory().unwrap();

    let (first, second) = {
        let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();
        let first = repo.create_tag(&NewTag::new("alpha")).unwrap();
        let second = repo.create_tag(&NewTag::new("beta")).unwrap();
        (first, second)
    };
    assert!(second > first);

    conn.execute("DELETE FROM tags WHERE id = ?1;", [second])
        .unwrap();

    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let third = repo.create_tag(&NewTag::new("gamma")).unwrap();
    assert!(third > second, "a deleted id must never be handed out again");
}

#[test]
fn duplicate_names_yield_a_deterministic_ambiguity_fault() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();

    repo.create_tag(&NewTag::new("dup")).unwrap();
    repo.create_tag(&NewTag::new("dup")).unwrap();

    let err = repo.find_tag("dup").unwrap_err();
    assert!(matches!(err, RepoError::AmbiguousTagName(name) if name == "dup"));
}

#[test]
fn lookup_is_exact_match_only() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();

    repo.create_tag(&NewTag::new("landscape")).unwrap();

    assert!(repo.find_tag("Landscape").unwrap().is_none());
    assert!(repo.find_tag("land").unwrap().is_none());
}
