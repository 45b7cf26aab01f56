use imagehost_core::db::open_db_in_memory;
use imagehost_core::{
    ImageRepository, NewImage, NewTag, NewUser, NewUserProfile, RepoError, SqliteImageRepository,
    SqliteTagRepository, SqliteUserRepository, TagFetch, TagRepository, UserRepository,
};
use rusqlite::Connection;

fn count_rows(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn register_persists_user_and_owned_profile_atomically() {
    let mut conn = open_db_in_memory().unwrap();

    let mut new_user = NewUser::new("karla", "hunter2");
    new_user.profile = NewUserProfile {
        full_name: Some("Karla M".to_string()),
        email_address: Some("karla@example.com".to_string()),
        mobile_number: None,
    };

    let user_id = {
        let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();
        let user_id = repo.register_user(&new_user).unwrap();

        let loaded = repo.get_user(user_id).unwrap();
        assert_eq!(loaded.id, user_id);
        assert_eq!(loaded.username, "karla");
        assert_eq!(loaded.profile.full_name.as_deref(), Some("Karla M"));
        assert_eq!(
            loaded.profile.email_address.as_deref(),
            Some("karla@example.com")
        );
        assert_eq!(loaded.profile.mobile_number, None);
        user_id
    };

    assert!(user_id > 0);
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM user_profile;"), 1);
}

#[test]
fn check_user_matches_credentials_and_reports_absence() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    repo.register_user(&NewUser::new("luis", "open-sesame"))
        .unwrap();

    let matched = repo.check_user("luis", "open-sesame").unwrap().unwrap();
    assert_eq!(matched.username, "luis");

    assert!(repo.check_user("luis", "wrong").unwrap().is_none());
    assert!(repo.check_user("nobody", "open-sesame").unwrap().is_none());
}

#[test]
fn get_unknown_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.get_user(9000).unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(9000)));
}

#[test]
fn delete_user_cascades_to_images_and_profile_but_keeps_tags() {
    let mut conn = open_db_in_memory().unwrap();

    let user_id = {
        let mut users = SqliteUserRepository::try_new(&mut conn).unwrap();
        users.register_user(&NewUser::new("mara", "pw")).unwrap()
    };
    let keeper_id = {
        let mut users = SqliteUserRepository::try_new(&mut conn).unwrap();
        users.register_user(&NewUser::new("nils", "pw")).unwrap()
    };
    let shared_tag = {
        let mut tags = SqliteTagRepository::try_new(&mut conn).unwrap();
        tags.create_tag(&NewTag::new("shared")).unwrap()
    };

    let (doomed_image, kept_image) = {
        let mut images = SqliteImageRepository::try_new(&mut conn).unwrap();

        let mut doomed = NewImage::new("doomed", "ZG9vbWVk", user_id);
        doomed.tag_ids = vec![shared_tag];
        let doomed_image = images.upload_image(&doomed).unwrap();

        let mut kept = NewImage::new("kept", "a2VwdA", keeper_id);
        kept.tag_ids = vec![shared_tag];
        let kept_image = images.upload_image(&kept).unwrap();

        (doomed_image, kept_image)
    };

    {
        let mut users = SqliteUserRepository::try_new(&mut conn).unwrap();
        users.delete_user(user_id).unwrap();

        let err = users.get_user(user_id).unwrap_err();
        assert!(matches!(err, RepoError::UserNotFound(id) if id == user_id));
    }

    // The deleted user's image and profile are gone, the other user's
    // image and the tag rows survive.
    {
        let mut images = SqliteImageRepository::try_new(&mut conn).unwrap();
        let err = images.get_image(doomed_image, TagFetch::Skip).unwrap_err();
        assert!(matches!(err, RepoError::ImageNotFound(id) if id == doomed_image));

        let survivor = images.get_image(kept_image, TagFetch::Load).unwrap();
        assert_eq!(survivor.tag_names().unwrap(), vec!["shared"]);
    }

    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM user_profile;"), 1);
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM tags;"), 1);
    assert_eq!(
        count_rows(
            &conn,
            &format!("SELECT COUNT(*) FROM images_tags WHERE image_id = {doomed_image};")
        ),
        0
    );
}

#[test]
fn delete_unknown_user_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteUserRepository::try_new(&mut conn).unwrap();

    let err = repo.delete_user(123).unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(123)));
}
