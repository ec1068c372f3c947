use rankdash_core::db::open_db_in_memory;
use rankdash_core::{
    Keyword, NewProject, PlanType, ProjectService, RequestContext, ServiceError,
    SqliteProjectRepository, SqliteTrackingRepository, SqliteUserRepository, TrackingRepository,
    User, UserId, UserPatch, UserRepository, UserService,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_user(conn: &Connection, name: Option<&str>) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(
        name.map(str::to_string),
        Some("owner@example.test".to_string()),
    ))
    .unwrap()
}

fn create_project(conn: &Connection, owner: UserId, name: &str, domain: &str) -> Uuid {
    let service = ProjectService::new(SqliteProjectRepository::try_new(conn).unwrap());
    service
        .create_project(
            &RequestContext::authenticated(owner),
            NewProject {
                name: name.to_string(),
                domain: domain.to_string(),
                settings: None,
            },
        )
        .unwrap()
        .id
}

#[test]
fn profile_nests_owned_projects_with_keywords_and_counts() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, Some("Ada"));
    let stranger = seed_user(&conn, None);
    let older = create_project(&conn, owner, "Blog", "https://blog.test");
    let newer = create_project(&conn, owner, "Shop", "https://shop.test");
    create_project(&conn, stranger, "Foreign", "https://foreign.test");

    conn.execute(
        "UPDATE projects SET created_at = 1 WHERE id = ?1;",
        [older.to_string()],
    )
    .unwrap();

    let tracking = SqliteTrackingRepository::try_new(&conn).unwrap();
    tracking
        .add_keyword(&Keyword::new(newer, "shoes", 0).unwrap())
        .unwrap();
    tracking
        .add_keyword(&Keyword::new(newer, "boots", 0).unwrap())
        .unwrap();

    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let profile = service
        .get_profile(&RequestContext::authenticated(owner))
        .unwrap();

    assert_eq!(profile.user.id, owner);
    assert_eq!(profile.user.name.as_deref(), Some("Ada"));
    assert_eq!(profile.user.plan_type, PlanType::Starter);

    let ids: Vec<Uuid> = profile.projects.iter().map(|item| item.project.id).collect();
    assert_eq!(ids, vec![newer, older]);
    assert_eq!(profile.projects[0].keywords.len(), 2);
    assert_eq!(profile.projects[0].counts.keywords, 2);
    assert!(profile.projects[1].keywords.is_empty());
}

#[test]
fn profile_serializes_in_dashboard_wire_shape() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, Some("Ada"));
    create_project(&conn, owner, "Shop", "https://shop.test");

    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let profile = service
        .get_profile(&RequestContext::authenticated(owner))
        .unwrap();
    let value = serde_json::to_value(&profile).unwrap();

    assert_eq!(value["planType"], "STARTER");
    assert_eq!(value["id"], owner.to_string());
    assert_eq!(value["projects"][0]["userId"], owner.to_string());
    assert_eq!(value["projects"][0]["_count"]["keywords"], 0);
    assert!(value["projects"][0]["createdAt"].is_i64());
}

#[test]
fn update_profile_changes_name_and_plan() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, None);
    let ctx = RequestContext::authenticated(owner);
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    let updated = service
        .update_profile(
            &ctx,
            &UserPatch {
                name: Some("Grace".to_string()),
                plan_type: Some(PlanType::Enterprise),
            },
        )
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Grace"));
    assert_eq!(updated.plan_type, PlanType::Enterprise);

    let plan_only = service
        .update_profile(
            &ctx,
            &UserPatch {
                name: None,
                plan_type: Some(PlanType::Professional),
            },
        )
        .unwrap();
    assert_eq!(plan_only.name.as_deref(), Some("Grace"));
    assert_eq!(plan_only.plan_type, PlanType::Professional);
    assert_eq!(plan_only.email.as_deref(), Some("owner@example.test"));
}

#[test]
fn profile_of_missing_user_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let ghost = RequestContext::authenticated(Uuid::new_v4());
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.get_profile(&ghost),
        Err(ServiceError::NotFound("User"))
    ));
    assert!(matches!(
        service.update_profile(&ghost, &UserPatch::default()),
        Err(ServiceError::NotFound("User"))
    ));
}

#[test]
fn profile_procedures_require_session() {
    let conn = open_db_in_memory().unwrap();
    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let anonymous = RequestContext::anonymous();

    assert!(matches!(
        service.get_profile(&anonymous),
        Err(ServiceError::Unauthenticated)
    ));
    assert!(matches!(
        service.update_profile(&anonymous, &UserPatch::default()),
        Err(ServiceError::Unauthenticated)
    ));
}

#[test]
fn invalid_plan_label_does_not_parse() {
    assert_eq!(PlanType::parse("PROFESSIONAL"), Some(PlanType::Professional));
    assert_eq!(PlanType::parse("professional"), None);
    assert!(serde_json::from_str::<PlanType>("\"GOLD\"").is_err());
}
