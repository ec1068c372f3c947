use rankdash_core::db::open_db_in_memory;
use rankdash_core::model::DAY_MS;
use rankdash_core::{
    Keyword, NewProject, ProjectService, Ranking, RequestContext, SqliteProjectRepository,
    SqliteTrackingRepository, SqliteUserRepository, TrackingRepository, User, UserId,
    UserRepository, UserService, UserStats,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seed_user(conn: &Connection) -> UserId {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    repo.create_user(&User::new(None, None)).unwrap()
}

fn create_project(conn: &Connection, owner: UserId, name: &str) -> Uuid {
    let service = ProjectService::new(SqliteProjectRepository::try_new(conn).unwrap());
    service
        .create_project(
            &RequestContext::authenticated(owner),
            NewProject {
                name: name.to_string(),
                domain: format!("https://{}.test", name.to_lowercase()),
                settings: None,
            },
        )
        .unwrap()
        .id
}

fn add_keyword(conn: &Connection, project: Uuid, term: &str) -> Uuid {
    let tracking = SqliteTrackingRepository::try_new(conn).unwrap();
    tracking
        .add_keyword(&Keyword::new(project, term, 0).unwrap())
        .unwrap()
}

fn rank(conn: &Connection, keyword: Uuid, position: i64, date: i64) {
    let tracking = SqliteTrackingRepository::try_new(conn).unwrap();
    tracking
        .record_ranking(&Ranking::new(keyword, position, date).unwrap())
        .unwrap();
}

#[test]
fn new_project_lists_with_zero_counts_then_picks_up_first_ranking() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let ctx = RequestContext::authenticated(owner);
    let project = create_project(&conn, owner, "Shop");
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());

    let listed = service.list_projects(&ctx).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].project.id, project);
    assert_eq!(listed[0].counts.keywords, 0);
    assert_eq!(listed[0].avg_position, 0.0);

    let keyword = add_keyword(&conn, project, "shoes");
    rank(&conn, keyword, 5, 1_000);

    let listed = service.list_projects(&ctx).unwrap();
    assert_eq!(listed[0].counts.keywords, 1);
    assert_eq!(listed[0].avg_position, 5.0);
}

#[test]
fn keywords_without_rankings_keep_zero_sentinel() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    add_keyword(&conn, project, "a");
    add_keyword(&conn, project, "b");

    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let listed = service
        .list_projects(&RequestContext::authenticated(owner))
        .unwrap();
    assert_eq!(listed[0].counts.keywords, 2);
    assert_eq!(listed[0].avg_position, 0.0);
}

#[test]
fn listing_average_uses_only_latest_ranking_per_keyword() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    let first = add_keyword(&conn, project, "first");
    let second = add_keyword(&conn, project, "second");
    add_keyword(&conn, project, "unranked");

    rank(&conn, first, 50, 1_000);
    rank(&conn, first, 4, 3_000);
    rank(&conn, first, 90, 2_000);
    rank(&conn, second, 7, 500);

    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let listed = service
        .list_projects(&RequestContext::authenticated(owner))
        .unwrap();
    let item = &listed[0];

    assert_eq!(item.avg_position, 5.5);
    let first_entry = item
        .keywords
        .iter()
        .find(|entry| entry.keyword.id == first)
        .unwrap();
    assert_eq!(first_entry.rankings.len(), 1);
    assert_eq!(first_entry.rankings[0].position, 4);
}

#[test]
fn same_date_rankings_resolve_to_later_insert() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    let keyword = add_keyword(&conn, project, "shoes");
    rank(&conn, keyword, 9, 1_000);
    rank(&conn, keyword, 3, 1_000);

    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let listed = service
        .list_projects(&RequestContext::authenticated(owner))
        .unwrap();
    assert_eq!(listed[0].avg_position, 3.0);
    assert_eq!(listed[0].keywords[0].rankings[0].position, 3);
}

#[test]
fn listing_average_rounds_to_one_decimal() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    for (term, position) in [("a", 1), ("b", 2), ("c", 2)] {
        let keyword = add_keyword(&conn, project, term);
        rank(&conn, keyword, position, 1_000);
    }

    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let listed = service
        .list_projects(&RequestContext::authenticated(owner))
        .unwrap();
    assert_eq!(listed[0].avg_position, 1.7);
}

#[test]
fn averages_are_computed_per_project() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let shop = create_project(&conn, owner, "Shop");
    let blog = create_project(&conn, owner, "Blog");
    let shop_kw = add_keyword(&conn, shop, "shoes");
    let blog_kw = add_keyword(&conn, blog, "tips");
    rank(&conn, shop_kw, 10, 1);
    rank(&conn, blog_kw, 2, 1);

    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let listed = service
        .list_projects(&RequestContext::authenticated(owner))
        .unwrap();
    let by_id = |id: Uuid| listed.iter().find(|item| item.project.id == id).unwrap();
    assert_eq!(by_id(shop).avg_position, 10.0);
    assert_eq!(by_id(blog).avg_position, 2.0);
}

#[test]
fn stats_average_covers_every_ranking_in_trailing_window() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    let frequent = add_keyword(&conn, project, "frequent");
    let rare = add_keyword(&conn, project, "rare");

    let now = 100 * DAY_MS;
    rank(&conn, frequent, 2, now);
    rank(&conn, frequent, 2, now - DAY_MS);
    rank(&conn, frequent, 2, now - 2 * DAY_MS);
    rank(&conn, rare, 10, now - 30 * DAY_MS);
    rank(&conn, rare, 99, now - 31 * DAY_MS);

    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let stats = service
        .get_stats_at(&RequestContext::authenticated(owner), now)
        .unwrap();

    assert_eq!(
        stats,
        UserStats {
            project_count: 1,
            keyword_count: 2,
            total_rankings: 5,
            avg_position: 4.0,
        }
    );
}

#[test]
fn stats_without_recent_rankings_average_zero() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let project = create_project(&conn, owner, "Shop");
    let keyword = add_keyword(&conn, project, "old");
    rank(&conn, keyword, 3, 0);

    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    let stats = service
        .get_stats_at(&RequestContext::authenticated(owner), 365 * DAY_MS)
        .unwrap();
    assert_eq!(stats.total_rankings, 1);
    assert_eq!(stats.avg_position, 0.0);
}

#[test]
fn stats_ignore_other_users_and_missing_session() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn);
    let stranger = seed_user(&conn);
    let project = create_project(&conn, stranger, "Foreign");
    let keyword = add_keyword(&conn, project, "theirs");
    rank(&conn, keyword, 1, 1_000);

    let service = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
    assert_eq!(
        service
            .get_stats_at(&RequestContext::authenticated(owner), 2_000)
            .unwrap(),
        UserStats::default()
    );
    assert_eq!(
        service.get_stats(&RequestContext::anonymous()).unwrap(),
        UserStats::default()
    );
}
