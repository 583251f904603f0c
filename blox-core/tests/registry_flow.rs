//! End-to-end registry behavior against a scripted transport.
//!
//! These tests verify that every path into the object graph lands on the
//! same canonical instances:
//! - get-or-create idempotence and merge semantics
//! - deduplication across direct lookups, wall posts and messages
//! - batched username resolution
//! - concurrent fetches of the same user

use blox_core::payload::RoleRecord;
use blox_core::testing::{
    assert_same_instance, membership_json, message_json, mock_client, page_json, poster_json, role_json,
    user_json, wall_post_json, MockTransport,
};
use blox_core::{Error, GroupId, MessageTab, PageSize, RoleId, UserId};
use roblox_http::Method;
use serde_json::json;

const USER_1: &str = "https://users.roblox.com/v1/users/1";
const USERNAMES: &str = "https://users.roblox.com/v1/usernames/users";
const ME: &str = "https://users.roblox.com/v1/users/authenticated";

// =============================================================================
// IDEMPOTENCE AND MERGE
// =============================================================================

#[tokio::test]
async fn test_get_user_is_idempotent() {
    let (client, _mock) = mock_client(MockTransport::new().on_get(USER_1, 200, user_json(1, "Roblox")));

    let first = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    let second = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    assert_same_instance(&first, &second);
    assert_eq!(first.profile(), second.profile());
    assert_eq!(client.registry().user_count(), 1);
}

#[test]
fn test_role_merge_preserves_member_count() {
    let (client, _mock) = mock_client(MockTransport::new());
    let group = client.get_or_create_group(GroupId::new(100));

    let role = group.get_or_create_role(&RoleRecord::new(5, "Officer", 10).with_member_count(42));
    group.get_or_create_role(&RoleRecord::new(5, "Officer", 10));
    assert_eq!(role.cached_member_count(), Some(42));

    group.get_or_create_role(&RoleRecord::new(5, "Officer", 10).with_member_count(50));
    assert_eq!(role.cached_member_count(), Some(50));
}

#[test]
fn test_officer_scenario() {
    let (client, _mock) = mock_client(MockTransport::new());
    let group = client.get_or_create_group(GroupId::new(100));
    assert_eq!(group.roles().len(), 1);

    let created = group.get_or_create_role(&RoleRecord::new(5, "Officer", 10).with_member_count(3));
    assert_eq!((created.name().as_str(), created.rank()), ("Officer", 10));
    assert_eq!(created.cached_member_count(), Some(3));

    let updated = group.get_or_create_role(&RoleRecord::new(5, "Officer", 20));
    assert_same_instance(&created, &updated);
    assert_eq!(updated.rank(), 20);
    assert_eq!(updated.cached_member_count(), Some(3));
}

#[tokio::test]
async fn test_new_group_has_guest_before_any_request() {
    let (client, mock) = mock_client(MockTransport::new());
    let group = client.get_or_create_group(GroupId::new(100));

    let guest = group.role(RoleId::GUEST).unwrap();
    assert_eq!(guest.name(), "Guest");
    assert_eq!(guest.rank(), 0);
    assert!(mock.calls().is_empty());
    assert_same_instance(&group, &client.get_or_create_group(GroupId::new(100)));
}

// =============================================================================
// DEDUPLICATION ACROSS PATHS
// =============================================================================

#[tokio::test]
async fn test_wall_poster_is_the_same_user_as_get_user() {
    let (client, _mock) = mock_client(
        MockTransport::new()
            .on_get(USER_1, 200, user_json(1, "Roblox"))
            .on_get(
                "https://groups.roblox.com/v2/groups/7/wall/posts?limit=10&sortOrder=Desc",
                200,
                page_json(vec![wall_post_json(
                    1,
                    poster_json(1, "Roblox", role_json(33, "Member", 1)),
                    "hello",
                )]),
            ),
    );
    let direct = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    let group = client.get_or_create_group(GroupId::new(7));

    let mut wall = client.group_wall(&group, PageSize::Ten, None).await.unwrap();
    let poster = wall.data[0].load_poster(&client).await.unwrap();
    assert_same_instance(poster.user(), &direct);
    assert_same_instance(&direct.membership(GroupId::new(7)).unwrap(), &poster);
}

#[tokio::test]
async fn test_message_stub_resolves_once() {
    let inbox = "https://privatemessages.roblox.com/v1/messages?messageTab=inbox&pageNumber=0&pageSize=10";
    let (client, mock) = mock_client(
        MockTransport::new()
            .on_get(
                inbox,
                200,
                json!({
                    "collection": [message_json(9, (1, "Roblox"), (2, "builder"), "Welcome")],
                    "totalCollectionSize": 1,
                    "totalPages": 1,
                    "pageNumber": 0
                }),
            )
            .on_get(USER_1, 200, user_json(1, "Roblox"))
            .on_get("https://users.roblox.com/v1/users/2", 200, user_json(2, "builder")),
    );

    let mut page = client.messages(MessageTab::Inbox, 0, 10).await.unwrap();
    let message = &mut page.messages[0];
    assert!(!message.sender.is_resolved());

    message.load_users(&client).await.unwrap();
    let sender = message.sender.resolved().unwrap().clone();
    assert_eq!(sender.username().as_deref(), Some("Roblox"));

    message.load_users(&client).await.unwrap();
    assert_same_instance(message.sender.resolved().unwrap(), &sender);
    assert_same_instance(&sender, &client.registry().user(UserId::new(1)).unwrap());
    assert_eq!(mock.call_count(USER_1), 1);
}

#[tokio::test]
async fn test_membership_and_audit_log_share_members() {
    let (client, _mock) = mock_client(
        MockTransport::new()
            .on_get(USER_1, 200, user_json(1, "Roblox"))
            .on_get(
                "https://groups.roblox.com/v1/users/1/groups/roles",
                200,
                json!({ "data": [membership_json(7, "Builders", role_json(33, "Member", 1))] }),
            )
            .on_get(
                "https://groups.roblox.com/v1/groups/7/audit-log?limit=10&sortOrder=Desc",
                200,
                page_json(vec![json!({
                    "actor": poster_json(1, "Roblox", role_json(44, "Admin", 200)),
                    "actionType": "Post Shout",
                    "description": {},
                    "created": "2021-01-01T00:00:00Z"
                })]),
            ),
    );
    let user = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    let groups = client.user_groups(&user, false).await.unwrap();
    let member = groups[&GroupId::new(7)].clone();
    assert_eq!(member.role().name(), "Member");

    let group = client.get_or_create_group(GroupId::new(7));
    let log = client.audit_log(&group, PageSize::Ten, None).await.unwrap();
    assert_same_instance(&log.data[0].actor, &member);
    assert_eq!(member.role().name(), "Admin");
}

// =============================================================================
// BATCHED NAMES
// =============================================================================

#[tokio::test]
async fn test_batched_names_are_complete() {
    let (client, mock) = mock_client(
        MockTransport::new()
            .on_post(
                USERNAMES,
                200,
                json!({ "data": [
                    { "requestedUsername": "alice", "id": 1, "name": "alice" },
                    { "requestedUsername": "carol", "id": 3, "name": "carol" }
                ] }),
            )
            .on_get(USER_1, 200, user_json(1, "alice"))
            .on_get("https://users.roblox.com/v1/users/3", 200, user_json(3, "carol")),
    );

    let found = client
        .get_users_by_names(&["alice", "bob", "carol"], true, false)
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found["alice"].as_ref().unwrap().id(), UserId::new(1));
    assert_eq!(found["carol"].as_ref().unwrap().id(), UserId::new(3));
    assert!(found["bob"].is_none());

    let request = &mock.calls()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(
        request.body.as_ref().unwrap()["usernames"],
        json!(["alice", "bob", "carol"])
    );
}

#[tokio::test]
async fn test_batched_names_use_cache_first() {
    let (client, mock) = mock_client(
        MockTransport::new()
            .on_get(USER_1, 200, user_json(1, "alice"))
            .on_post(USERNAMES, 200, json!({ "data": [] })),
    );
    let alice = client.get_user(UserId::new(1), false).await.unwrap().unwrap();

    let found = client.get_users_by_names(&["alice"], true, true).await.unwrap();
    assert_same_instance(found["alice"].as_ref().unwrap(), &alice);
    assert_eq!(mock.call_count(USERNAMES), 0);

    let found = client.get_users_by_names(&["alice", "bob"], true, true).await.unwrap();
    assert!(found["bob"].is_none());
    assert_eq!(
        mock.calls().last().unwrap().body.as_ref().unwrap()["usernames"],
        json!(["bob"])
    );
}

#[tokio::test]
async fn test_batched_names_keep_each_spelling() {
    let (client, _mock) = mock_client(
        MockTransport::new()
            .on_post(
                USERNAMES,
                200,
                json!({ "data": [
                    { "requestedUsername": "ALICE", "id": 1, "name": "alice" },
                    { "requestedUsername": "alice", "id": 1, "name": "alice" },
                    { "requestedUsername": "Robert", "id": 2, "name": "Robert" }
                ] }),
            )
            .on_get(USER_1, 200, user_json(1, "alice"))
            .on_get("https://users.roblox.com/v1/users/2", 200, user_json(2, "Robert")),
    );

    let found = client
        .get_users_by_names(&["Alice", "alice", "bob"], true, false)
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
    assert_same_instance(found["Alice"].as_ref().unwrap(), found["alice"].as_ref().unwrap());
    assert!(found["bob"].is_none());
    assert!(!found.contains_key("Robert"));
}

#[tokio::test]
async fn test_batched_lookup_refusal_is_an_error() {
    let (client, _mock) = mock_client(MockTransport::new().on_post(USERNAMES, 429, json!({})));
    let err = client.get_users_by_names(&["alice"], true, false).await.unwrap_err();
    assert!(matches!(err, Error::Upstream { status: 429, .. }));
}

// =============================================================================
// CONCURRENCY
// =============================================================================

#[tokio::test]
async fn test_concurrent_get_user_shares_one_fetch() {
    let (client, mock) = mock_client(MockTransport::new().on_get(USER_1, 200, user_json(1, "Roblox")));

    let (a, b, c) = tokio::join!(
        client.get_user(UserId::new(1), false),
        client.get_user(UserId::new(1), false),
        client.get_user(UserId::new(1), true),
    );
    let (a, b, c) = (a.unwrap().unwrap(), b.unwrap().unwrap(), c.unwrap().unwrap());
    assert_same_instance(&a, &b);
    assert_same_instance(&a, &c);
    assert_eq!(mock.call_count(USER_1), 1);
    assert_eq!(client.registry().user_count(), 1);
}

#[tokio::test]
async fn test_concurrent_names_and_ids_converge() {
    let (client, mock) = mock_client(
        MockTransport::new()
            .on_post(
                USERNAMES,
                200,
                json!({ "data": [{ "requestedUsername": "alice", "id": 1, "name": "alice" }] }),
            )
            .on_get(USER_1, 200, user_json(1, "alice")),
    );

    // Polled in order: the id fetch is still in flight when the name lookup
    // reaches it, so both share one request.
    let (by_name, by_id) = futures::join!(
        client.get_user_by_name("alice", false),
        client.get_user(UserId::new(1), false),
    );
    assert_same_instance(&by_name.unwrap().unwrap(), &by_id.unwrap().unwrap());
    assert_eq!(client.registry().user_count(), 1);
    assert_eq!(mock.call_count(USERNAMES), 1);
    assert_eq!(mock.call_count(USER_1), 1);
}

// =============================================================================
// CURRENT USER AND FAILURES
// =============================================================================

#[tokio::test]
async fn test_current_user_is_registered() {
    let (client, mock) = mock_client(
        MockTransport::new()
            .on_get(ME, 200, json!({ "id": 1, "name": "Roblox", "displayName": "Roblox" }))
            .on_get(USER_1, 200, user_json(1, "Roblox")),
    );

    let me = client.get_current_user().await.unwrap();
    let cached = client.get_user(UserId::new(1), true).await.unwrap().unwrap();
    assert_same_instance(&me, &cached);
    assert_eq!(mock.call_count(USER_1), 0);

    let again = client.get_current_user().await.unwrap();
    assert_same_instance(&me, &again);
    assert_eq!(mock.call_count(ME), 2);
    assert_same_instance(&client.current_user().unwrap(), &me);
}

#[tokio::test]
async fn test_failed_fetch_leaves_user_untouched() {
    let (client, mock) = mock_client(MockTransport::new().on_get(USER_1, 200, user_json(1, "Roblox")));
    let user = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    let before = user.profile();

    mock.respond(Method::Get, USER_1, 503, json!({ "errors": [] }));
    assert!(client.get_user(UserId::new(1), false).await.unwrap().is_none());
    assert_eq!(user.profile(), before);
    assert_same_instance(&client.registry().user(UserId::new(1)).unwrap(), &user);

    mock.respond(Method::Get, USER_1, 200, json!({ "id": 1 }));
    assert!(matches!(
        client.get_user(UserId::new(1), false).await,
        Err(Error::Parse(_))
    ));
    assert_eq!(user.profile(), before);
}

#[tokio::test]
async fn test_foreign_role_is_rejected() {
    let (client, _mock) = mock_client(MockTransport::new().on_get(USER_1, 200, user_json(1, "Roblox")));
    let user = client.get_user(UserId::new(1), false).await.unwrap().unwrap();
    let a = client.get_or_create_group(GroupId::new(1));
    let b = client.get_or_create_group(GroupId::new(2));

    let err = a.get_or_create_member(&user, &b.guest_role()).unwrap_err();
    assert!(matches!(err, Error::ForeignRole { .. }));
    assert!(user.groups().is_empty());
}
