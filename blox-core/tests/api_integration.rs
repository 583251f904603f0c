//! Integration tests that call the real Roblox web API.
//!
//! These tests require ROBLOSECURITY to be set (via .env file or environment).
//! Run with: `cargo test -p blox-core --test api_integration -- --ignored`
//!
//! These are marked #[ignore] by default to avoid:
//! - Rate limiting in CI
//! - Test failures when no session cookie is available
//! - Slow test runs

use blox_core::{
    AvatarSize, Client, ClientConfig, GroupId, PageSize, RoleId, ThumbnailFormat, UserId,
};
use std::sync::Arc;

/// Load environment variables from .env file
fn setup() {
    let _ = dotenvy::dotenv();
}

/// Check if a session cookie is available
fn has_cookie() -> bool {
    std::env::var("ROBLOSECURITY").is_ok()
}

#[tokio::test]
#[ignore] // Run with: cargo test -p blox-core --test api_integration -- --ignored
async fn test_login_loads_current_user() {
    setup();
    if !has_cookie() {
        eprintln!("Skipping test: ROBLOSECURITY not set");
        return;
    }

    let client = Client::connect(ClientConfig::from_env())
        .await
        .expect("Failed to connect");
    let me = client.current_user().expect("Current user should be loaded");
    println!("Logged in as {:?} ({})", me.username(), me.id());

    let cached = client
        .get_user(me.id(), true)
        .await
        .expect("Lookup should succeed")
        .expect("Current user should be registered");
    assert!(Arc::ptr_eq(&me, &cached));
}

#[tokio::test]
#[ignore]
async fn test_public_user_lookup() {
    setup();
    if !has_cookie() {
        eprintln!("Skipping test: ROBLOSECURITY not set");
        return;
    }

    let client = Client::connect(ClientConfig::from_env())
        .await
        .expect("Failed to connect");

    let roblox = client
        .get_user(UserId::new(1), false)
        .await
        .expect("Request should succeed")
        .expect("User 1 exists");
    assert_eq!(roblox.username().as_deref(), Some("Roblox"));

    let found = client
        .get_users_by_names(&["Roblox", "this-name-should-not-exist-0000"], true, true)
        .await
        .expect("Batch lookup should succeed");
    assert_eq!(found.len(), 2);
    assert!(Arc::ptr_eq(found["Roblox"].as_ref().unwrap(), &roblox));
    assert!(found["this-name-should-not-exist-0000"].is_none());

    let avatar = client
        .avatar_thumbnail(&roblox, AvatarSize::Small, ThumbnailFormat::Png, false)
        .await
        .expect("Thumbnail request should succeed");
    println!("Avatar: {avatar:?}");
}

#[tokio::test]
#[ignore]
async fn test_group_graph() {
    setup();
    if !has_cookie() {
        eprintln!("Skipping test: ROBLOSECURITY not set");
        return;
    }

    let client = Client::connect(ClientConfig::from_env())
        .await
        .expect("Failed to connect");

    // Roblox's own group
    let group = client
        .get_group(GroupId::new(7), false)
        .await
        .expect("Request should succeed")
        .expect("Group 7 exists");
    println!("Group: {:?}", group.name());

    let roles = client.group_roles(&group).await.expect("Roles should load");
    assert!(roles.iter().any(|r| r.id() == RoleId::GUEST));

    let permissions = client
        .role_permissions(&group.guest_role(), false)
        .await
        .expect("Guest permissions should load");
    println!("Guest permissions: {permissions:?}");

    let mut wall = client
        .group_wall(&group, PageSize::Ten, None)
        .await
        .expect("Wall should load");
    if let Some(post) = wall.data.first_mut() {
        let poster = post.load_poster(&client).await.expect("Poster should resolve");
        assert!(Arc::ptr_eq(&poster, &group.member(poster.user_id()).unwrap()));
    }
}
