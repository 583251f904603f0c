//! Subcommand implementations.

use anyhow::{bail, Context, Result};
use blox_core::{Client, GroupId, User, UserId};

fn print_user(user: &User) {
    println!("{} ({})", user.username().unwrap_or_default(), user.id());
    if let Some(display_name) = user.display_name() {
        println!("  Display name: {display_name}");
    }
    if let Some(created) = user.created() {
        println!("  Joined: {}", created.format("%Y-%m-%d"));
    }
    if user.banned() == Some(true) {
        println!("  Banned");
    }
    if let Some(description) = user.description().filter(|d| !d.is_empty()) {
        println!("  {}", description.replace('\n', "\n  "));
    }
    println!("  {}", user.profile_link());
}

pub async fn show_user(client: &Client, id: i64) -> Result<()> {
    let Some(user) = client.get_user(UserId::new(id), false).await? else {
        bail!("user {id} not found");
    };
    print_user(&user);
    if let Some(status) = client.user_status(&user, false).await? {
        if !status.is_empty() {
            println!("  Status: {status}");
        }
    }
    Ok(())
}

pub async fn lookup(client: &Client, names: &[String], exclude_banned: bool) -> Result<()> {
    let found = client.get_users_by_names(names, exclude_banned, false).await?;
    for name in names {
        match found.get(name).and_then(Option::as_ref) {
            Some(user) => println!("{name}: {}", user.id()),
            None => println!("{name}: not found"),
        }
    }
    Ok(())
}

pub async fn list_groups(client: &Client, user_id: i64) -> Result<()> {
    let Some(user) = client.get_user(UserId::new(user_id), true).await? else {
        bail!("user {user_id} not found");
    };
    let memberships = client.user_groups(&user, false).await?;
    if memberships.is_empty() {
        println!("{} is not in any groups", user.username().unwrap_or_default());
        return Ok(());
    }

    let mut memberships: Vec<_> = memberships.into_values().collect();
    memberships.sort_by_key(|m| m.group_id());
    for member in memberships {
        let group = member
            .group()
            .and_then(|g| g.name())
            .unwrap_or_default();
        let role = member.role();
        println!("{group} ({}): {} [rank {}]", member.group_id(), role.name(), role.rank());
    }
    Ok(())
}

pub async fn show_group(client: &Client, id: i64) -> Result<()> {
    let group = client
        .get_group(GroupId::new(id), false)
        .await?
        .with_context(|| format!("group {id} not found"))?;

    println!("{} ({})", group.name().unwrap_or_default(), group.id());
    if let Some(owner) = group.owner() {
        println!("  Owner: {} ({})", owner.username().unwrap_or_default(), owner.id());
    }
    if let Some(count) = group.profile().member_count {
        println!("  Members: {count}");
    }
    for role in client.group_roles(&group).await? {
        let count = role
            .cached_member_count()
            .map(|c| format!(", {c} members"))
            .unwrap_or_default();
        println!("  [{:>3}] {}{count}", role.rank(), role.name());
    }
    Ok(())
}

pub async fn show_me(client: &Client) -> Result<()> {
    let Some(me) = client.current_user() else {
        bail!("not logged in; set ROBLOSECURITY or pass --cookie");
    };
    print_user(&me);
    match client.robux().await {
        Ok(robux) => println!("  Robux: {robux}"),
        Err(e) => tracing::warn!(error = %e, "Could not load balance"),
    }
    Ok(())
}
