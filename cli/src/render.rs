//! Terminal rendering for pages. `--json` prints the backend records as-is.

use portal::net::types::{BlogPost, Comment, Experience, HealthStatus, Project, User};
use portal::pages::blog::{BlogDetailPage, BlogListPage};
use portal::state::store::SessionStore;
use serde::Serialize;

use crate::CliError;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn health(health: &HealthStatus, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(health);
    }
    match &health.service {
        Some(service) => println!("{service}: {}", health.status),
        None => println!("{}", health.status),
    }
    Ok(())
}

pub fn user(user: &User, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(user);
    }
    println!("{} <{}>", user.display_name, user.email);
    println!("role: {}", user.role.as_str());
    println!("since: {}", user.created_at);
    Ok(())
}

pub fn signed_in(user: &User, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(user);
    }
    println!("Signed in as {} <{}>.", user.display_name, user.email);
    Ok(())
}

pub fn home(user: Option<&User>) {
    println!("Portfolio");
    println!("  /experience  work history");
    println!("  /projects    selected projects");
    println!("  /blog        writing");
    match user {
        Some(user) => println!("\nSigned in as {}.", user.display_name),
        None => println!("\nNot signed in."),
    }
}

pub fn experiences(items: &[Experience], json: bool) -> Result<(), CliError> {
    if json {
        return print_json(items);
    }
    for item in items {
        println!("{} at {} ({})", item.role, item.company, item.location);
        println!("  {} - {}  [{}]", item.start_date, item.end_date, item.experience_id);
        for bullet in &item.bullets {
            println!("  * {bullet}");
        }
    }
    Ok(())
}

pub fn projects(items: &[Project], json: bool) -> Result<(), CliError> {
    if json {
        return print_json(items);
    }
    for item in items {
        println!("{} ({})  [{}]", item.title, item.date_range, item.project_id);
        println!("  {}", item.tech_stack);
        for bullet in &item.bullets {
            println!("  * {bullet}");
        }
        for url in [&item.github_url, &item.live_url].into_iter().flatten() {
            println!("  {url}");
        }
    }
    Ok(())
}

pub fn post_header(post: &BlogPost, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(post);
    }
    println!("{}  [{}]", post.title, post.post_id);
    println!("  by {} on {}", post.author_name, post.created_at);
    if !post.tags.is_empty() {
        println!("  tags: {}", post.tags.join(", "));
    }
    if !post.is_published {
        println!("  (draft)");
    }
    Ok(())
}

pub fn blog_list(page: &BlogListPage, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&page.posts);
    }
    if page.posts.is_empty() {
        println!("No posts yet.");
    }
    for post in &page.posts {
        post_header(post, false)?;
        println!("  {}", post.summary);
    }
    if page.can_create {
        println!("\nNew post: portal blog new --title ... --content ...");
    }
    Ok(())
}

pub fn blog_detail(page: &BlogDetailPage, store: &SessionStore, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(&serde_json::json!({ "post": page.post, "comments": page.comments }));
    }
    post_header(&page.post, false)?;
    println!("\n{}\n", page.post.content);
    println!("Comments ({})", page.comments.len());
    for item in &page.comments {
        comment(item, page.can_delete(store, item), false)?;
    }
    Ok(())
}

pub fn comment(comment: &Comment, deletable: bool, json: bool) -> Result<(), CliError> {
    if json {
        return print_json(comment);
    }
    let marker = if deletable { format!("  [{}]", comment.comment_id) } else { String::new() };
    println!("- {} ({}){marker}", comment.display_name, comment.created_at);
    println!("  {}", comment.content);
    Ok(())
}
