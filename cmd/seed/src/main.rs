//! Seeds a Postgres database with demo campus content and prints session
//! tokens for the seeded users, so a fresh checkout has something to click
//! through. Goes through `BoardService` rather than raw SQL so the seeded
//! counters are consistent with the ledger.

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::{campus_from_email, JwtSessions};
use domains::{AuthenticatedUser, VoteTarget};
use secrecy::SecretString;
use services::{BoardService, NewComment, NewPost};
use storage_adapters::PostgresStore;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("QUADBOARD__DATABASE__URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .context("set QUADBOARD__DATABASE__URL or DATABASE_URL")?;
    let jwt_secret = std::env::var("QUADBOARD__AUTH__JWT_SECRET")
        .unwrap_or_else(|_| "quadboard-dev-secret".to_string());

    let store = Arc::new(PostgresStore::connect(&database_url, 5).await?);
    let board = BoardService::new(store.clone(), store);
    let sessions = JwtSessions::new(&SecretString::from(jwt_secret));

    let ada = demo_user("ada@umich.edu", "Ada")?;
    let grace = demo_user("grace@cs.umich.edu", "Grace")?;

    let couch = board
        .create_post(
            &ada,
            NewPost {
                title: "Free couch outside West Quad".into(),
                body_text: Some("First come first served, it's in decent shape.".into()),
                flair: Some("Free".into()),
            },
        )
        .await?;
    let books = board
        .create_post(
            &grace,
            NewPost {
                title: "Selling EECS 281 textbook".into(),
                body_text: Some("$30, annotations included at no extra charge.".into()),
                flair: Some("For Sale".into()),
            },
        )
        .await?;

    let top = board
        .create_comment(
            &grace,
            couch.id,
            NewComment {
                body_text: "Is it still there?".into(),
                parent_id: None,
            },
        )
        .await?;
    board
        .create_comment(
            &ada,
            couch.id,
            NewComment {
                body_text: "Yep, as of 10 minutes ago.".into(),
                parent_id: Some(top.id),
            },
        )
        .await?;

    board.vote(&grace, VoteTarget::post(couch.id), 1).await?;
    board.vote(&ada, VoteTarget::post(books.id), 1).await?;
    board.vote(&ada, VoteTarget::comment(top.id), 1).await?;

    println!("seeded campus {} with 2 posts", ada.campus);
    println!("token (Ada):   {}", sessions.issue(&ada)?);
    println!("token (Grace): {}", sessions.issue(&grace)?);
    Ok(())
}

fn demo_user(email: &str, name: &str) -> anyhow::Result<AuthenticatedUser> {
    Ok(AuthenticatedUser {
        id: Uuid::now_v7(),
        campus: campus_from_email(email)?,
        display_name: name.to_string(),
    })
}
