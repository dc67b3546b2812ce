//! Postgres implementation of the persistence ports.
//!
//! Items, ratings, and comments live in JSONB columns; counters move through
//! single-statement updates so concurrent likes never lose increments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use domains::{
    Comment, CommunityList, CommunityRepo, DomainError, ListRepo, RankedList, Result, ScoredItem,
    User, UserRepo, LIST_LEN,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Arc::new(Self { pool }))
    }
}

fn db_err(err: sqlx::Error) -> DomainError {
    DomainError::Internal(err.to_string())
}

fn decode_err(err: serde_json::Error) -> DomainError {
    DomainError::Internal(format!("corrupt stored document: {err}"))
}

fn row_to_user(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(db_err)?,
        first_name: row.try_get("first_name").map_err(db_err)?,
        last_name: row.try_get("last_name").map_err(db_err)?,
        username: row.try_get("username").map_err(db_err)?,
        email: row.try_get("email").map_err(db_err)?,
        password_hash: row.try_get("password_hash").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

fn row_to_list(row: &PgRow) -> Result<RankedList> {
    let items: [String; LIST_LEN] =
        serde_json::from_value(row.try_get("items").map_err(db_err)?).map_err(decode_err)?;
    let ratings: HashMap<String, i16> =
        serde_json::from_value(row.try_get("ratings").map_err(db_err)?).map_err(decode_err)?;
    let comments: Vec<Comment> =
        serde_json::from_value(row.try_get("comments").map_err(db_err)?).map_err(decode_err)?;
    Ok(RankedList {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        owner_username: row.try_get("owner_username").map_err(db_err)?,
        items,
        published: row.try_get("published").map_err(db_err)?,
        publish_date: row
            .try_get::<Option<DateTime<Utc>>, _>("publish_date")
            .map_err(db_err)?,
        views: row.try_get("views").map_err(db_err)?,
        likes: row.try_get("likes").map_err(db_err)?,
        dislikes: row.try_get("dislikes").map_err(db_err)?,
        ratings,
        comments,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn row_to_community(row: &PgRow) -> Result<CommunityList> {
    let items: Vec<ScoredItem> =
        serde_json::from_value(row.try_get("items").map_err(db_err)?).map_err(decode_err)?;
    let ratings: HashMap<String, i16> =
        serde_json::from_value(row.try_get("ratings").map_err(db_err)?).map_err(decode_err)?;
    let comments: Vec<Comment> =
        serde_json::from_value(row.try_get("comments").map_err(db_err)?).map_err(decode_err)?;
    Ok(CommunityList {
        id: row.try_get("id").map_err(db_err)?,
        name: row.try_get("name").map_err(db_err)?,
        items,
        published: row.try_get("published").map_err(db_err)?,
        publish_date: row
            .try_get::<Option<DateTime<Utc>>, _>("publish_date")
            .map_err(db_err)?,
        views: row.try_get("views").map_err(db_err)?,
        likes: row.try_get("likes").map_err(db_err)?,
        dislikes: row.try_get("dislikes").map_err(db_err)?,
        ratings,
        comments,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn json(value: impl serde::Serialize) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| DomainError::Internal(e.to_string()))
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create_user(&self, user: User) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, username, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_user(&row))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_user(&row))
            .transpose()
    }
}

#[async_trait]
impl ListRepo for PgStore {
    async fn create_list(&self, list: RankedList) -> Result<RankedList> {
        sqlx::query(
            "INSERT INTO top5lists
               (id, name, owner_username, items, published, publish_date,
                views, likes, dislikes, ratings, comments, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(&list.owner_username)
        .bind(json(&list.items)?)
        .bind(list.published)
        .bind(list.publish_date)
        .bind(list.views)
        .bind(list.likes)
        .bind(list.dislikes)
        .bind(json(&list.ratings)?)
        .bind(json(&list.comments)?)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(list)
    }

    async fn get_list(&self, id: Uuid) -> Result<Option<RankedList>> {
        sqlx::query("SELECT * FROM top5lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_list(&row))
            .transpose()
    }

    async fn update_list(&self, list: RankedList) -> Result<Option<RankedList>> {
        let updated = sqlx::query(
            "UPDATE top5lists
             SET name = $2, items = $3, published = $4, publish_date = $5, updated_at = $6
             WHERE id = $1",
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(json(&list.items)?)
        .bind(list.published)
        .bind(list.publish_date)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_list(list.id).await
    }

    async fn delete_list(&self, id: Uuid) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM top5lists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<RankedList>> {
        sqlx::query("SELECT * FROM top5lists ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .iter()
            .map(row_to_list)
            .collect()
    }

    async fn find_published_by_name(&self, name: &str) -> Result<Vec<RankedList>> {
        sqlx::query(
            "SELECT * FROM top5lists
             WHERE published AND lower(name) = lower($1)
             ORDER BY created_at, id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .iter()
        .map(row_to_list)
        .collect()
    }

    async fn bump_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE top5lists SET views = views + 1, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE top5lists
             SET ratings = jsonb_set(ratings, ARRAY[$2::text], to_jsonb($3::int)),
                 likes = likes + $4,
                 dislikes = dislikes + $5,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(username)
        .bind(i32::from(rating))
        .bind(like_delta)
        .bind(dislike_delta)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()> {
        sqlx::query(
            "UPDATE top5lists
             SET comments = jsonb_build_array(jsonb_build_object('username', $2::text, 'text', $3::text)) || comments,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&comment.username)
        .bind(&comment.text)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl CommunityRepo for PgStore {
    async fn create_community(&self, list: CommunityList) -> Result<CommunityList> {
        sqlx::query(
            "INSERT INTO communitylists
               (id, name, items, published, publish_date,
                views, likes, dislikes, ratings, comments, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(json(&list.items)?)
        .bind(list.published)
        .bind(list.publish_date)
        .bind(list.views)
        .bind(list.likes)
        .bind(list.dislikes)
        .bind(json(&list.ratings)?)
        .bind(json(&list.comments)?)
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(list)
    }

    async fn get_community(&self, id: Uuid) -> Result<Option<CommunityList>> {
        sqlx::query("SELECT * FROM communitylists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_community(&row))
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<CommunityList>> {
        sqlx::query("SELECT * FROM communitylists WHERE lower(name) = lower($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .map(|row| row_to_community(&row))
            .transpose()
    }

    async fn list_all(&self) -> Result<Vec<CommunityList>> {
        sqlx::query("SELECT * FROM communitylists ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?
            .iter()
            .map(row_to_community)
            .collect()
    }

    async fn replace_items(&self, id: Uuid, items: Vec<ScoredItem>) -> Result<()> {
        sqlx::query("UPDATE communitylists SET items = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(json(&items)?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_community(&self, list: CommunityList) -> Result<Option<CommunityList>> {
        let updated = sqlx::query(
            "UPDATE communitylists
             SET name = $2, items = $3, published = $4, publish_date = $5, updated_at = $6
             WHERE id = $1",
        )
        .bind(list.id)
        .bind(&list.name)
        .bind(json(&list.items)?)
        .bind(list.published)
        .bind(list.publish_date)
        .bind(list.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_community(list.id).await
    }

    async fn delete_community(&self, id: Uuid) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM communitylists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(deleted.rows_affected() > 0)
    }

    async fn bump_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE communitylists SET views = views + 1, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn apply_rating(
        &self,
        id: Uuid,
        username: &str,
        rating: i16,
        like_delta: i64,
        dislike_delta: i64,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE communitylists
             SET ratings = jsonb_set(ratings, ARRAY[$2::text], to_jsonb($3::int)),
                 likes = likes + $4,
                 dislikes = dislikes + $5,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(username)
        .bind(i32::from(rating))
        .bind(like_delta)
        .bind(dislike_delta)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<()> {
        sqlx::query(
            "UPDATE communitylists
             SET comments = jsonb_build_array(jsonb_build_object('username', $2::text, 'text', $3::text)) || comments,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&comment.username)
        .bind(&comment.text)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
