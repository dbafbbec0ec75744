use sqlx::{PgConnection, Pool, Postgres};
use tracing::debug;

use crate::api::job::models::{Company, Tag};
use crate::db::models::{CompanyRow, TagRow};

/// Repository for companies and tags, both keyed by natural key
pub struct CompanyRepository;

impl CompanyRepository {
    pub async fn find_by_title(
        pool: &Pool<Postgres>,
        title: &str,
    ) -> Result<Option<CompanyRow>, sqlx::Error> {
        sqlx::query_as::<_, CompanyRow>(
            "SELECT id, title, website_url, logo_url FROM companies WHERE title = $1",
        )
        .bind(title)
        .fetch_optional(pool)
        .await
    }

    /// Insert unless the title exists, then read back whichever row won.
    pub async fn find_or_create(
        conn: &mut PgConnection,
        company: &Company,
    ) -> Result<CompanyRow, sqlx::Error> {
        let inserted = sqlx::query_as::<_, CompanyRow>(
            r#"
            INSERT INTO companies (title, website_url, logo_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (title) DO NOTHING
            RETURNING id, title, website_url, logo_url
            "#,
        )
        .bind(&company.title)
        .bind(&company.website_url)
        .bind(&company.logo_url)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = inserted {
            debug!("Company created: id={}, title={}", row.id, row.title);
            return Ok(row);
        }

        sqlx::query_as::<_, CompanyRow>(
            "SELECT id, title, website_url, logo_url FROM companies WHERE title = $1",
        )
        .bind(&company.title)
        .fetch_one(&mut *conn)
        .await
    }
}

pub struct TagRepository;

impl TagRepository {
    pub async fn find_by_name(
        pool: &Pool<Postgres>,
        name: &str,
    ) -> Result<Option<TagRow>, sqlx::Error> {
        sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_or_create(conn: &mut PgConnection, tag: &Tag) -> Result<TagRow, sqlx::Error> {
        let inserted = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name
            "#,
        )
        .bind(&tag.name)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(row) = inserted {
            debug!("Tag created: id={}, name={}", row.id, row.name);
            return Ok(row);
        }

        sqlx::query_as::<_, TagRow>("SELECT id, name FROM tags WHERE name = $1")
            .bind(&tag.name)
            .fetch_one(&mut *conn)
            .await
    }
}
