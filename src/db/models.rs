use sqlx::FromRow;

use crate::api::job::models::{Company, Tag};

/// Database representation of a company
#[derive(Debug, FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub title: String,
    pub website_url: Option<String>,
    pub logo_url: Option<String>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Company {
            id: Some(row.id),
            title: row.title,
            website_url: row.website_url,
            logo_url: row.logo_url,
        }
    }
}

/// Database representation of a tag
#[derive(Debug, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: Some(row.id),
            name: row.name,
        }
    }
}

/// A job joined with its company
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub position_name: Option<String>,
    pub job_page_url: Option<String>,
    pub labor_function: Option<String>,
    pub location: Option<String>,
    pub posted_date_unix: Option<i64>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub company_id: i64,
    pub company_title: String,
    pub company_website_url: Option<String>,
    pub company_logo_url: Option<String>,
}

/// One job-to-tag link, joined with the tag
#[derive(Debug, FromRow)]
pub struct JobTagRow {
    pub job_id: i64,
    pub tag_id: i64,
    pub name: String,
}
