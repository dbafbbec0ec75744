use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Write;

use crate::api::job::models::{Company, JobRecord, Tag};

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS companies (
  id BIGSERIAL PRIMARY KEY,
  title VARCHAR(255) UNIQUE NOT NULL,
  website_url VARCHAR(255),
  logo_url VARCHAR(255)
);

CREATE TABLE IF NOT EXISTS tags (
  id BIGSERIAL PRIMARY KEY,
  name VARCHAR(255) UNIQUE NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
  id BIGSERIAL PRIMARY KEY,
  position_name VARCHAR(255),
  job_page_url VARCHAR(255),
  labor_function VARCHAR(255),
  location VARCHAR(255),
  posted_date_unix BIGINT,
  description TEXT,
  status VARCHAR(50),
  company_id BIGINT REFERENCES companies(id)
);

CREATE TABLE IF NOT EXISTS job_tags (
  job_id BIGINT REFERENCES jobs(id),
  tag_id BIGINT REFERENCES tags(id),
  PRIMARY KEY (job_id, tag_id)
);

";

/// Renders a record set as a self-contained SQL dump.
///
/// Output order is schema, companies, tags, jobs, job_tags. Foreign keys are
/// written as sub-selects on natural keys, so the dump loads into a fresh
/// database whatever ids it hands out.
///
/// Only single quotes are escaped. That is enough for standard string
/// literals but is not a general defence for untrusted text.
pub struct SqlExporter<'a> {
    jobs: &'a [JobRecord],
    sql: String,
}

impl<'a> SqlExporter<'a> {
    pub fn new(jobs: &'a [JobRecord]) -> Self {
        Self {
            jobs,
            sql: String::new(),
        }
    }

    pub fn generate(mut self, generated_at: DateTime<Utc>) -> String {
        self.sql.push_str("-- TechStars Job Scraper Database Export\n");
        let _ = writeln!(self.sql, "-- Generated: {}\n", generated_at.to_rfc3339());
        self.sql.push_str(SCHEMA);
        self.append_companies();
        self.append_tags();
        self.append_jobs();
        self.append_job_tags();
        self.sql
    }

    fn append_companies(&mut self) {
        let mut seen = HashSet::new();
        let companies: Vec<&Company> = self
            .jobs
            .iter()
            .map(|job| &job.company)
            .filter(|company| seen.insert(company.title.as_str()))
            .collect();

        for company in companies {
            let _ = writeln!(
                self.sql,
                "INSERT INTO companies (title, website_url, logo_url) VALUES ('{}', '{}', '{}') ON CONFLICT (title) DO NOTHING;",
                escape(&company.title),
                escape(company.website_url.as_deref().unwrap_or_default()),
                escape(company.logo_url.as_deref().unwrap_or_default()),
            );
        }
        self.sql.push('\n');
    }

    fn append_tags(&mut self) {
        let mut seen = HashSet::new();
        let tags: Vec<&Tag> = self
            .jobs
            .iter()
            .flat_map(|job| job.tags.iter())
            .filter(|tag| seen.insert(tag.name.as_str()))
            .collect();

        for tag in tags {
            let _ = writeln!(
                self.sql,
                "INSERT INTO tags (name) VALUES ('{}') ON CONFLICT (name) DO NOTHING;",
                escape(&tag.name)
            );
        }
        self.sql.push('\n');
    }

    fn append_jobs(&mut self) {
        for job in self.jobs {
            let _ = writeln!(
                self.sql,
                "INSERT INTO jobs (position_name, job_page_url, labor_function, location, posted_date_unix, description, status, company_id) \
                 VALUES ('{}', '{}', '{}', '{}', {}, '{}', '{}', (SELECT id FROM companies WHERE title = '{}'));",
                escape(&job.title),
                escape(&job.source_url),
                escape(&job.labor_function),
                escape(&job.location),
                job.posted_at,
                escape(&job.description),
                job.status.as_str(),
                escape(&job.company.title),
            );
        }
        self.sql.push('\n');
    }

    fn append_job_tags(&mut self) {
        for job in self.jobs {
            for tag in &job.tags {
                let _ = writeln!(
                    self.sql,
                    "INSERT INTO job_tags (job_id, tag_id) VALUES ((SELECT id FROM jobs WHERE job_page_url = '{}'), (SELECT id FROM tags WHERE name = '{}'));",
                    escape(&job.source_url),
                    escape(&tag.name),
                );
            }
        }
    }
}

/// Double every single quote.
pub fn escape(value: &str) -> String {
    value.replace('\'', "''")
}
