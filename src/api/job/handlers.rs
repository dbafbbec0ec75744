use actix_web::{
    HttpResponse, Responder, get, post,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Query;
use tracing::error;

use super::dto::{ScrapeQuery, ScrapeResponse};
use super::service::{JobService, ServiceError};

#[post("/scrape")]
async fn scrape_jobs(service: Data<JobService>, query: Query<ScrapeQuery>) -> impl Responder {
    let job_function = query.into_inner().job_function;

    match service.scrape(&job_function).await {
        Ok(outcome) => HttpResponse::Ok().json(ScrapeResponse::success(&job_function, outcome)),
        Err(err) => {
            error!("Scrape failed for function={}: {:?}", job_function, err);
            HttpResponse::InternalServerError().json(ScrapeResponse::failure(&job_function, &err))
        }
    }
}

#[get("/functions")]
async fn available_functions(service: Data<JobService>) -> impl Responder {
    HttpResponse::Ok().json(service.available_functions())
}

#[get("")]
async fn list_jobs(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_all().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/function/{job_function}")]
async fn list_jobs_by_function(
    service: Data<JobService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.list_by_function(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/export")]
async fn export_sql(service: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let dump = service.export_sql().await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(dump))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/jobs")
            .service(scrape_jobs)
            .service(available_functions)
            .service(export_sql)
            .service(list_jobs_by_function)
            .service(list_jobs),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::models::JobRecord;
    use crate::api::validation::query_config;
    use crate::db::MemoryStore;
    use crate::extract::fetch::stub::StubFetcher;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;
    use std::sync::Arc;

    fn service() -> Data<JobService> {
        Data::new(JobService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(StubFetcher::failing()),
            "https://jobs.techstars.com/jobs",
        ))
    }

    #[actix_web::test]
    async fn scrape_reports_count_function_and_fallback() {
        let app = test::init_service(
            App::new()
                .app_data(service())
                .app_data(query_config())
                .configure(job_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/jobs/scrape?jobFunction=Marketing")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["recordCount"], 8);
        assert_eq!(body["jobFunction"], "Marketing");
        assert_eq!(body["fallback"], true);
        let records = body["records"].as_array().unwrap();
        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r["status"] == "COMPLETED"));
    }

    #[actix_web::test]
    async fn scrape_without_job_function_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(service())
                .app_data(query_config())
                .configure(job_config),
        )
        .await;

        let req = test::TestRequest::post().uri("/api/jobs/scrape").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn list_and_filter_endpoints() {
        let svc = service();
        svc.scrape("Design").await.unwrap();
        svc.scrape("Sales").await.unwrap();
        let app = test::init_service(App::new().app_data(svc).configure(job_config)).await;

        let req = test::TestRequest::get().uri("/api/jobs").to_request();
        let all: Vec<JobRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all.len(), 16);

        let req = test::TestRequest::get()
            .uri("/api/jobs/function/Data%20Science")
            .to_request();
        let none: Vec<JobRecord> = test::call_and_read_body_json(&app, req).await;
        assert!(none.is_empty());

        let req = test::TestRequest::get().uri("/api/jobs/function/Sales").to_request();
        let sales: Vec<JobRecord> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(sales.len(), 8);
    }

    #[actix_web::test]
    async fn functions_are_listed() {
        let app = test::init_service(App::new().app_data(service()).configure(job_config)).await;
        let req = test::TestRequest::get().uri("/api/jobs/functions").to_request();
        let functions: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(functions.len(), 10);
        assert_eq!(functions[0], "Software Engineering");
        assert_eq!(functions[9], "Customer Success");
    }

    #[actix_web::test]
    async fn export_returns_plain_text_dump() {
        let svc = service();
        svc.scrape("Finance").await.unwrap();
        let app = test::init_service(App::new().app_data(svc).configure(job_config)).await;

        let req = test::TestRequest::get().uri("/api/jobs/export").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        let sql = std::str::from_utf8(&body).unwrap();
        assert!(sql.starts_with("-- TechStars Job Scraper Database Export"));
        assert_eq!(sql.matches("INSERT INTO jobs ").count(), 8);
    }
}
