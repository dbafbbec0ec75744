use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Query-string validation with the project's standard error body
pub fn query_config() -> actix_web_validator::QueryConfig {
    actix_web_validator::QueryConfig::default()
        .error_handler(|err, _req| {
            let mut fields = serde_json::Map::new();

            let error = match err {
                actix_web_validator::Error::Validate(validation_errors) => {
                    for (field, errors) in validation_errors.field_errors() {
                        let messages: Vec<String> = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
                            })
                            .collect();
                        fields.insert(
                            field.to_string(),
                            serde_json::json!({"errors": messages})
                        );
                    }
                    "Validation failed"
                }
                actix_web_validator::Error::Deserialize(de_err) => {
                    let err_string = de_err.to_string();

                    if err_string.contains("missing field") {
                        fields.insert(
                            "message".to_string(),
                            serde_json::json!("Missing required query parameter: jobFunction")
                        );
                    } else {
                        fields.insert(
                            "message".to_string(),
                            serde_json::json!("Invalid query string")
                        );
                    }
                    "Request validation failed"
                }
                _ => {
                    fields.insert(
                        "message".to_string(),
                        serde_json::json!("Validation error")
                    );
                    "Validation failed"
                }
            };

            let error_response = ErrorResponse {
                error: error.to_string(),
                fields: serde_json::Value::Object(fields),
            };
            actix_web::error::InternalError::from_response(
                "",
                HttpResponse::BadRequest().json(error_response)
            ).into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::dto::ScrapeQuery;
    use actix_web::{App, HttpResponse, Responder, http::StatusCode, test, web};
    use actix_web_validator::Query;
    use serde_json::Value;

    async fn echo(query: Query<ScrapeQuery>) -> impl Responder {
        HttpResponse::Ok().body(query.into_inner().job_function)
    }

    #[actix_web::test]
    async fn missing_parameter_uses_error_response_shape() {
        let app = test::init_service(
            App::new()
                .app_data(query_config())
                .route("/scrape", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post().uri("/scrape").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request validation failed");
        assert!(body["fields"]["message"].is_string());
    }

    #[actix_web::test]
    async fn overlong_parameter_is_rejected_per_field() {
        let app = test::init_service(
            App::new()
                .app_data(query_config())
                .route("/scrape", web::post().to(echo)),
        )
        .await;

        let long = "x".repeat(300);
        let req = test::TestRequest::post()
            .uri(&format!("/scrape?jobFunction={}", long))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert!(body["fields"]["job_function"]["errors"].is_array());
    }
}
