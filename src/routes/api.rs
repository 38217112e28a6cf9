use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

use crate::AppPriceLookup;
use crate::domain::price::Price;
use crate::forms::prices::{PriceQueryError, PriceQueryParams};
use crate::repository::DieselRepository;
use crate::routes::problem::ProblemDetails;
use crate::services::ServiceError;
use crate::services::prices::PriceLookup;

/// JSON body returned for a resolved price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub product_id: i64,
    pub brand_id: i64,
    pub price_list: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Rendered as a string so the stored scale survives (`"35.50"`).
    pub price: Decimal,
    pub currency: String,
}

impl From<&Price> for PriceResponse {
    fn from(price: &Price) -> Self {
        Self {
            product_id: price.product_id(),
            brand_id: price.brand_id(),
            price_list: price.price_list_id(),
            start_date: price.start_date(),
            end_date: price.end_date(),
            price: price.amount(),
            currency: price.currency().to_string(),
        }
    }
}

#[get("/v1/prices")]
/// Return the price applicable to a product and brand at `applicationDate`.
///
/// Answers `404` when nothing applies, `400` on malformed parameters and `503`
/// while the lookup is shedding load.
pub async fn api_v1_prices(
    req: HttpRequest,
    params: web::Query<PriceQueryParams>,
    lookup: web::Data<AppPriceLookup>,
) -> impl Responder {
    price_response(lookup.get_ref(), params.into_inner(), req.path())
}

/// Runs a lookup and renders the outcome; shared by the route and its tests.
pub fn price_response<L>(lookup: &L, params: PriceQueryParams, path: &str) -> HttpResponse
where
    L: PriceLookup + ?Sized,
{
    let query_context = json!({
        "productId": params.product_id.as_deref().unwrap_or("N/A"),
        "brandId": params.brand_id.as_deref().unwrap_or("N/A"),
        "applicationDate": params.application_date.as_deref().unwrap_or("N/A"),
    });

    let query = match params.into_price_query() {
        Ok(query) => query,
        Err(err) => return bad_request(err, path),
    };

    match lookup.find_applicable_price(&query) {
        Ok(price) => HttpResponse::Ok().json(PriceResponse::from(&price)),
        Err(ServiceError::NotFound) => ProblemDetails::new(StatusCode::NOT_FOUND, "Price Not Found")
            .detail("No price applies to the given product, brand and date")
            .instance(path)
            .with("queryContext", query_context)
            .timestamped()
            .into_response(),
        Err(err @ (ServiceError::BulkheadFull | ServiceError::CircuitOpen)) => {
            ProblemDetails::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
                .detail(err.to_string())
                .instance(path)
                .timestamped()
                .into_response()
        }
        Err(err) => {
            let error_id = short_error_id();
            log::error!("Failed to look up price [ID:{error_id}]: {err}");
            ProblemDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .detail(format!(
                    "An internal error occurred. Please contact support quoting ID: {error_id}"
                ))
                .instance(path)
                .with("errorId", &error_id)
                .timestamped()
                .into_response()
        }
    }
}

fn bad_request(err: PriceQueryError, path: &str) -> HttpResponse {
    let title = match &err {
        PriceQueryError::MissingParameter(_) => "Missing Parameter",
        PriceQueryError::InvalidType { .. } | PriceQueryError::InvalidDate(_) => {
            "Invalid Parameter Type"
        }
        PriceQueryError::Validation(_) => "Invalid Parameters",
    };

    let mut problem = ProblemDetails::new(StatusCode::BAD_REQUEST, title)
        .detail(err.to_string())
        .instance(path);
    if let Some(parameter) = err.parameter() {
        problem = problem.with("parameter", parameter);
    }
    problem.into_response()
}

fn short_error_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[get("/health")]
/// Liveness probe reporting whether the database answers.
pub async fn health(repo: web::Data<DieselRepository>) -> impl Responder {
    if repo.is_healthy() {
        HttpResponse::Ok().json(json!({ "status": "UP" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "DOWN" }))
    }
}
