//! AWS Lambda handler for coverage calculations
//!
//! Accepts a profile as a JSON body through a Lambda Function URL and
//! returns the full calculation result. Invalid profiles get a 400 with
//! every field violation listed.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use chrono::Utc;
use coverage_engine::{
    CalculationCache, CalculationEngine, ConfiguredRateProvider, EngineConfig, EngineError,
    ProfileRequest,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Engine state built once per cold start
struct HandlerState {
    engine: CalculationEngine,
    rates: ConfiguredRateProvider,
    cache: Option<Mutex<CalculationCache>>,
}

fn response(status: u16, body: &Value) -> Value {
    json!({
        "statusCode": status,
        "headers": {
            "Content-Type": "application/json",
            "Access-Control-Allow-Origin": "*",
            "Access-Control-Allow-Methods": "POST, OPTIONS",
            "Access-Control-Allow-Headers": "Content-Type",
        },
        "body": body.to_string(),
    })
}

fn error_response(status: u16, message: &str) -> Value {
    response(status, &json!({ "error": message }))
}

fn handle(state: &HandlerState, event: LambdaFunctionUrlRequest) -> Value {
    // CORS preflight carries no body
    if event.request_context.http.method.as_deref() == Some("OPTIONS") {
        return json!({
            "statusCode": 200,
            "headers": {
                "Access-Control-Allow-Origin": "*",
                "Access-Control-Allow-Methods": "POST, OPTIONS",
                "Access-Control-Allow-Headers": "Content-Type",
            },
        });
    }

    if event.is_base64_encoded {
        return error_response(400, "Body must be JSON text, not base64");
    }

    let body = match event.body.as_deref().map(str::trim) {
        Some(body) if !body.is_empty() => body,
        _ => return error_response(400, "Request body is required"),
    };

    let request: ProfileRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    let profile = match request.into_profile() {
        Ok(profile) => profile,
        Err(errors) => {
            let violations: Vec<Value> = errors
                .violations
                .iter()
                .map(|v| json!({ "field": v.field(), "message": v.to_string() }))
                .collect();
            return response(
                400,
                &json!({ "error": "Invalid profile", "violations": violations }),
            );
        }
    };

    let calculate = || state.engine.calculate(&profile, &state.rates);
    let result = match &state.cache {
        Some(cache) => match cache.lock() {
            Ok(mut cache) => cache.get_or_calculate(&profile, Utc::now(), calculate),
            Err(_) => {
                warn!("result cache lock poisoned; calculating without cache");
                calculate()
            }
        },
        None => calculate(),
    };

    match result {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(body) => response(200, &body),
            Err(e) => error_response(500, &format!("Failed to serialize result: {}", e)),
        },
        Err(EngineError::Validation(errors)) => error_response(400, &errors.to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = EngineConfig::from_env()?;
    let state = Arc::new(HandlerState {
        engine: config.build_engine()?,
        rates: config.rate_provider(Utc::now()),
        cache: config.cache_ttl().map(|ttl| Mutex::new(CalculationCache::new(ttl))),
    });
    info!(
        "coverage handler ready (policy {:?}, cache {})",
        config.aggregation_policy,
        if state.cache.is_some() { "on" } else { "off" }
    );

    run(service_fn(move |event: LambdaEvent<LambdaFunctionUrlRequest>| {
        let state = Arc::clone(&state);
        async move { Ok::<Value, Error>(handle(&state, event.payload)) }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use coverage_engine::StaticRateProvider;

    fn state(cache: bool) -> HandlerState {
        let config = EngineConfig::default();
        HandlerState {
            engine: CalculationEngine::new(),
            rates: config.rate_provider(Utc::now()),
            cache: cache.then(|| Mutex::new(CalculationCache::new(Duration::minutes(5)))),
        }
    }

    fn event(method: &str, body: Option<&str>) -> LambdaFunctionUrlRequest {
        serde_json::from_value(json!({
            "requestContext": {
                "timeEpoch": 0,
                "http": { "method": method },
            },
            "body": body,
            "isBase64Encoded": false,
        }))
        .unwrap()
    }

    fn body(response: &Value) -> Value {
        serde_json::from_str(response["body"].as_str().unwrap()).unwrap()
    }

    const VALID: &str = r#"{"age": 40, "gender": "male", "smoking": "non-smoker", "dependents": 1,
        "annualIncome": 50000, "monthlyExpenses": 2500, "coveragePeriod": "20"}"#;

    #[test]
    fn test_preflight_returns_ok_without_body() {
        let response = handle(&state(false), event("OPTIONS", None));
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Access-Control-Allow-Methods"], "POST, OPTIONS");
    }

    #[test]
    fn test_empty_body_rejected() {
        let response = handle(&state(false), event("POST", Some("  ")));
        assert_eq!(response["statusCode"], 400);
        assert_eq!(body(&response)["error"], "Request body is required");
    }

    #[test]
    fn test_invalid_profile_lists_violations() {
        let response = handle(
            &state(false),
            event("POST", Some(r#"{"age": 12, "gender": "male"}"#)),
        );
        assert_eq!(response["statusCode"], 400);

        let body = body(&response);
        let fields: Vec<&str> = body["violations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"age"));
        assert!(fields.contains(&"smoking"));
        assert!(fields.contains(&"annualIncome"));
    }

    #[test]
    fn test_valid_profile_returns_result() {
        let state = state(true);
        let response = handle(&state, event("POST", Some(VALID)));
        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["headers"]["Content-Type"], "application/json");

        let body = body(&response);
        assert_eq!(body["recommendedCoverage"], 600_000.0);
        assert!(body["calculations"]["needsBased"].is_object());

        handle(&state, event("POST", Some(VALID)));
        let cache = state.cache.as_ref().unwrap().lock().unwrap();
        assert_eq!(cache.cache_hits, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_matches_direct_engine_coverage() {
        let profile: ProfileRequest = serde_json::from_str(VALID).unwrap();
        let direct = CalculationEngine::new()
            .calculate_request(&profile, &StaticRateProvider::default())
            .unwrap();

        let response = handle(&state(false), event("POST", Some(VALID)));
        assert_eq!(body(&response)["recommendedCoverage"], direct.recommended_coverage);
    }
}
