use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};

use warthunder_player_api::app_state::AppState;
use warthunder_player_api::browser::BrowserManager;
use warthunder_player_api::cache::ProfileCache;
use warthunder_player_api::config::Config;
use warthunder_player_api::metrics::MetricsTracker;
use warthunder_player_api::models::PlayerProfile;
use warthunder_player_api::scraping::{ProfileService, ServiceError};

#[get("/")]
async fn welcome() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "War Thunder player statistics API",
        "usage": "GET /player?nick=<nickname>"
    }))
}

#[get("/favicon.ico")]
async fn favicon() -> impl Responder {
    HttpResponse::NoContent().finish()
}

#[get("/metrics")]
async fn get_metrics(data: web::Data<AppState>) -> impl Responder {
    let snap = data.metrics.snapshot();
    HttpResponse::Ok().json(serde_json::json!({
        "total_requests": snap.total_requests,
        "successful_requests": snap.successful_requests,
        "not_found_requests": snap.not_found_requests,
        "failed_requests": snap.failed_requests,
        "challenge_failures": snap.challenge_failures,
        "cache_hits": snap.cache_hits,
        "success_rate": format!("{:.2}%", snap.success_rate()),
        "average_response_time_ms": format!("{:.2}", snap.average_response_time_ms),
        "last_success": snap.last_success,
        "last_failure": snap.last_failure,
        "last_error": snap.last_error,
    }))
}

#[get("/player")]
async fn get_player(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let nickname = match query.get("nick").map(|s| s.trim()) {
        Some(nick) if !nick.is_empty() => nick.to_string(),
        _ => {
            return HttpResponse::BadRequest()
                .json(serde_json::json!({"error": "missing 'nick' query parameter"}));
        }
    };

    if let Some(cached) = data.cache.get(&nickname) {
        info!("serving {:?} from cache", nickname);
        data.metrics.record_cache_hit();
        return profile_response(cached);
    }

    let started = Instant::now();
    let service = data.service.clone();
    let fetch_nick = nickname.clone();
    let result = web::block(move || service.fetch_profile(&fetch_nick)).await;

    match result {
        Ok(Ok(profile)) => {
            match profile.code {
                200 => data.metrics.record_success(started.elapsed()),
                404 => data.metrics.record_not_found(started.elapsed()),
                _ => data
                    .metrics
                    .record_failure(format!("extraction failed for {:?}", nickname), false),
            }
            data.cache.store(&nickname, &profile);
            profile_response(profile)
        }
        Ok(Err(e @ ServiceError::ChallengeFailed { .. })) => {
            data.metrics.record_failure(e.to_string(), true);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "code": 503,
                "message": "Service Unavailable",
                "tip": "The anti-bot challenge did not clear. Please try again later."
            }))
        }
        Ok(Err(e)) => {
            error!("profile fetch failed: {}", e);
            data.metrics.record_failure(e.to_string(), false);
            profile_response(PlayerProfile::internal_error())
        }
        Err(e) => {
            error!("blocking task failed: {}", e);
            data.metrics.record_failure(e.to_string(), false);
            profile_response(PlayerProfile::internal_error())
        }
    }
}

fn profile_response(profile: PlayerProfile) -> HttpResponse {
    match profile.code {
        200 => HttpResponse::Ok().json(profile),
        404 => HttpResponse::NotFound().json(profile),
        _ => HttpResponse::InternalServerError().json(profile),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let config = Config::load();

    let browser = match BrowserManager::new(config.browser.to_browser_config()) {
        Ok(browser) => browser,
        Err(e) => {
            error!("failed to launch browser: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let data = web::Data::new(AppState {
        service: Arc::new(ProfileService::new(browser, &config.challenge)),
        cache: ProfileCache::new(config.cache.enabled, config.cache.ttl()),
        metrics: MetricsTracker::new(),
        config: config.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("listening on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .service(welcome)
            .service(favicon)
            .service(get_metrics)
            .service(get_player)
    })
    .bind(&addr)?
    .run()
    .await
}
