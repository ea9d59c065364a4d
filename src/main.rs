mod amenities;
mod config;
mod error;
mod jobs;
mod nominatim;
mod ors;
mod overpass;
mod ratelimit;
mod store;
mod survey;

#[cfg(test)]
mod test_utils;

use std::env;
use std::path::Path;

use actix_web::{
    get, http::header::ContentType, middleware::Logger, web, App, HttpResponse, HttpServer,
    Responder,
};
use serde::Deserialize;
use serde_json::json;
use tokio::select;

use crate::amenities::WalkSettings;
use crate::config::Config;
use crate::error::StrollResult;
use crate::jobs::{AggregationJob, JobQueue, JobWorker};
use crate::nominatim::client::{Geocoder, NominatimClient};
use crate::ors::entities::{RouteResponse, TravelMode};
use crate::ors::{OrsClient, Router};
use crate::overpass::client::{AmenitySource, OverpassClient};
use crate::ratelimit::RateLimiter;
use crate::store::ResultStore;
use crate::survey::{SurveyFixture, SurveyRow};

#[derive(Clone)]
pub struct ContextData {
    geocoder: NominatimClient,
    overpass: OverpassClient,
    router: OrsClient,
    store: ResultStore,
    jobs: JobQueue,
    survey: SurveyFixture,
    survey_settings: WalkSettings,
    config: Config,
}

impl ContextData {
    /// Builds the shared state along with the worker that drains its job queue
    pub fn new(config: Config) -> StrollResult<(ContextData, JobWorker)> {
        let limiter = RateLimiter::new(config.geocode_min_delay);
        let geocoder =
            NominatimClient::new(&config.nominatim_url, &config.nominatim_user_agent, limiter)?;
        let overpass = OverpassClient::new(&config.overpass_url)?;
        let router = OrsClient::new(&config.ors_url, config.ors_api_key.as_deref())?;

        let survey = match &config.survey_file {
            Some(path) => {
                log::info!("Loading survey fixture from {}", path.display());
                SurveyFixture::load(path)?
            }
            None => SurveyFixture::default(),
        };

        let (jobs, worker) = JobQueue::channel(config.job_queue_capacity);

        let ctx = ContextData {
            geocoder,
            overpass,
            router,
            store: ResultStore::new(&config.result_path),
            jobs,
            survey,
            survey_settings: config.survey_settings()?,
            config,
        };
        Ok((ctx, worker))
    }
}

#[derive(Deserialize)]
struct RouteQuery {
    departure: String,
    destination: String,
    profile: Option<String>,
}

#[derive(Deserialize)]
struct BusinessesQuery {
    address: String,
    radius: Option<u32>,
}

#[get("/ok")]
async fn ok() -> StrollResult<impl Responder> {
    Ok(HttpResponse::Ok().finish())
}

async fn find_route<G: Geocoder, R: Router>(
    geocoder: &G,
    router: &R,
    query: &RouteQuery,
) -> StrollResult<RouteResponse> {
    let mode = match &query.profile {
        Some(profile) => profile.parse::<TravelMode>()?,
        None => TravelMode::FootWalking,
    };

    let departure = geocoder.geocode(&query.departure).await?;
    let destination = geocoder.geocode(&query.destination).await?;

    Ok(router.route(departure, destination, mode).await?)
}

/// Looks up the amenities around the address and hands them to the worker
async fn queue_businesses<G: Geocoder, A: AmenitySource>(
    geocoder: &G,
    source: &A,
    jobs: &JobQueue,
    query: &BusinessesQuery,
    default_radius: u32,
) -> StrollResult<serde_json::Value> {
    let radius = query.radius.unwrap_or(default_radius);

    let origin = geocoder.geocode(&query.address).await?;
    let elements = source.get_data(origin.y(), origin.x(), radius).await?;

    let handle = jobs.submit(AggregationJob { origin, elements })?;

    Ok(json!({
        "message": "Processing location in the background",
        "job_id": handle.id,
    }))
}

async fn survey_transport<R: Router>(
    router: &R,
    fixture: &SurveyFixture,
    settings: &WalkSettings,
    csv_path: &Path,
) -> StrollResult<Vec<SurveyRow>> {
    let rows = survey::distance_to_transport(router, fixture, settings).await?;
    survey::write_csv(csv_path, &rows)?;
    Ok(rows)
}

#[get("/route")]
async fn get_route(
    query: web::Query<RouteQuery>,
    ctx: web::Data<ContextData>,
) -> StrollResult<impl Responder> {
    let route = find_route(&ctx.geocoder, &ctx.router, &query).await?;
    Ok(web::Json(route))
}

#[get("/businesses")]
async fn get_businesses(
    query: web::Query<BusinessesQuery>,
    ctx: web::Data<ContextData>,
) -> StrollResult<impl Responder> {
    let response = queue_businesses(
        &ctx.geocoder,
        &ctx.overpass,
        &ctx.jobs,
        &query,
        ctx.config.search_radius_metres,
    )
    .await?;
    Ok(web::Json(response))
}

#[get("/distance_to_transport")]
async fn get_distance_to_transport(ctx: web::Data<ContextData>) -> StrollResult<impl Responder> {
    let rows = survey_transport(
        &ctx.router,
        &ctx.survey,
        &ctx.survey_settings,
        &ctx.config.survey_csv_path,
    )
    .await?;
    Ok(web::Json(rows))
}

#[get("/result")]
async fn get_result(ctx: web::Data<ContextData>) -> StrollResult<impl Responder> {
    let stored = ctx.store.get().await?;

    let response = HttpResponse::Ok()
        .content_type(ContentType::json())
        .insert_header(("X-Result-Version", stored.version.to_string()))
        .body(stored.body);
    Ok(response)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ok)
        .service(get_route)
        .service(get_businesses)
        .service(get_distance_to_transport)
        .service(get_result);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::try_init().ok();

    log::debug!("Debug logging enabled");

    dotenvy::from_filename(".env").ok();

    let config = Config::from_env()?;
    let walk_settings = config.walk_settings()?;
    let listen_address = config.listen_address.clone();
    let allow_origin = config.allow_origin.clone();

    let (ctx, worker) = ContextData::new(config)?;
    log::info!("Aggregation results go to {}", ctx.store.path().display());

    let jobs = worker.run(ctx.router.clone(), ctx.store.clone(), walk_settings);

    log::info!("Starting server at {}", listen_address);

    let server = HttpServer::new(move || {
        let logger = Logger::default();

        let mut cors = actix_cors::Cors::default()
            .allowed_methods(vec!["GET"])
            .allowed_headers(vec!["accept"]);

        if let Some(allowed_origin) = &allow_origin {
            if allowed_origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(allowed_origin);
            }
        }

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(web::Data::new(ctx.clone()))
            .configure(configure)
    })
    .bind(listen_address)?
    .run();

    select! {
        res = server => {
            log::info!("Server stopped");
            res?;
            Ok::<_, std::io::Error>(())
        },
        _ = jobs => {
            log::info!("Aggregation worker stopped");
            Ok(())
        }
    }?;

    Ok(())
}
