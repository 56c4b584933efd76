//! Single binary web server: the game ladder REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use game_ladder_web::{
    compute_player_stats, create_match, deactivate_player, find_match_by_id, find_player,
    leaderboard, list_all_matches, list_matches_for_player, list_players, list_recent_matches,
    register_player, update_profile, LadderError, MatchId, MatchRequest, PlayerId, ProfileUpdate,
    RegisterPlayer, Store,
};
use serde::Deserialize;

/// Shared store handle: one per process, cloned into each worker.
type AppState = Data<Store>;

/// Hard cap on page sizes for list endpoints.
const MAX_PAGE_SIZE: u32 = 50;

/// Hard cap for the recent-matches endpoint.
const MAX_RECENT: u32 = 20;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Query params: page (1-based) and page size, both optional.
#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

impl PageQuery {
    fn resolve(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(10).min(MAX_PAGE_SIZE);
        (page, limit)
    }
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<u32>,
}

/// Path segment: player id (e.g. /api/users/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Map a ladder error onto a status code: validation is the caller's fault,
/// missing players are 404, storage failures are server-side.
fn error_response(e: &LadderError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LadderError::PlayerNotFound(_) => HttpResponse::NotFound().json(body),
        LadderError::Storage(_) => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn not_found(message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": message }))
}

fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 30 {
        return Err("Username must be 3 to 30 characters");
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Username may contain only letters and digits");
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    if !email.contains('@') {
        return Err("Email must be a valid address");
    }
    Ok(())
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "game-ladder-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Register a new player (starts at the default rating with no games).
#[post("/api/users")]
async fn api_register_player(state: AppState, body: Json<RegisterPlayer>) -> HttpResponse {
    let req = RegisterPlayer {
        username: body.username.trim().to_string(),
        email: body.email.trim().to_string(),
        avatar: body.avatar.clone(),
    };
    if let Err(msg) = validate_username(&req.username) {
        return bad_request(msg);
    }
    if let Err(msg) = validate_email(&req.email) {
        return bad_request(msg);
    }
    match register_player(&state, &req) {
        Ok(player) => HttpResponse::Created().json(player),
        Err(e) => error_response(&e),
    }
}

/// List active players (paginated, id order).
#[get("/api/users")]
async fn api_list_players(state: AppState, query: Query<PageQuery>) -> HttpResponse {
    let (page, limit) = query.resolve();
    match list_players(&state, page, limit) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => error_response(&e),
    }
}

/// Top players by rating (players without games are excluded).
#[get("/api/users/leaderboard")]
async fn api_leaderboard(state: AppState, query: Query<LimitQuery>) -> HttpResponse {
    let limit = query.limit.unwrap_or(10).min(MAX_PAGE_SIZE);
    match leaderboard(&state, limit) {
        Ok(entries) => HttpResponse::Ok().json(entries),
        Err(e) => error_response(&e),
    }
}

/// A player's public profile (404 for unknown or deactivated players).
#[get("/api/users/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    match find_player(&state, path.id) {
        Ok(Some(player)) => HttpResponse::Ok().json(player),
        Ok(None) => not_found("Player not found"),
        Err(e) => error_response(&e),
    }
}

/// Edit identity fields. Rating and game counters are not editable here.
#[put("/api/users/{id}")]
async fn api_update_player(state: AppState, path: Path<PlayerPath>, body: Json<ProfileUpdate>) -> HttpResponse {
    if let Some(username) = &body.username {
        if let Err(msg) = validate_username(username.trim()) {
            return bad_request(msg);
        }
    }
    if let Some(email) = &body.email {
        if let Err(msg) = validate_email(email.trim()) {
            return bad_request(msg);
        }
    }
    let update = ProfileUpdate {
        username: body.username.as_ref().map(|u| u.trim().to_string()),
        email: body.email.as_ref().map(|e| e.trim().to_string()),
        avatar: body.avatar.clone(),
    };
    match update_profile(&state, path.id, &update) {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Deactivate (soft-delete) a player. Match history keeps referencing them.
#[delete("/api/users/{id}")]
async fn api_deactivate_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    match deactivate_player(&state, path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "message": "Player deactivated" })),
        Err(e) => error_response(&e),
    }
}

/// Matches where the player appears on either side, most recent first.
#[get("/api/users/{id}/matches")]
async fn api_player_matches(state: AppState, path: Path<PlayerPath>, query: Query<PageQuery>) -> HttpResponse {
    match find_player(&state, path.id) {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Player not found"),
        Err(e) => return error_response(&e),
    }
    let (page, limit) = query.resolve();
    match list_matches_for_player(&state, path.id, page, limit) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// Aggregate match stats for a player (all zeroes when they have no matches).
#[get("/api/users/{id}/stats")]
async fn api_player_stats(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let player = match find_player(&state, path.id) {
        Ok(Some(player)) => player,
        Ok(None) => return not_found("Player not found"),
        Err(e) => return error_response(&e),
    };
    match compute_player_stats(&state, path.id) {
        Ok(stats) => HttpResponse::Ok().json(serde_json::json!({
            "user": {
                "id": player.id,
                "username": player.username,
                "avatar": player.avatar,
                "current_rating": player.rating,
            },
            "stats": stats,
        })),
        Err(e) => error_response(&e),
    }
}

/// Record a finished match: one match row plus both rating updates, atomically.
#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<MatchRequest>) -> HttpResponse {
    if let Some(notes) = &body.notes {
        if notes.chars().count() > 500 {
            return bad_request("Notes may be at most 500 characters");
        }
    }
    if body.game_duration == Some(0) {
        return bad_request("Game duration must be positive");
    }
    match create_match(&state, &body) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => error_response(&e),
    }
}

/// All matches, most recent first (paginated).
#[get("/api/matches")]
async fn api_list_matches(state: AppState, query: Query<PageQuery>) -> HttpResponse {
    let (page, limit) = query.resolve();
    match list_all_matches(&state, page, limit) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// The latest matches (for a dashboard).
#[get("/api/matches/recent")]
async fn api_recent_matches(state: AppState, query: Query<LimitQuery>) -> HttpResponse {
    let limit = query.limit.unwrap_or(5).min(MAX_RECENT);
    match list_recent_matches(&state, limit) {
        Ok(matches) => HttpResponse::Ok().json(matches),
        Err(e) => error_response(&e),
    }
}

/// One match by id, joined with player display fields.
#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match find_match_by_id(&state, path.id) {
        Ok(Some(details)) => HttpResponse::Ok().json(details),
        Ok(None) => not_found("Match not found"),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(Store::new());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_register_player)
            .service(api_list_players)
            // Fixed segments before `{id}` routes: actix matches in
            // registration order.
            .service(api_leaderboard)
            .service(api_get_player)
            .service(api_update_player)
            .service(api_deactivate_player)
            .service(api_player_matches)
            .service(api_player_stats)
            .service(api_create_match)
            .service(api_recent_matches)
            .service(api_list_matches)
            .service(api_get_match)
    })
    .bind(bind)?
    .run()
    .await
}
