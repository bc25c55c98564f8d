//! Single binary JSON API over the bracket engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Tournament rules come from MIN_PLAYERS, MAX_PLAYERS, MATCH_LENGTH, FINAL_LENGTH.

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use elimination_bracket::{
    ChannelBroadcaster, CreditsConfig, Engine, EngineError, MemoryStore, Person, PersonId,
    PlayerRound, Round, Store, StoreError, TournamentConfig, TournamentId,
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

type AppEngine = Engine<MemoryStore, ChannelBroadcaster>;
type AppState = Data<AppEngine>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    scheduled: Option<DateTime<Utc>>,
    #[serde(default)]
    actor: Option<PersonId>,
}

/// Optional acting person for audit trails.
#[derive(Deserialize)]
struct ActorBody {
    #[serde(default)]
    actor: Option<PersonId>,
}

#[derive(Deserialize)]
struct JoinBody {
    person_id: PersonId,
}

#[derive(Deserialize)]
struct CastersBody {
    casters: Vec<PersonId>,
}

#[derive(Deserialize)]
struct TimeBody {
    minutes: i64,
    #[serde(default)]
    actor: Option<PersonId>,
}

#[derive(Deserialize)]
struct CommitBody {
    state: Vec<PlayerRound>,
}

#[derive(Deserialize)]
struct BackfillBody {
    ids: Vec<PersonId>,
    #[serde(default)]
    actor: Option<PersonId>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and person id
#[derive(Deserialize)]
struct TournamentPersonPath {
    id: TournamentId,
    person_id: PersonId,
}

/// Path segments: tournament id and match index
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    index: usize,
}

fn error_response(e: EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        EngineError::UnknownTournament(_) | EngineError::Store(StoreError::NotFound(_)) => {
            HttpResponse::NotFound().json(body)
        }
        EngineError::Store(_) => {
            log::error!("Store failure: {}", body);
            HttpResponse::InternalServerError().json(body)
        }
        EngineError::Tournament(_) => HttpResponse::BadRequest().json(body),
    }
}

fn respond(state: &AppEngine, id: TournamentId, result: Result<(), EngineError>) -> HttpResponse {
    match result.and_then(|()| state.tournament(id)) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

fn actor(state: &AppEngine, id: Option<&str>) -> Option<Person> {
    let id = id?;
    match state.person(id) {
        Ok(p) => Some(p),
        Err(e) => {
            log::warn!("Unknown actor {}: {}", id, e);
            None
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "elimination-bracket",
    })
}

/// Register or update a person (identity provider glue).
#[put("/api/people")]
async fn api_save_person(state: AppState, body: Json<Person>) -> HttpResponse {
    match state.store().save_person(&body) {
        Ok(()) => HttpResponse::Ok().json(body.into_inner()),
        Err(e) => error_response(e.into()),
    }
}

/// Statistics and global rank for everyone.
#[get("/api/people/snapshot")]
async fn api_snapshot(state: AppState) -> HttpResponse {
    match state.snapshot() {
        Ok(s) => HttpResponse::Ok().json(s),
        Err(e) => error_response(e),
    }
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let who = actor(&state, body.actor.as_deref());
    match state.create_tournament(&body.name, body.scheduled, who.as_ref()) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// All tournaments, earliest scheduled first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.tournaments())
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(&state, path.id, Ok(()))
}

/// Replace a tournament with an edited copy.
#[put("/api/tournaments/{id}")]
async fn api_overwrite_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<elimination_bracket::Tournament>,
) -> HttpResponse {
    let mut t = body.into_inner();
    t.id = path.id;
    respond(&state, path.id, state.overwrite_tournament(t))
}

#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<JoinBody>) -> HttpResponse {
    let result = state.add_player(path.id, &body.person_id, &mut rand::thread_rng());
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/players/{person_id}/toggle")]
async fn api_toggle_player(state: AppState, path: Path<TournamentPersonPath>) -> HttpResponse {
    let result = state.toggle_player(path.id, &path.person_id, &mut rand::thread_rng());
    respond(&state, path.id, result)
}

#[put("/api/tournaments/{id}/casters")]
async fn api_set_casters(state: AppState, path: Path<TournamentPath>, body: Json<CastersBody>) -> HttpResponse {
    let result = state.set_casters(path.id, body.into_inner().casters);
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<ActorBody>>,
) -> HttpResponse {
    let who = actor(&state, body.as_ref().and_then(|b| b.actor.as_deref()));
    let result = state.start_tournament(path.id, &mut rand::thread_rng(), who.as_ref());
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/reshuffle")]
async fn api_reshuffle(state: AppState, path: Path<TournamentPath>, body: Option<Json<ActorBody>>) -> HttpResponse {
    let who = actor(&state, body.as_ref().and_then(|b| b.actor.as_deref()));
    let result = state.reshuffle(path.id, &mut rand::thread_rng(), who.as_ref());
    respond(&state, path.id, result)
}

#[get("/api/tournaments/{id}/runnerups")]
async fn api_runnerups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.runnerups(path.id) {
        Ok(ps) => HttpResponse::Ok().json(ps),
        Err(e) => error_response(e),
    }
}

#[post("/api/tournaments/{id}/backfill")]
async fn api_backfill_semis(state: AppState, path: Path<TournamentPath>, body: Json<BackfillBody>) -> HttpResponse {
    let who = actor(&state, body.actor.as_deref());
    let result = state.backfill_semis(path.id, &body.ids, &mut rand::thread_rng(), who.as_ref());
    respond(&state, path.id, result)
}

#[get("/api/tournaments/{id}/credits")]
async fn api_credits(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.credits(path.id) {
        Ok(c) => HttpResponse::Ok().json(c),
        Err(e) => error_response(e),
    }
}

#[put("/api/tournaments/{id}/matches/{index}/time")]
async fn api_set_match_time(state: AppState, path: Path<MatchPath>, body: Json<TimeBody>) -> HttpResponse {
    let who = actor(&state, body.actor.as_deref());
    let result = state.set_match_time(path.id, path.index, body.minutes, who.as_ref());
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/matches/{index}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>, body: Option<Json<ActorBody>>) -> HttpResponse {
    let who = actor(&state, body.as_ref().and_then(|b| b.actor.as_deref()));
    let result = state.start_match(path.id, path.index, who.as_ref());
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/matches/{index}/commit")]
async fn api_commit_round(state: AppState, path: Path<MatchPath>, body: Json<CommitBody>) -> HttpResponse {
    let round = Round::new(&body.state);
    let result = state.commit_round(path.id, path.index, round);
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/matches/{index}/end")]
async fn api_end_match(state: AppState, path: Path<MatchPath>, body: Option<Json<ActorBody>>) -> HttpResponse {
    let who = actor(&state, body.as_ref().and_then(|b| b.actor.as_deref()));
    let result = state.end_match(path.id, path.index, &mut rand::thread_rng(), who.as_ref());
    respond(&state, path.id, result)
}

#[post("/api/tournaments/{id}/matches/{index}/reset")]
async fn api_reset_match(state: AppState, path: Path<MatchPath>, body: Option<Json<ActorBody>>) -> HttpResponse {
    let who = actor(&state, body.as_ref().and_then(|b| b.actor.as_deref()));
    let result = state.reset_match(path.id, path.index, who.as_ref());
    respond(&state, path.id, result)
}

/// Simulate the match to its end.
#[post("/api/tournaments/{id}/matches/{index}/autoplay")]
async fn api_autoplay_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let result = state.autoplay_match(path.id, path.index, &mut rand::thread_rng());
    respond(&state, path.id, result)
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

    let broadcaster = ChannelBroadcaster::new(64);
    let mut updates = broadcaster.subscribe();
    let engine = Engine::new(
        MemoryStore::new(),
        broadcaster,
        TournamentConfig::from_env(),
        CreditsConfig::from_env(),
    );
    let state = Data::new(engine);

    // Stand-in for the live transport: trace every update that goes out.
    actix_web::rt::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(u) => log::debug!("Update: {}", u.topic),
                Err(RecvError::Lagged(n)) => log::warn!("Update listener lagged by {} messages", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_save_person)
            .service(api_snapshot)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_overwrite_tournament)
            .service(api_add_player)
            .service(api_toggle_player)
            .service(api_set_casters)
            .service(api_start_tournament)
            .service(api_reshuffle)
            .service(api_runnerups)
            .service(api_backfill_semis)
            .service(api_credits)
            .service(api_set_match_time)
            .service(api_start_match)
            .service(api_commit_round)
            .service(api_end_match)
            .service(api_reset_match)
            .service(api_autoplay_match)
    })
    .bind(bind)?
    .run()
    .await
}
