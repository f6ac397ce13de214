//! # API Router Configuration
//!
//! Configures the API routes of the Prism service. Every route runs behind the
//! request context middleware; the wrappers below only extract and parse, then
//! call into [`crate::handlers`].

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension,
        Path,
        Query,
        State as AxumState,
    },
    middleware,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post, put},
    Json,
    Router,
};
use error::{AppError, PaginatedResponse, Result};
use evaluation::{RequestContext, RuleOutcome};
use futures::Stream;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    dto::{
        clusters::{ClusterResponse, CreateClusterRequest, UpdateClusterRequest},
        feedbacks::{
            AssignedFeedbackResponse,
            EventStreamQuery,
            FeedbackFilter,
            FeedbackResponse,
            RespondFeedbackRequest,
        },
        initiatives::{CreateInitiativeRequest, InitiativeFilter, InitiativeResponse, UpdateInitiativeRequest},
        levels::{CreateLevelRequest, LevelResponse, UpdateLevelRequest},
        processes::{CreateProcessRequest, ProcessResponse, UpdateProcessRequest},
        questions::{CreateQuestionRequest, QuestionFilter, QuestionResponse, UpdateQuestionRequest},
        results::{ReceiverReportResponse, SessionResultsResponse},
        rules::{CreateRuleRequest, RuleResponse, UpdateRuleRequest},
        sessions::{
            CreateSessionRequest,
            DuplicatesResponse,
            RemoveDuplicatesResponse,
            SessionFilter,
            SessionResponse,
            UpdateSessionRequest,
        },
        teams::{AddTeamMemberRequest, AssignClusterRequest, CreateTeamRequest, TeamResponse, UpdateTeamRequest},
        users::{CreateUserRequest, UpdateUserRequest, UserFilter, UserResponse},
        ListQuery,
        ReplaceIdsRequest,
    },
    handlers::{self, ApiResult},
    middleware::context_middleware,
    utils::parse_id,
    AppState,
};

/// JSON body whose rejection is reported in the standard error envelope
type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
/// Query string whose rejection is reported in the standard error envelope
type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;

/// Creates the API router with all routes
///
/// # Arguments
///
/// * `state` - Application state containing the DB pool and event bus
///
/// # Returns
///
/// Router serving every `/api/v1` route
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/me", get(me))
        .merge(directory_routes())
        .merge(session_routes())
        .merge(feedback_routes())
        .with_state(state)
}

fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route(
            "/api/v1/users/:id/processes",
            get(list_user_processes).put(replace_user_processes),
        )
        .route("/api/v1/teams", get(list_teams).post(create_team))
        .route(
            "/api/v1/teams/:id",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/api/v1/teams/:id/members", post(add_team_member))
        .route(
            "/api/v1/teams/:id/members/:user_id",
            axum::routing::delete(remove_team_member),
        )
        .route("/api/v1/teams/:id/cluster", put(assign_team_cluster))
        .route("/api/v1/clusters", get(list_clusters).post(create_cluster))
        .route(
            "/api/v1/clusters/:id",
            get(get_cluster).put(update_cluster).delete(delete_cluster),
        )
        .route("/api/v1/levels", get(list_levels).post(create_level))
        .route(
            "/api/v1/levels/:id",
            get(get_level).put(update_level).delete(delete_level),
        )
        .route("/api/v1/questions", get(list_questions).post(create_question))
        .route(
            "/api/v1/questions/:id",
            get(get_question).put(update_question).delete(delete_question),
        )
        .route("/api/v1/processes", get(list_processes).post(create_process))
        .route(
            "/api/v1/processes/:id",
            get(get_process).put(update_process).delete(delete_process),
        )
        .route("/api/v1/rules", get(list_rules).post(create_rule))
        .route(
            "/api/v1/rules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
}

fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/v1/sessions/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/api/v1/sessions/:id/clusters", put(replace_session_clusters))
        .route("/api/v1/sessions/:id/rules", put(replace_session_rules))
        .route("/api/v1/sessions/:id/rules/:number/generate", post(generate_rule))
        .route("/api/v1/sessions/:id/start", post(start_session))
        .route("/api/v1/sessions/:id/conclude", post(conclude_session))
        .route(
            "/api/v1/sessions/:id/duplicates",
            get(list_duplicates).delete(remove_duplicates),
        )
        .route("/api/v1/sessions/:id/results", get(session_results))
        .route("/api/v1/sessions/:id/results/:receiver_id", get(receiver_report))
        .route(
            "/api/v1/sessions/:id/initiatives",
            get(list_initiatives).post(create_initiative),
        )
        .route(
            "/api/v1/initiatives/:id",
            get(get_initiative).put(update_initiative).delete(delete_initiative),
        )
}

fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sessions/:id/feedbacks", get(list_session_feedbacks))
        .route("/api/v1/sessions/:id/feedbacks/mine", get(list_my_feedbacks))
        .route("/api/v1/sessions/:id/feedbacks/events", get(feedback_events))
        .route("/api/v1/feedbacks/:id", put(respond_feedback))
}

async fn me(AxumState(state): AxumState<AppState>, Extension(ctx): Extension<RequestContext>) -> ApiResult<UserResponse> {
    handlers::users::get_me_handler(&state, ctx).await
}

// Users

async fn create_user(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let Json(req) = body?;
    handlers::users::create_user_handler(&state, ctx, req).await
}

async fn get_user(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<UserResponse> {
    handlers::users::get_user_handler(&state, ctx, parse_id(&id, "user")?).await
}

async fn list_users(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
    filter: QueryParams<UserFilter>,
) -> ApiResult<PaginatedResponse<UserResponse>> {
    let (Query(query), Query(filter)) = (query?, filter?);
    handlers::users::list_users_handler(&state, ctx, query, filter).await
}

async fn update_user(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let Json(req) = body?;
    handlers::users::update_user_handler(&state, ctx, parse_id(&id, "user")?, req).await
}

async fn delete_user(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::users::delete_user_handler(&state, ctx, parse_id(&id, "user")?).await
}

async fn list_user_processes(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ProcessResponse>> {
    handlers::users::list_user_processes_handler(&state, ctx, parse_id(&id, "user")?).await
}

async fn replace_user_processes(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<ReplaceIdsRequest>,
) -> ApiResult<Vec<Uuid>> {
    let Json(req) = body?;
    handlers::users::replace_user_processes_handler(&state, ctx, parse_id(&id, "user")?, req).await
}

// Teams

async fn create_team(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateTeamRequest>,
) -> ApiResult<TeamResponse> {
    let Json(req) = body?;
    handlers::teams::create_team_handler(&state, ctx, req).await
}

async fn get_team(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<TeamResponse> {
    handlers::teams::get_team_handler(&state, ctx, parse_id(&id, "team")?).await
}

async fn list_teams(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
) -> ApiResult<PaginatedResponse<TeamResponse>> {
    let Query(query) = query?;
    handlers::teams::list_teams_handler(&state, ctx, query).await
}

async fn update_team(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateTeamRequest>,
) -> ApiResult<TeamResponse> {
    let Json(req) = body?;
    handlers::teams::update_team_handler(&state, ctx, parse_id(&id, "team")?, req).await
}

async fn delete_team(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::teams::delete_team_handler(&state, ctx, parse_id(&id, "team")?).await
}

async fn add_team_member(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<AddTeamMemberRequest>,
) -> ApiResult<Vec<Uuid>> {
    let Json(req) = body?;
    handlers::teams::add_team_member_handler(&state, ctx, parse_id(&id, "team")?, req).await
}

async fn remove_team_member(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, user_id)): Path<(String, String)>,
) -> ApiResult<Vec<Uuid>> {
    handlers::teams::remove_team_member_handler(
        &state,
        ctx,
        parse_id(&id, "team")?,
        parse_id(&user_id, "user")?,
    )
    .await
}

async fn assign_team_cluster(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<AssignClusterRequest>,
) -> ApiResult<TeamResponse> {
    let Json(req) = body?;
    handlers::teams::assign_cluster_handler(&state, ctx, parse_id(&id, "team")?, req).await
}

// Clusters

async fn create_cluster(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateClusterRequest>,
) -> ApiResult<ClusterResponse> {
    let Json(req) = body?;
    handlers::clusters::create_cluster_handler(&state, ctx, req).await
}

async fn get_cluster(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<ClusterResponse> {
    handlers::clusters::get_cluster_handler(&state, ctx, parse_id(&id, "cluster")?).await
}

async fn list_clusters(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
) -> ApiResult<PaginatedResponse<ClusterResponse>> {
    let Query(query) = query?;
    handlers::clusters::list_clusters_handler(&state, ctx, query).await
}

async fn update_cluster(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateClusterRequest>,
) -> ApiResult<ClusterResponse> {
    let Json(req) = body?;
    handlers::clusters::update_cluster_handler(&state, ctx, parse_id(&id, "cluster")?, req).await
}

async fn delete_cluster(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::clusters::delete_cluster_handler(&state, ctx, parse_id(&id, "cluster")?).await
}

// Levels

async fn create_level(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateLevelRequest>,
) -> ApiResult<LevelResponse> {
    let Json(req) = body?;
    handlers::levels::create_level_handler(&state, ctx, req).await
}

async fn get_level(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<LevelResponse> {
    handlers::levels::get_level_handler(&state, ctx, parse_id(&id, "level")?).await
}

async fn list_levels(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
) -> ApiResult<PaginatedResponse<LevelResponse>> {
    let Query(query) = query?;
    handlers::levels::list_levels_handler(&state, ctx, query).await
}

async fn update_level(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateLevelRequest>,
) -> ApiResult<LevelResponse> {
    let Json(req) = body?;
    handlers::levels::update_level_handler(&state, ctx, parse_id(&id, "level")?, req).await
}

async fn delete_level(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::levels::delete_level_handler(&state, ctx, parse_id(&id, "level")?).await
}

// Questions

async fn create_question(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateQuestionRequest>,
) -> ApiResult<QuestionResponse> {
    let Json(req) = body?;
    handlers::questions::create_question_handler(&state, ctx, req).await
}

async fn get_question(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<QuestionResponse> {
    handlers::questions::get_question_handler(&state, ctx, parse_id(&id, "question")?).await
}

async fn list_questions(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
    filter: QueryParams<QuestionFilter>,
) -> ApiResult<PaginatedResponse<QuestionResponse>> {
    let (Query(query), Query(filter)) = (query?, filter?);
    handlers::questions::list_questions_handler(&state, ctx, query, filter).await
}

async fn update_question(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateQuestionRequest>,
) -> ApiResult<QuestionResponse> {
    let Json(req) = body?;
    handlers::questions::update_question_handler(&state, ctx, parse_id(&id, "question")?, req).await
}

async fn delete_question(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::questions::delete_question_handler(&state, ctx, parse_id(&id, "question")?).await
}

// Processes

async fn create_process(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateProcessRequest>,
) -> ApiResult<ProcessResponse> {
    let Json(req) = body?;
    handlers::processes::create_process_handler(&state, ctx, req).await
}

async fn get_process(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<ProcessResponse> {
    handlers::processes::get_process_handler(&state, ctx, parse_id(&id, "process")?).await
}

async fn list_processes(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
) -> ApiResult<PaginatedResponse<ProcessResponse>> {
    let Query(query) = query?;
    handlers::processes::list_processes_handler(&state, ctx, query).await
}

async fn update_process(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateProcessRequest>,
) -> ApiResult<ProcessResponse> {
    let Json(req) = body?;
    handlers::processes::update_process_handler(&state, ctx, parse_id(&id, "process")?, req).await
}

async fn delete_process(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::processes::delete_process_handler(&state, ctx, parse_id(&id, "process")?).await
}

// Rules

async fn create_rule(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateRuleRequest>,
) -> ApiResult<RuleResponse> {
    let Json(req) = body?;
    handlers::rules::create_rule_handler(&state, ctx, req).await
}

async fn get_rule(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<RuleResponse> {
    handlers::rules::get_rule_handler(&state, ctx, parse_id(&id, "rule")?).await
}

async fn list_rules(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
) -> ApiResult<PaginatedResponse<RuleResponse>> {
    let Query(query) = query?;
    handlers::rules::list_rules_handler(&state, ctx, query).await
}

async fn update_rule(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateRuleRequest>,
) -> ApiResult<RuleResponse> {
    let Json(req) = body?;
    handlers::rules::update_rule_handler(&state, ctx, parse_id(&id, "rule")?, req).await
}

async fn delete_rule(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::rules::delete_rule_handler(&state, ctx, parse_id(&id, "rule")?).await
}

// Sessions

async fn create_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    body: JsonBody<CreateSessionRequest>,
) -> ApiResult<SessionResponse> {
    let Json(req) = body?;
    handlers::sessions::create_session_handler(&state, ctx, req).await
}

async fn get_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<SessionResponse> {
    handlers::sessions::get_session_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn list_sessions(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    query: QueryParams<ListQuery>,
    filter: QueryParams<SessionFilter>,
) -> ApiResult<PaginatedResponse<SessionResponse>> {
    let (Query(query), Query(filter)) = (query?, filter?);
    handlers::sessions::list_sessions_handler(&state, ctx, query, filter).await
}

async fn update_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateSessionRequest>,
) -> ApiResult<SessionResponse> {
    let Json(req) = body?;
    handlers::sessions::update_session_handler(&state, ctx, parse_id(&id, "session")?, req).await
}

async fn delete_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::sessions::delete_session_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn replace_session_clusters(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<ReplaceIdsRequest>,
) -> ApiResult<SessionResponse> {
    let Json(req) = body?;
    handlers::sessions::replace_session_clusters_handler(&state, ctx, parse_id(&id, "session")?, req).await
}

async fn replace_session_rules(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<ReplaceIdsRequest>,
) -> ApiResult<SessionResponse> {
    let Json(req) = body?;
    handlers::sessions::replace_session_rules_handler(&state, ctx, parse_id(&id, "session")?, req).await
}

async fn generate_rule(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, number)): Path<(String, String)>,
) -> ApiResult<RuleOutcome> {
    let session_id = parse_id(&id, "session")?;
    let number = number
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::validation(format!("Rule number must be an integer, got '{}'", number)))?;
    handlers::sessions::generate_rule_handler(&state, ctx, session_id, number).await
}

async fn start_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<SessionResponse> {
    handlers::sessions::start_session_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn conclude_session(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<SessionResponse> {
    handlers::sessions::conclude_session_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn list_duplicates(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<DuplicatesResponse> {
    handlers::sessions::list_duplicates_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn remove_duplicates(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<RemoveDuplicatesResponse> {
    handlers::sessions::remove_duplicates_handler(&state, ctx, parse_id(&id, "session")?).await
}

// Results

async fn session_results(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<SessionResultsResponse> {
    handlers::results::session_results_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn receiver_report(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, receiver_id)): Path<(String, String)>,
) -> ApiResult<ReceiverReportResponse> {
    handlers::results::receiver_report_handler(
        &state,
        ctx,
        parse_id(&id, "session")?,
        parse_id(&receiver_id, "user")?,
    )
    .await
}

// Initiatives

async fn create_initiative(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<CreateInitiativeRequest>,
) -> ApiResult<InitiativeResponse> {
    let Json(req) = body?;
    handlers::initiatives::create_initiative_handler(&state, ctx, parse_id(&id, "session")?, req).await
}

async fn list_initiatives(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    query: QueryParams<ListQuery>,
    filter: QueryParams<InitiativeFilter>,
) -> ApiResult<PaginatedResponse<InitiativeResponse>> {
    let (Query(query), Query(filter)) = (query?, filter?);
    handlers::initiatives::list_initiatives_handler(&state, ctx, parse_id(&id, "session")?, query, filter).await
}

async fn get_initiative(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<InitiativeResponse> {
    handlers::initiatives::get_initiative_handler(&state, ctx, parse_id(&id, "initiative")?).await
}

async fn update_initiative(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<UpdateInitiativeRequest>,
) -> ApiResult<InitiativeResponse> {
    let Json(req) = body?;
    handlers::initiatives::update_initiative_handler(&state, ctx, parse_id(&id, "initiative")?, req).await
}

async fn delete_initiative(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Uuid> {
    handlers::initiatives::delete_initiative_handler(&state, ctx, parse_id(&id, "initiative")?).await
}

// Feedbacks

async fn list_session_feedbacks(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    query: QueryParams<ListQuery>,
    filter: QueryParams<FeedbackFilter>,
) -> ApiResult<PaginatedResponse<FeedbackResponse>> {
    let (Query(query), Query(filter)) = (query?, filter?);
    handlers::feedbacks::list_session_feedbacks_handler(&state, ctx, parse_id(&id, "session")?, query, filter).await
}

async fn list_my_feedbacks(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> ApiResult<Vec<AssignedFeedbackResponse>> {
    handlers::feedbacks::list_my_feedbacks_handler(&state, ctx, parse_id(&id, "session")?).await
}

async fn respond_feedback(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: JsonBody<RespondFeedbackRequest>,
) -> ApiResult<FeedbackResponse> {
    let Json(req) = body?;
    handlers::feedbacks::respond_feedback_handler(&state, ctx, parse_id(&id, "feedback")?, req).await
}

/// Server-sent events for the feedback of a session
async fn feedback_events(
    AxumState(state): AxumState<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    query: QueryParams<EventStreamQuery>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, std::convert::Infallible>>>> {
    let Query(query) = query?;
    let filter = handlers::feedbacks::feedback_events_handler(&state, ctx, parse_id(&id, "session")?, query).await?;
    Ok(Sse::new(state.events.sse_stream(filter)).keep_alive(KeepAlive::default()))
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(AxumState(state): AxumState<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "event_subscribers": state.events.subscriber_count(),
    }))
}

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing the DB pool and event bus
///
/// # Returns
///
/// Main router with health checks and API routes, behind the request
/// context middleware
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state.clone()))
        .layer(middleware::from_fn_with_state(state, context_middleware))
}
