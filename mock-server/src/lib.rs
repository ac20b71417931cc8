use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Code and message the service sends when no user matches.
pub const USER_NOT_FOUND: (i64, &str) = (50, "User not found.");
pub const NO_LOOKUP_MATCHES: (i64, &str) = (17, "No user matches for specified terms.");
pub const BAD_AUTHENTICATION: (i64, &str) = (215, "Bad Authentication data.");
pub const MISSING_PARAMETER: (i64, &str) = (38, "user_id or screen_name parameter is missing.");
pub const INVALID_PARAMETER: (i64, &str) = (195, "Missing or invalid url parameter.");

const DEFAULT_SEARCH_COUNT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub id_str: String,
    pub name: String,
    pub screen_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub followers_count: u64,
    pub protected: bool,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

#[derive(Deserialize)]
pub struct ShowQuery {
    pub user_id: Option<u64>,
    pub screen_name: Option<String>,
    pub include_entities: Option<bool>,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub user_id: Option<String>,
    pub screen_name: Option<String>,
    pub include_entities: Option<bool>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
    pub count: Option<usize>,
    pub include_entities: Option<bool>,
}

pub type Db = Arc<Vec<User>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with_users(fixture_users())
}

pub fn app_with_users(users: Vec<User>) -> Router {
    let db: Db = Arc::new(users);
    Router::new()
        .route("/1.1/users/show.json", get(show_user))
        .route("/1.1/users/lookup.json", get(lookup_users))
        .route("/1.1/users/search.json", get(search_users))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Users served by [`app`]: `jack` (id 12), `twitterapi` (id 6253282) and
/// `TwitterDev` (id 2244994945).
pub fn fixture_users() -> Vec<User> {
    vec![
        User {
            id: 12,
            id_str: "12".to_string(),
            name: "jack".to_string(),
            screen_name: "jack".to_string(),
            description: Some("#bitcoin".to_string()),
            followers_count: 6_000_000,
            protected: false,
            verified: true,
            entities: Some(json!({
                "description": {"hashtags": [{"indices": [0, 8], "text": "bitcoin"}]}
            })),
            status: Some(json!({
                "id": 1_000_000_000_000_000_001u64,
                "text": "just setting up my twttr",
                "entities": {"hashtags": [], "urls": []}
            })),
        },
        User {
            id: 6253282,
            id_str: "6253282".to_string(),
            name: "Twitter API".to_string(),
            screen_name: "twitterapi".to_string(),
            description: Some("Tweets about changes to the Twitter API".to_string()),
            followers_count: 6_000,
            protected: false,
            verified: true,
            entities: Some(json!({
                "url": {"urls": [{"indices": [0, 22], "url": "http://t.co/78pYTvWfJd"}]},
                "description": {"urls": []}
            })),
            status: None,
        },
        User {
            id: 2244994945,
            id_str: "2244994945".to_string(),
            name: "Twitter Dev".to_string(),
            screen_name: "TwitterDev".to_string(),
            description: None,
            followers_count: 0,
            protected: false,
            verified: false,
            entities: None,
            status: None,
        },
    ]
}

fn api_error(status: StatusCode, (code, message): (i64, &str)) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({"errors": [{"code": code, "message": message}]})),
    )
}

fn render(user: &User, include_entities: Option<bool>) -> User {
    let mut user = user.clone();
    if include_entities == Some(false) {
        user.entities = None;
        if let Some(Value::Object(status)) = user.status.as_mut() {
            status.remove("entities");
        }
    }
    user
}

fn find_by_id(db: &Db, id: u64) -> Option<&User> {
    db.iter().find(|u| u.id == id)
}

fn find_by_screen_name<'a>(db: &'a Db, screen_name: &str) -> Option<&'a User> {
    db.iter()
        .find(|u| u.screen_name.eq_ignore_ascii_case(screen_name))
}

async fn show_user(State(db): State<Db>, Query(query): Query<ShowQuery>) -> ApiResult<User> {
    debug!("show user_id={:?} screen_name={:?}", query.user_id, query.screen_name);
    let user = match (query.user_id, query.screen_name.as_deref()) {
        (Some(id), _) => find_by_id(&db, id),
        (None, Some(screen_name)) => find_by_screen_name(&db, screen_name),
        (None, None) => return Err(api_error(StatusCode::BAD_REQUEST, MISSING_PARAMETER)),
    };
    user.map(|u| Json(render(u, query.include_entities)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, USER_NOT_FOUND))
}

async fn lookup_users(State(db): State<Db>, Query(query): Query<LookupQuery>) -> ApiResult<Vec<User>> {
    let ids = query.user_id.as_deref().unwrap_or_default();
    let names = query.screen_name.as_deref().unwrap_or_default();

    let mut found: Vec<User> = Vec::new();
    let by_id = ids
        .split(',')
        .filter_map(|id| id.trim().parse::<u64>().ok())
        .filter_map(|id| find_by_id(&db, id));
    let by_name = names
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .filter_map(|name| find_by_screen_name(&db, name.trim()));
    for user in by_id.chain(by_name) {
        if !found.iter().any(|f| f.id == user.id) {
            found.push(render(user, query.include_entities));
        }
    }

    if found.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, NO_LOOKUP_MATCHES));
    }
    Ok(Json(found))
}

async fn search_users(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<User>> {
    if !headers.contains_key(AUTHORIZATION) {
        return Err(api_error(StatusCode::UNAUTHORIZED, BAD_AUTHENTICATION));
    }

    let needle = query.q.unwrap_or_default().to_lowercase();
    let count = query.count.unwrap_or(DEFAULT_SEARCH_COUNT);
    let page = query.page.unwrap_or(1).max(1);
    let Some(offset) = (page - 1).checked_mul(count) else {
        return Err(api_error(StatusCode::BAD_REQUEST, INVALID_PARAMETER));
    };

    let users = db
        .iter()
        .filter(|u| {
            u.screen_name.to_lowercase().contains(&needle)
                || u.name.to_lowercase().contains(&needle)
        })
        .skip(offset)
        .take(count)
        .map(|u| render(u, query.include_entities))
        .collect();
    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_omits_absent_optional_fields() {
        let users = fixture_users();
        let dev = users.iter().find(|u| u.id == 2244994945).unwrap();
        let json = serde_json::to_value(dev).unwrap();
        assert_eq!(json["screen_name"], "TwitterDev");
        assert_eq!(json["followers_count"], 0);
        assert!(json.get("entities").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn render_strips_entities_only_when_disabled() {
        let users = fixture_users();
        let jack = &users[0];

        let kept = render(jack, None);
        assert!(kept.entities.is_some());
        assert!(kept.status.as_ref().unwrap().get("entities").is_some());

        let stripped = render(jack, Some(false));
        assert!(stripped.entities.is_none());
        assert!(stripped.status.as_ref().unwrap().get("entities").is_none());
        assert_eq!(stripped.status.as_ref().unwrap()["text"], "just setting up my twttr");
    }

    #[test]
    fn screen_name_lookup_ignores_case() {
        let db: Db = Arc::new(fixture_users());
        assert_eq!(find_by_screen_name(&db, "twitterdev").map(|u| u.id), Some(2244994945));
        assert!(find_by_screen_name(&db, "nobody").is_none());
    }

    #[test]
    fn api_error_body_shape() {
        let (status, Json(body)) = api_error(StatusCode::NOT_FOUND, USER_NOT_FOUND);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], 50);
        assert_eq!(body["errors"][0]["message"], "User not found.");
    }
}
