use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub user_id: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default = "default_user")]
    pub user_id: u64,
    #[serde(default)]
    pub completed: bool,
}

fn default_user() -> u64 {
    1
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// json-server style pagination: `_page` is 1-based, `_limit` is the page size.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "_page")]
    pub page: Option<u32>,
    #[serde(rename = "_limit")]
    pub limit: Option<u32>,
}

#[derive(Default)]
pub struct Store {
    todos: BTreeMap<u64, Todo>,
    next_id: u64,
}

impl Store {
    fn insert(&mut self, title: String, completed: bool, user_id: u64) -> Todo {
        self.next_id += 1;
        let todo = Todo {
            id: self.next_id,
            title,
            completed,
            user_id,
        };
        self.todos.insert(todo.id, todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<Store>>;

/// `count` todos titled "Todo 1".."Todo {count}", all open, owned by user 1.
pub fn seed_todos(count: u64) -> Vec<Todo> {
    (1..=count)
        .map(|id| Todo {
            id,
            title: format!("Todo {id}"),
            completed: false,
            user_id: 1,
        })
        .collect()
}

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router preloaded with `todos`. New ids continue after the largest seeded id.
pub fn app_with(todos: Vec<Todo>) -> Router {
    let next_id = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
    let store = Store {
        todos: todos.into_iter().map(|todo| (todo.id, todo)).collect(),
        next_id,
    };
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).patch(update_todo).delete(delete_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Vec::new()).await
}

pub async fn run_with(listener: TcpListener, todos: Vec<Todo>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(todos)).await
}

async fn list_todos(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> ([(HeaderName, String); 1], Json<Vec<Todo>>) {
    let store = db.read().await;
    let total = store.todos.len();
    let items = match params.limit {
        Some(limit) => {
            let page = params.page.unwrap_or(1).max(1);
            let skip = (page as usize - 1) * limit as usize;
            store.todos.values().skip(skip).take(limit as usize).cloned().collect()
        }
        None => store.todos.values().cloned().collect(),
    };
    ([(TOTAL_COUNT, total.to_string())], Json(items))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = db
        .write()
        .await
        .insert(input.title, input.completed, input.user_id);
    tracing::info!(id = todo.id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Todo>, StatusCode> {
    let store = db.read().await;
    store.todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, StatusCode> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.todos.remove(&id).map(|_| StatusCode::OK).ok_or(StatusCode::NOT_FOUND)
}
