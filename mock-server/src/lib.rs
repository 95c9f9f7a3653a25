use std::{cmp::Ordering, collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Karango {
    #[serde(default)]
    pub id: Option<i64>,
    pub marca: String,
    pub modelo: String,
    pub cor: String,
    pub ano_fabricacao: i32,
    pub importado: String,
    pub placa: String,
    pub preco: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cliente {
    #[serde(default)]
    pub id: Option<i64>,
    pub nome: String,
    pub cpf: String,
    pub rg: String,
    pub logradouro: String,
    pub num_imovel: Value,
    #[serde(default)]
    pub complemento: Option<String>,
    pub bairro: String,
    pub municipio: String,
    pub uf: String,
    pub telefone: String,
    pub email: String,
}

/// One collection of the API, keyed by server-assigned id.
pub trait Row: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn set_id(&mut self, id: i64);

    fn rows(store: &Store) -> &BTreeMap<i64, Self>;

    fn table(store: &mut Store) -> &mut BTreeMap<i64, Self>;
}

impl Row for Karango {
    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn rows(store: &Store) -> &BTreeMap<i64, Self> {
        &store.karangos
    }

    fn table(store: &mut Store) -> &mut BTreeMap<i64, Self> {
        &mut store.karangos
    }
}

impl Row for Cliente {
    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn rows(store: &Store) -> &BTreeMap<i64, Self> {
        &store.clientes
    }

    fn table(store: &mut Store) -> &mut BTreeMap<i64, Self> {
        &mut store.clientes
    }
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    karangos: BTreeMap<i64, Karango>,
    clientes: BTreeMap<i64, Cliente>,
}

impl Store {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    by: Option<String>,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/karangos", get(list::<Karango>).post(create::<Karango>))
        .route(
            "/karangos/{id}",
            get(fetch::<Karango>).put(update::<Karango>).delete(remove::<Karango>),
        )
        .route("/clientes", get(list::<Cliente>).post(create::<Cliente>))
        .route(
            "/clientes/{id}",
            get(fetch::<Cliente>).put(update::<Cliente>).delete(remove::<Cliente>),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list<T: Row>(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Value>> {
    let store = db.read().await;
    let mut rows: Vec<Value> = T::rows(&store)
        .values()
        .filter_map(|row| serde_json::to_value(row).ok())
        .collect();
    if let Some(by) = params.by {
        let keys: Vec<&str> = by.split(',').map(str::trim).filter(|k| !k.is_empty()).collect();
        sort_rows(&mut rows, &keys);
    }
    Json(rows)
}

async fn create<T: Row>(State(db): State<Db>, Json(mut input): Json<T>) -> (StatusCode, Json<T>) {
    let mut store = db.write().await;
    let id = store.allocate_id();
    input.set_id(id);
    T::table(&mut store).insert(id, input.clone());
    tracing::debug!(id, "created");
    (StatusCode::CREATED, Json(input))
}

async fn fetch<T: Row>(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<T>, StatusCode> {
    let store = db.read().await;
    T::rows(&store).get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update<T: Row>(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(mut input): Json<T>,
) -> Result<Json<T>, StatusCode> {
    let mut store = db.write().await;
    let row = T::table(&mut store).get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    input.set_id(id);
    *row = input.clone();
    Ok(Json(input))
}

async fn remove<T: Row>(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    T::table(&mut store)
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Sort by each key in turn, then by id.
fn sort_rows(rows: &mut [Value], keys: &[&str]) {
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|k| compare(&a[*k], &b[*k]))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| compare(&a["id"], &b["id"]))
    });
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => a.to_string().cmp(&b.to_string()),
    }
}
