use anyhow::{Context, Result, bail};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use nutriscan_core::models::{Food, FoodUpdate, NewFood, SEARCH_LIMIT};
use nutriscan_core::repository::FoodRepository;

use crate::config::RemoteConfig;

const TABLE: &str = "alimentos";
const SEARCH_COLUMNS: &str =
    "id,nombre,codigo,calorias,proteinas,carbohidratos,grasas,azucares,fibra,sodio,imagen_url,created_at";

/// PostgREST client for the hosted `alimentos` table.
pub struct SupabaseClient {
    client: reqwest::Client,
    table_url: String,
    rt: tokio::runtime::Handle,
}

impl SupabaseClient {
    /// `rt` drives the blocking [`FoodRepository`] calls; it must not be the
    /// runtime of the calling thread.
    pub fn new(remote: &RemoteConfig, rt: tokio::runtime::Handle) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&remote.api_key).context("Invalid Supabase API key")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", remote.api_key))
                .context("Invalid Supabase API key")?,
        );

        let client = reqwest::Client::builder()
            .user_agent(format!(
                "nutriscan-cli/{} (food scanner)",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            table_url: format!("{}/rest/v1/{TABLE}", remote.url.trim_end_matches('/')),
            rt,
        })
    }

    pub async fn search_foods_async(&self, query: &str) -> Result<Vec<Food>> {
        let term = strip_wildcards(query);
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let name_filter = format!("ilike.*{term}*");
        let limit = SEARCH_LIMIT.to_string();

        let resp = self
            .client
            .get(&self.table_url)
            .query(&[
                ("select", SEARCH_COLUMNS),
                ("nombre", name_filter.as_str()),
                ("order", "nombre.asc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach the food database")?
            .error_for_status()
            .context("Food search was rejected")?;

        let rows: Vec<serde_json::Value> = resp
            .json()
            .await
            .context("Failed to parse food search response")?;
        let foods = decode_rows(rows);
        debug!(query, results = foods.len(), "searched foods");
        Ok(foods)
    }

    pub async fn get_food_by_barcode_async(&self, barcode: &str) -> Result<Option<Food>> {
        let code_filter = format!("eq.{barcode}");
        let resp = self
            .client
            .get(&self.table_url)
            .query(&[("select", "*"), ("codigo", code_filter.as_str()), ("limit", "1")])
            .send()
            .await
            .context("Failed to reach the food database")?
            .error_for_status()
            .context("Barcode lookup was rejected")?;

        let rows: Vec<serde_json::Value> = resp
            .json()
            .await
            .context("Failed to parse barcode lookup response")?;
        Ok(decode_rows(rows).into_iter().next())
    }

    pub async fn add_food_async(&self, food: &NewFood) -> Result<Food> {
        let resp = self
            .client
            .post(&self.table_url)
            .header("Prefer", "return=representation")
            .json(food)
            .send()
            .await
            .context("Failed to reach the food database")?
            .error_for_status()
            .context("Food registration was rejected")?;

        let created: Vec<Food> = resp
            .json()
            .await
            .context("Failed to parse registered food")?;
        created
            .into_iter()
            .next()
            .context("Food database returned no row for the registered food")
    }

    pub async fn update_food_async(&self, id: &str, update: &FoodUpdate) -> Result<Food> {
        let id_filter = format!("eq.{id}");
        let resp = self
            .client
            .patch(&self.table_url)
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .context("Failed to reach the food database")?
            .error_for_status()
            .context("Food update was rejected")?;

        let updated: Vec<Food> = resp
            .json()
            .await
            .context("Failed to parse updated food")?;
        match updated.into_iter().next() {
            Some(food) => Ok(food),
            None => bail!("No food found with id '{id}'"),
        }
    }
}

impl FoodRepository for SupabaseClient {
    fn get_food_by_barcode(&self, barcode: &str) -> Result<Option<Food>> {
        self.rt.block_on(self.get_food_by_barcode_async(barcode))
    }

    fn add_food(&self, food: &NewFood) -> Result<Food> {
        self.rt.block_on(self.add_food_async(food))
    }

    fn search_foods(&self, query: &str) -> Result<Vec<Food>> {
        self.rt.block_on(self.search_foods_async(query))
    }

    fn update_food(&self, id: &str, update: &FoodUpdate) -> Result<Food> {
        self.rt.block_on(self.update_food_async(id, update))
    }
}

/// Decode rows one at a time, dropping any that are not usable food records
/// (a null name or calorie count, a blank id).
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Food> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Food>(row) {
            Ok(food) if food.is_cacheable() => Some(food),
            Ok(food) => {
                debug!(id = %food.id, "dropping food row without id or name");
                None
            }
            Err(e) => {
                debug!(error = %e, "dropping malformed food row");
                None
            }
        })
        .collect()
}

/// Drop characters PostgREST would read as pattern syntax inside `ilike`.
fn strip_wildcards(query: &str) -> String {
    query
        .chars()
        .filter(|c| !matches!(c, '*' | '%' | '_'))
        .collect::<String>()
        .trim()
        .to_string()
}
