//! PokeAPI client
//!
//! Wire DTOs mirror the remote JSON; everything downstream works with the
//! domain types in `state`. All responses flow through the query caches on
//! [`CatalogClient`], so repeat lookups inside a freshness window never touch
//! the network.

use std::time::Duration;

use serde::Deserialize;

use crate::query::QueryCache;
use crate::state::{CatalogEntry, CatalogPage, PokemonAbility, PokemonDetail, PokemonStat};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";

/// List pages change rarely; details almost never, and are costlier per item.
pub const LIST_FRESH_FOR: Duration = Duration::from_secs(5 * 60);
pub const DETAIL_FRESH_FOR: Duration = Duration::from_secs(10 * 60);

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Uniform failure for any remote lookup: a non-2xx status or a transport
/// problem (connect, body, decode). Clone so every cache waiter can receive
/// the same failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchError {
    Status(u16),
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "Failed to fetch data: status {}", code),
            FetchError::Transport(message) => write!(f, "Failed to fetch data: {}", message),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    count: u32,
    next: Option<String>,
    results: Vec<ListItem>,
}

#[derive(Clone, Debug, Deserialize)]
struct ListItem {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct DetailResponse {
    id: u32,
    name: String,
    base_experience: Option<u32>,
    height: u32,
    weight: u32,
    types: Vec<TypeSlot>,
    stats: Vec<StatSlot>,
    abilities: Vec<AbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    kind: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct StatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilitySlot {
    is_hidden: bool,
    ability: NamedResource,
}

/// Trailing numeric path segment of a listing item's `url` field,
/// e.g. `https://pokeapi.co/api/v2/pokemon/25/` -> 25.
pub fn extract_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// Official-artwork URL for a listing entry (the list endpoint carries no
/// sprites of its own).
pub fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

impl From<ListResponse> for CatalogPage {
    fn from(response: ListResponse) -> Self {
        let items = response
            .results
            .into_iter()
            .map(|item| CatalogEntry {
                id: extract_id(&item.url).unwrap_or(0),
                name: item.name,
                summary_url: item.url,
            })
            .collect();
        CatalogPage {
            items,
            total_count: response.count,
            has_next: response.next.is_some(),
        }
    }
}

impl From<DetailResponse> for PokemonDetail {
    fn from(response: DetailResponse) -> Self {
        let mut types = response.types;
        types.sort_by_key(|slot| slot.slot);
        let artwork = pointer_string(
            &response.sprites,
            "/other/official-artwork/front_default",
        )
        .or_else(|| pointer_string(&response.sprites, "/front_default"));
        PokemonDetail {
            id: response.id,
            name: response.name,
            types: types.into_iter().map(|slot| slot.kind.name).collect(),
            stats: response
                .stats
                .into_iter()
                .map(|slot| PokemonStat {
                    name: slot.stat.name,
                    value: slot.base_stat,
                })
                .collect(),
            abilities: response
                .abilities
                .into_iter()
                .map(|slot| PokemonAbility {
                    name: slot.ability.name,
                    is_hidden: slot.is_hidden,
                })
                .collect(),
            height: response.height,
            weight: response.weight,
            base_experience: response.base_experience,
            artwork_url: artwork,
        }
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(
    http: reqwest::Client,
    url: String,
) -> Result<T, FetchError> {
    let response = http
        .get(&url)
        .send()
        .await
        .map_err(|err| FetchError::Transport(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response
        .json::<T>()
        .await
        .map_err(|err| FetchError::Transport(err.to_string()))
}

/// Remote catalog access with memoization. One instance is created at startup
/// and shared by the effect layer for the life of the process.
pub struct CatalogClient {
    http: reqwest::Client,
    base: String,
    pages: QueryCache<(u32, u32), CatalogPage>,
    details: QueryCache<u32, PokemonDetail>,
}

impl CatalogClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
            pages: QueryCache::new(),
            details: QueryCache::new(),
        }
    }

    /// One catalog page, keyed by `(limit, offset)`.
    pub async fn page(&self, limit: u32, offset: u32) -> Result<CatalogPage, FetchError> {
        let url = format!("{}/pokemon?limit={limit}&offset={offset}", self.base);
        let http = self.http.clone();
        self.pages
            .get_with((limit, offset), LIST_FRESH_FOR, move || async move {
                fetch_json::<ListResponse>(http, url).await.map(CatalogPage::from)
            })
            .await
    }

    /// One detail record, keyed by id.
    pub async fn detail(&self, id: u32) -> Result<PokemonDetail, FetchError> {
        let url = format!("{}/pokemon/{id}", self.base);
        let http = self.http.clone();
        self.details
            .get_with(id, DETAIL_FRESH_FOR, move || async move {
                fetch_json::<DetailResponse>(http, url).await.map(PokemonDetail::from)
            })
            .await
    }
}
