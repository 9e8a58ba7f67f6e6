use nearby_core::{Locale, PoiRecord, RouteKind, SearchQuery};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::ProviderError;

/// Around-search client for the map provider. One attempt per request, no
/// retries; the caller decides what a failure means.
#[derive(Debug, Clone)]
pub struct MapSearchClient {
    http: Client,
    key: String,
    endpoint: String,
    page_size: u32,
}

/// Provider payload. Scalars arrive as strings, numbers, or empty arrays
/// depending on the field and the record, so everything quirky stays a
/// `Value` until extraction.
#[derive(Debug, Deserialize)]
struct PlaceAroundPayload {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    info: Value,
    #[serde(default)]
    infocode: Value,
    #[serde(default)]
    pois: Value,
}

impl MapSearchClient {
    pub fn new(http: Client, key: String, endpoint: String, page_size: u32) -> Self {
        Self {
            http,
            key,
            endpoint,
            page_size,
        }
    }

    /// Searches around the query coordinate and maps provider records into
    /// [`PoiRecord`]s. Zero hits is a success with an empty list.
    #[instrument(skip(self, query), fields(keyword = %query.keyword, radius = query.radius_m))]
    pub async fn search_around(&self, query: &SearchQuery) -> Result<Vec<PoiRecord>, ProviderError> {
        // Provider wants longitude first.
        let location = format!("{},{}", query.longitude, query.latitude);
        let keywords = search_keywords(&query.keyword, query.route, query.locale);
        let radius = query.radius_m.to_string();
        let offset = self.page_size.to_string();

        let response = self
            .http
            .get(format!("{}/place/around", self.endpoint))
            .query(&[
                ("key", self.key.as_str()),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("offset", offset.as_str()),
                ("page", "1"),
                ("keywords", keywords.as_str()),
                ("extensions", "all"),
                ("output", "json"),
            ])
            .send()
            .await?;

        let payload: PlaceAroundPayload = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        if text(&payload.status).as_deref() != Some("1") {
            return Err(ProviderError::Status {
                code: text(&payload.infocode).unwrap_or_else(|| "unknown".to_string()),
                info: text(&payload.info).unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let records = payload
            .pois
            .as_array()
            .map(|items| items.iter().filter_map(map_poi).collect::<Vec<_>>())
            .unwrap_or_default();

        debug!(hits = records.len(), "around search completed");
        Ok(records)
    }
}

/// Keyword string for the provider query. A yoga-class search fans out to a
/// synonym union to maximize recall; anything else searches verbatim.
pub fn search_keywords(keyword: &str, route: RouteKind, locale: Locale) -> String {
    if route == RouteKind::Yoga || keyword == "瑜伽" || keyword == "yoga" {
        return match locale {
            Locale::Zh => "瑜伽|瑜珈|yoga|瑜伽馆|瑜伽会所|瑜伽工作室",
            Locale::En => "yoga|yoga studio|yoga center|pilates",
        }
        .to_string();
    }
    keyword.to_string()
}

fn map_poi(raw: &Value) -> Option<PoiRecord> {
    // Provider-assigned identifiers are required; records without them are
    // unusable downstream and get skipped.
    let id = text(&raw["id"])?;
    let name = text(&raw["name"])?;

    let city_name = text(&raw["cityname"]);
    let photo_urls = raw["photos"]
        .as_array()
        .map(|photos| {
            photos
                .iter()
                .filter_map(|photo| text(&photo["url"]))
                .take(3)
                .collect()
        })
        .unwrap_or_default();

    Some(PoiRecord {
        id,
        name,
        category: text(&raw["type"]),
        category_code: text(&raw["typecode"]),
        address: text(&raw["address"]),
        location: text(&raw["location"]),
        phone: text(&raw["tel"]),
        city_area: text(&raw["adname"]),
        city_name,
        distance_m: number(&raw["distance"]).filter(|d| *d >= 0.0),
        rating: number(&raw["biz_ext"]["rating"]),
        cost_estimate: number(&raw["biz_ext"]["cost"]),
        photo_urls,
        recommend_reason: None,
    })
}

/// Non-empty text from a string or number value. Empty arrays and empty
/// strings (the provider's spellings of "absent") come back as None.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
