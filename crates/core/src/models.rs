use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    Zh,
    En,
}

impl Locale {
    /// Maps free-form locale hints onto the two supported locales.
    /// Anything that is not recognizably Chinese is English.
    pub fn from_optional_str(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()) {
            Some(v) if v.starts_with("zh") || v == "cn" || v == "chinese" => Self::Zh,
            _ => Self::En,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }
}

/// Routing token a raw request resolves to. `Yoga` drives the
/// synonym-union keyword search; everything else is a plain POI lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    MapRecommend,
    Yoga,
}

impl RouteKind {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::MapRecommend => "map-recommend",
            Self::Yoga => "yoga",
        }
    }
}

/// Canonical search query produced by the normalizer. Built once per
/// request and immutable afterwards. Latitude/longitude are NaN when the
/// raw request carried nothing usable; callers must check `has_coordinates`
/// before issuing any remote call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: u32,
    pub route: RouteKind,
    pub keyword: String,
    pub locale: Locale,
    pub intent: String,
    pub enable_reasons: bool,
    pub use_generative: bool,
}

impl SearchQuery {
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    pub fn coordinates_in_range(&self) -> bool {
        self.has_coordinates()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One search hit, mapped from the provider payload. `recommend_reason` is
/// the only field written after construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoiRecord {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Provider-format "lng,lat" pair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    /// District-level name, finer than `city_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Provider-scale score, not normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
    /// At most three entries, always present (possibly empty).
    pub photo_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend_reason: Option<String>,
}

/// Echo of the effective search parameters, returned alongside results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEcho {
    pub latitude: f64,
    pub longitude: f64,
    pub keyword: String,
    pub radius_m: u32,
    pub intent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendData {
    pub pois: Vec<PoiRecord>,
    pub total: usize,
    pub search_echo: SearchEcho,
    pub has_reasons: bool,
}

impl RecommendData {
    pub fn assemble(pois: Vec<PoiRecord>, query: &SearchQuery) -> Self {
        let has_reasons = pois.iter().any(|poi| poi.recommend_reason.is_some());
        Self {
            total: pois.len(),
            search_echo: SearchEcho {
                latitude: query.latitude,
                longitude: query.longitude,
                keyword: query.keyword.clone(),
                radius_m: query.radius_m,
                intent: query.intent.clone(),
            },
            pois,
            has_reasons,
        }
    }
}
