use serde_json::Value;

use crate::models::{Locale, RouteKind, SearchQuery};

/// Builds a canonical [`SearchQuery`] from a loosely shaped request mapping.
/// Total: every invalid or missing field is coerced to a safe default. The
/// one exception is coordinates, which have no safe default and come back as
/// NaN for the caller to reject.
pub fn normalize(raw: &Value, default_radius_m: u32) -> SearchQuery {
    let latitude = extract_number(raw, &["lat", "latitude", "location.lat", "location.latitude", "coords.lat"]);
    let longitude = extract_number(
        raw,
        &[
            "lng",
            "lon",
            "longitude",
            "location.lng",
            "location.longitude",
            "coords.lng",
        ],
    );

    let route_hint = first_text(raw, &["type", "bizType", "category"]);
    let biz_hint = first_text(raw, &["bizType", "type", "category"]);
    let locale = Locale::from_optional_str(first_text(raw, &["locale"]).as_deref());

    let route = normalize_route(route_hint.as_deref().unwrap_or("map-recommend"));
    let keyword = normalize_biz_keyword(biz_hint.as_deref().unwrap_or(""), locale);

    let intent = infer_intent(
        first_text(raw, &["userIntent"]).as_deref(),
        first_text(raw, &["sequenceType"]).as_deref(),
        locale,
    );

    let radius_m = normalize_radius(raw.get("radius"), default_radius_m);

    SearchQuery {
        latitude,
        longitude,
        radius_m,
        route,
        keyword,
        locale,
        intent,
        enable_reasons: flag(raw.get("enableReasons"), true),
        use_generative: flag(raw.get("useLLM"), false),
    }
}

/// Collapses a routing hint to one of the two supported routes. Exact table
/// first, then keyword containment, then the default route.
pub fn normalize_route(input: &str) -> RouteKind {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return RouteKind::MapRecommend;
    }

    match s.as_str() {
        "map" | "map-recommend" | "地图" | "poi" => return RouteKind::MapRecommend,
        "yoga" | "pose" | "瑜伽" | "瑜珈" | "yujia" | "瑜伽馆" | "瑜珈馆" => {
            return RouteKind::Yoga
        }
        _ => {}
    }

    if contains_any(&s, &["map", "地图", "poi"]) {
        RouteKind::MapRecommend
    } else if contains_any(&s, &["yoga", "瑜", "pose"]) {
        RouteKind::Yoga
    } else {
        RouteKind::MapRecommend
    }
}

/// Canonical search keyword for a business-type hint. The yoga synonym set
/// collapses to the locale's canonical term; anything else searches verbatim.
pub fn normalize_biz_keyword(input: &str, locale: Locale) -> String {
    let raw = input.trim().to_lowercase();

    let default_keyword = match locale {
        Locale::Zh => "瑜伽",
        Locale::En => "yoga",
    };
    if raw.is_empty() {
        return default_keyword.to_string();
    }

    let yoga_variants = ["yoga", "pose", "yujia", "瑜伽", "瑜珈", "瑜伽馆", "瑜珈馆"];
    if yoga_variants.contains(&raw.as_str()) || raw.contains('瑜') || raw.contains("yoga") {
        return default_keyword.to_string();
    }

    raw
}

/// Resolves the user intent phrase: explicit override wins, then the
/// sequence-code table, then the generic practice intent.
pub fn infer_intent(explicit: Option<&str>, sequence_type: Option<&str>, locale: Locale) -> String {
    if let Some(value) = explicit.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_string();
    }

    let table: &[(&str, &str)] = match locale {
        Locale::Zh => &[
            ("neck-relief", "肩颈舒缓"),
            ("core-strength", "核心训练"),
            ("meditation", "冥想放松"),
            ("beginner", "入门体验"),
            ("hot-yoga", "高温瑜伽"),
            ("yin-yoga", "阴瑜伽"),
            ("vinyasa", "流瑜伽"),
            ("flexibility", "柔韧性训练"),
            ("stress-relief", "压力释放"),
            ("balance", "平衡训练"),
        ],
        Locale::En => &[
            ("neck-relief", "neck and shoulder relief"),
            ("core-strength", "core strength"),
            ("meditation", "calm meditation"),
            ("beginner", "beginner experience"),
            ("hot-yoga", "hot yoga"),
            ("yin-yoga", "yin yoga"),
            ("vinyasa", "vinyasa flow"),
            ("flexibility", "flexibility training"),
            ("stress-relief", "stress relief"),
            ("balance", "balance training"),
        ],
    };

    if let Some(code) = sequence_type.map(str::trim).filter(|v| !v.is_empty()) {
        let code = code.to_lowercase();
        if let Some((_, phrase)) = table.iter().find(|(key, _)| *key == code) {
            return (*phrase).to_string();
        }
    }

    default_intent(locale).to_string()
}

pub fn default_intent(locale: Locale) -> &'static str {
    match locale {
        Locale::Zh => "瑜伽练习",
        Locale::En => "yoga practice",
    }
}

fn normalize_radius(raw: Option<&Value>, default_radius_m: u32) -> u32 {
    match raw.and_then(coerce_number) {
        Some(value) if value > 0.0 => value.round() as u32,
        _ => default_radius_m,
    }
}

/// First-defined-wins extraction over an ordered alias list. Dotted paths
/// descend into nested objects.
fn extract_number(raw: &Value, aliases: &[&str]) -> f64 {
    for alias in aliases {
        let value = lookup_path(raw, alias);
        if let Some(number) = value.and_then(coerce_number) {
            return number;
        }
    }
    f64::NAN
}

fn first_text(raw: &Value, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(text) = lookup_path(raw, alias).and_then(coerce_text) {
            return Some(text);
        }
    }
    None
}

fn lookup_path<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn flag(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
