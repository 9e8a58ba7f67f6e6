use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Locale, PoiRecord};

/// Target length for a recommendation line, in grapheme clusters.
pub const REASON_MAX_GRAPHEMES: usize = 30;

const CLAUSE_SEPARATOR: &str = " · ";

/// Deterministic recommendation line for a POI. Pure: identical inputs
/// always produce the identical string.
pub fn build_reason_by_rule(poi: &PoiRecord, intent: &str, locale: Locale) -> String {
    let clauses = rule_clauses(poi, intent, locale);
    let joined = clauses.join(CLAUSE_SEPARATOR);
    if grapheme_len(&joined) <= REASON_MAX_GRAPHEMES {
        return joined;
    }

    // Over budget: keep the leading clause and the intent tail only.
    match clauses.as_slice() {
        [first, .., intent_tail] => format!("{first}{CLAUSE_SEPARATOR}{intent_tail}"),
        _ => joined,
    }
}

/// Ordered clause list behind [`build_reason_by_rule`]: distance tier,
/// district, rating, intent. Only the intent clause is guaranteed.
pub fn rule_clauses(poi: &PoiRecord, intent: &str, locale: Locale) -> Vec<String> {
    let mut clauses = Vec::new();

    if let Some(clause) = distance_clause(poi.distance_m, locale) {
        clauses.push(clause);
    }

    if let (Some(area), city) = (poi.city_area.as_deref(), poi.city_name.as_deref()) {
        if Some(area) != city {
            clauses.push(match locale {
                Locale::Zh => format!("位于{}", area),
                Locale::En => format!("in {}", area),
            });
        }
    }

    if let Some(rating) = poi.rating.filter(|r| *r > 0.0) {
        if rating >= 4.5 {
            clauses.push(
                match locale {
                    Locale::Zh => "高评分推荐",
                    Locale::En => "highly rated",
                }
                .to_string(),
            );
        } else if rating >= 4.0 {
            clauses.push(
                match locale {
                    Locale::Zh => "口碑不错",
                    Locale::En => "well regarded",
                }
                .to_string(),
            );
        }
    }

    clauses.push(intent_clause(intent, locale));
    clauses
}

fn distance_clause(distance_m: Option<f64>, locale: Locale) -> Option<String> {
    let d = distance_m.filter(|d| *d > 0.0 && *d < 5000.0)?;
    let km = (d / 100.0).round() / 10.0;

    Some(if d <= 500.0 {
        match locale {
            Locale::Zh => format!("步行可达 {}米", d.round()),
            Locale::En => format!("{} m walk away", d.round()),
        }
    } else if d <= 2000.0 {
        match locale {
            Locale::Zh => format!("距离约{}公里", km),
            Locale::En => format!("about {} km", km),
        }
    } else {
        match locale {
            Locale::Zh => format!("{}公里内", km),
            Locale::En => format!("within {} km", km),
        }
    })
}

fn intent_clause(intent: &str, locale: Locale) -> String {
    let table: &[(&str, &str)] = match locale {
        Locale::Zh => &[
            ("肩颈舒缓", "适合肩颈放松课程"),
            ("核心训练", "核心力量训练佳选"),
            ("冥想放松", "静心冥想好去处"),
            ("入门体验", "新手友好环境"),
            ("高温瑜伽", "专业热瑜伽体验"),
            ("阴瑜伽", "深度拉伸放松"),
            ("流瑜伽", "动态流畅练习"),
            ("瑜伽练习", "瑜伽练习优选"),
        ],
        Locale::En => &[
            ("neck and shoulder relief", "gentle on neck and shoulders"),
            ("core strength", "great for core work"),
            ("calm meditation", "quiet spot for meditation"),
            ("beginner experience", "beginner friendly studio"),
            ("hot yoga", "dedicated hot yoga rooms"),
            ("yin yoga", "deep stretch and release"),
            ("vinyasa flow", "dynamic flow classes"),
            ("yoga practice", "solid pick for yoga practice"),
        ],
    };

    table
        .iter()
        .find(|(key, _)| *key == intent)
        .map(|(_, phrase)| (*phrase).to_string())
        .unwrap_or_else(|| match locale {
            Locale::Zh => format!("适合{}体验", intent),
            Locale::En => format!("good fit for {}", intent),
        })
}

pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Clips to `max` grapheme clusters, appending an ellipsis when anything
/// was cut.
pub fn clip_graphemes(text: &str, max: usize) -> String {
    if grapheme_len(text) <= max {
        return text.to_string();
    }
    let mut clipped: String = text.graphemes(true).take(max).collect();
    clipped.push_str("...");
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poi(distance: Option<f64>, area: Option<&str>, city: Option<&str>, rating: Option<f64>) -> PoiRecord {
        PoiRecord {
            id: "B0FF".to_string(),
            name: "静心瑜伽馆".to_string(),
            city_area: area.map(str::to_string),
            city_name: city.map(str::to_string),
            distance_m: distance,
            rating,
            ..PoiRecord::default()
        }
    }

    #[test]
    fn rule_reason_is_deterministic() {
        let record = poi(Some(450.0), Some("朝阳区"), Some("北京市"), Some(4.6));
        let first = build_reason_by_rule(&record, "入门体验", Locale::Zh);
        let second = build_reason_by_rule(&record, "入门体验", Locale::Zh);
        assert_eq!(first, second);
    }

    #[test]
    fn walkable_district_rated_intent_clauses() {
        let record = poi(Some(450.0), Some("朝阳区"), Some("北京市"), Some(4.6));
        let clauses = rule_clauses(&record, "入门体验", Locale::Zh);

        assert_eq!(clauses[0], "步行可达 450米");
        assert!(clauses.contains(&"位于朝阳区".to_string()));
        assert!(clauses.contains(&"高评分推荐".to_string()));
        assert_eq!(clauses.last().unwrap(), "新手友好环境");
    }

    #[test]
    fn distance_tiers() {
        assert_eq!(
            rule_clauses(&poi(Some(1300.0), None, None, None), "瑜伽练习", Locale::Zh)[0],
            "距离约1.3公里"
        );
        assert_eq!(
            rule_clauses(&poi(Some(2600.0), None, None, None), "瑜伽练习", Locale::Zh)[0],
            "2.6公里内"
        );
        // Absent, zero, and far distances all drop the clause.
        for distance in [None, Some(0.0), Some(5000.0), Some(9000.0)] {
            let clauses = rule_clauses(&poi(distance, None, None, None), "瑜伽练习", Locale::Zh);
            assert_eq!(clauses, vec!["瑜伽练习优选".to_string()]);
        }
    }

    #[test]
    fn district_clause_requires_difference_from_city() {
        let same = poi(None, Some("北京市"), Some("北京市"), None);
        assert_eq!(rule_clauses(&same, "瑜伽练习", Locale::Zh).len(), 1);

        let missing_city = poi(None, Some("浦东新区"), None, None);
        assert!(rule_clauses(&missing_city, "瑜伽练习", Locale::Zh)
            .contains(&"位于浦东新区".to_string()));
    }

    #[test]
    fn rating_thresholds() {
        let high = rule_clauses(&poi(None, None, None, Some(4.5)), "瑜伽练习", Locale::En);
        assert!(high.contains(&"highly rated".to_string()));

        let good = rule_clauses(&poi(None, None, None, Some(4.2)), "瑜伽练习", Locale::En);
        assert!(good.contains(&"well regarded".to_string()));

        let low = rule_clauses(&poi(None, None, None, Some(3.9)), "瑜伽练习", Locale::En);
        assert_eq!(low.len(), 1);
    }

    #[test]
    fn over_budget_keeps_first_clause_and_intent() {
        let record = poi(Some(450.0), Some("朝阳区"), Some("北京市"), Some(4.6));
        let reason = build_reason_by_rule(&record, "入门体验", Locale::Zh);
        assert_eq!(reason, "步行可达 450米 · 新手友好环境");
    }

    #[test]
    fn lone_over_budget_intent_clause_is_kept_whole() {
        let record = poi(None, None, None, None);
        let intent = "一个特别长的定制化需求描述需要被完整保留下来的特殊测试场景示例";
        let reason = build_reason_by_rule(&record, intent, Locale::Zh);
        assert_eq!(reason, format!("适合{}体验", intent));
    }

    #[test]
    fn clip_appends_ellipsis_only_when_cut() {
        assert_eq!(clip_graphemes("short", 30), "short");
        let long = "a".repeat(40);
        let clipped = clip_graphemes(&long, 30);
        assert!(clipped.ends_with("..."));
        assert_eq!(grapheme_len(&clipped), 33);
    }
}
