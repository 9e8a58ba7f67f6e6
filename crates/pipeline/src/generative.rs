use nearby_core::reason::{clip_graphemes, REASON_MAX_GRAPHEMES};
use nearby_core::{Locale, PoiRecord};
use nearby_providers::{GenerationClient, GenerationError};

/// Seam between the orchestrator and whatever produces generative reason
/// text. Implemented by the real chat-completions client and by the mocks
/// the orchestrator tests swap in.
pub trait ReasonGenerator: Send + Sync {
    async fn generate(
        &self,
        poi: &PoiRecord,
        intent: &str,
        locale: Locale,
    ) -> Result<String, GenerationError>;
}

impl ReasonGenerator for GenerationClient {
    async fn generate(
        &self,
        poi: &PoiRecord,
        intent: &str,
        locale: Locale,
    ) -> Result<String, GenerationError> {
        let (system, user) = compose_prompt(poi, intent, locale);
        let content = self.complete(system, &user).await?;
        Ok(clip_graphemes(&content, REASON_MAX_GRAPHEMES))
    }
}

/// System instruction plus user prompt embedding the venue facts the model
/// should lean on: name, distance, district, rating, and the user's goal.
pub fn compose_prompt(poi: &PoiRecord, intent: &str, locale: Locale) -> (&'static str, String) {
    let mut facts = Vec::new();
    match locale {
        Locale::Zh => {
            if let Some(distance) = poi.distance_m {
                facts.push(format!("距离{}米", distance.round()));
            }
            if let Some(area) = &poi.city_area {
                facts.push(format!("位于{}", area));
            }
            if let Some(rating) = poi.rating {
                facts.push(format!("评分{}", rating));
            }

            let user = format!(
                "为「{}」写一句15字以内的推荐理由。场馆信息：{}。用户需求：{}。要求：简洁有吸引力，突出适合该用户需求的特点。",
                poi.name,
                facts.join(" "),
                intent
            );
            (
                "你是一名友好的本地向导，请根据商家信息，用一句轻松、有温度的中文推荐语吸引用户。",
                user,
            )
        }
        Locale::En => {
            if let Some(distance) = poi.distance_m {
                facts.push(format!("{} m away", distance.round()));
            }
            if let Some(area) = &poi.city_area {
                facts.push(format!("in {}", area));
            }
            if let Some(rating) = poi.rating {
                facts.push(format!("rated {}", rating));
            }

            let user = format!(
                "Write one recommendation line of at most 15 words for \"{}\". Venue facts: {}. User goal: {}. Keep it short and appealing.",
                poi.name,
                facts.join(", "),
                intent
            );
            (
                "You are a friendly local guide. Write one short, warm recommendation line for the venue.",
                user,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_venue_facts_and_intent() {
        let poi = PoiRecord {
            id: "B0".to_string(),
            name: "静心瑜伽馆".to_string(),
            city_area: Some("朝阳区".to_string()),
            distance_m: Some(450.0),
            rating: Some(4.6),
            ..PoiRecord::default()
        };

        let (system, user) = compose_prompt(&poi, "入门体验", Locale::Zh);
        assert!(system.contains("向导"));
        assert!(user.contains("静心瑜伽馆"));
        assert!(user.contains("距离450米"));
        assert!(user.contains("位于朝阳区"));
        assert!(user.contains("评分4.6"));
        assert!(user.contains("入门体验"));
    }

    #[test]
    fn prompt_omits_absent_facts() {
        let poi = PoiRecord {
            id: "B1".to_string(),
            name: "Downtown Flow".to_string(),
            ..PoiRecord::default()
        };

        let (_, user) = compose_prompt(&poi, "beginner experience", Locale::En);
        assert!(user.contains("Downtown Flow"));
        assert!(!user.contains("m away"));
        assert!(!user.contains("rated"));
    }
}
