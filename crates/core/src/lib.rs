pub mod models;
pub mod normalize;
pub mod reason;

pub use models::*;
pub use normalize::{infer_intent, normalize, normalize_biz_keyword, normalize_route};
pub use reason::{build_reason_by_rule, clip_graphemes, rule_clauses, REASON_MAX_GRAPHEMES};
