//! Built-in responder and store gap analysis. No network involved.

use std::collections::HashSet;

use serde::Serialize;

use shopwright_core::{Price, Product, ProductId, Store, StoreProductEntry};

/// Follow-ups offered with every chat reply.
pub const ACTION_ITEMS: [&str; 3] = ["Import products", "Set prices", "Promote store"];

/// How many top-demand catalog products the gap analysis looks at.
pub const GAP_CANDIDATES: i64 = 10;
/// Demand score at which a missing product counts as a gap.
pub const GAP_DEMAND_THRESHOLD: f64 = 0.7;
const MAX_GAPS: usize = 5;
const MIN_HEALTHY_PRODUCTS: usize = 5;

/// How many top-demand catalog products the recommender loads.
pub const RECOMMEND_CANDIDATES: i64 = 20;
/// Of those, how many uncarried products get scored.
const SCORED_CANDIDATES: usize = 10;
const MAX_RECOMMENDATIONS: usize = 5;
const NAME_MATCH_BONUS: f64 = 0.2;

/// Keyword reply addressed to `user_name`.
///
/// Topics are checked in order: pricing, products, marketing. The first
/// match wins.
#[must_use]
pub fn keyword_reply(user_name: &str, message: &str) -> String {
    let msg = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| msg.contains(w));

    let body = if has(&["price", "pricing"]) {
        "For pricing, aim for 30-50% margins on tech accessories. Use .99 endings for budget items."
    } else if has(&["product", "sell", "recommend"]) {
        "Top sellers: phone cases, chargers, earbuds. Check products with demand score >0.7!"
    } else if has(&["marketing", "promote"]) {
        "Share your store on social media, offer launch discounts, and ask for reviews!"
    } else {
        "I can help with products, pricing, and marketing. What would you like to know?"
    };
    format!("Hi {user_name}! {body}")
}

/// A high-demand product the store does not carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductGap {
    pub product_id: ProductId,
    pub name: String,
    pub reason: String,
}

/// Result of `GET /api/ai/insights/{store_id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreInsights {
    pub summary: String,
    pub product_gaps: Vec<ProductGap>,
    pub optimization_tips: Vec<String>,
    pub risks: Vec<String>,
}

/// Compare the store's active links with the top of the catalog.
///
/// `top_products` is expected highest demand first; only the first
/// [`GAP_CANDIDATES`] are considered.
#[must_use]
pub fn store_insights(
    store: &Store,
    entries: &[StoreProductEntry],
    top_products: &[Product],
) -> StoreInsights {
    let carried: HashSet<ProductId> = entries
        .iter()
        .filter(|e| e.link.is_active)
        .map(|e| e.link.product_id)
        .collect();

    let candidates = usize::try_from(GAP_CANDIDATES).unwrap_or(usize::MAX);
    let product_gaps = top_products
        .iter()
        .take(candidates)
        .filter(|p| !carried.contains(&p.id) && p.demand_score >= GAP_DEMAND_THRESHOLD)
        .take(MAX_GAPS)
        .map(|p| ProductGap {
            product_id: p.id,
            name: p.name.clone(),
            reason: "High demand".to_string(),
        })
        .collect();

    let risks = if carried.len() < MIN_HEALTHY_PRODUCTS {
        vec!["Add more products for better conversion".to_string()]
    } else {
        Vec::new()
    };

    StoreInsights {
        summary: format!("'{}' has {} products", store.name, carried.len()),
        product_gaps,
        optimization_tips: ["Add more products", "Feature best sellers", "Update descriptions"]
            .map(String::from)
            .to_vec(),
        risks,
    }
}

/// A catalog product worth importing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub score: f64,
    pub reason: String,
}

/// Result of `POST /api/ai/recommend`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<Recommendation>,
    pub insights: String,
    pub suggested_actions: Vec<String>,
}

/// Score the top of the catalog against a free-text query.
///
/// Products in `carried` are skipped and the first ten of the rest are
/// scored: demand score, plus a bonus when the name contains the query
/// (case-insensitive), capped at 1.0. The five best are returned; ties
/// keep catalog order.
#[must_use]
pub fn recommend_products(
    query: &str,
    carried: &HashSet<ProductId>,
    top_products: &[Product],
) -> Recommendations {
    let needle = query.to_lowercase();
    let mut scored: Vec<Recommendation> = top_products
        .iter()
        .filter(|p| !carried.contains(&p.id))
        .take(SCORED_CANDIDATES)
        .map(|p| {
            let mut score = p.demand_score;
            if p.name.to_lowercase().contains(&needle) {
                score += NAME_MATCH_BONUS;
            }
            let reason = if score >= GAP_DEMAND_THRESHOLD {
                format!("High demand in {}", p.category)
            } else {
                "Good seller".to_string()
            };
            Recommendation {
                product_id: p.id,
                name: p.name.clone(),
                category: p.category.clone(),
                price: p.suggested_retail,
                score: score.min(1.0),
                reason,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let insights = format!("Found {} products matching '{query}'", scored.len());
    scored.truncate(MAX_RECOMMENDATIONS);

    Recommendations {
        recommendations: scored,
        insights,
        suggested_actions: ["Import trending products", "Review pricing", "Share store link"]
            .map(String::from)
            .to_vec(),
    }
}
