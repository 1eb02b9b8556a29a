use serde::{Deserialize, Serialize};

use crate::domain::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query string for `GET /api/recipes`. Pages are 1-based on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRecipesQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: SortOrder,
}

/// Query string for `GET /api/recipes/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecipesQuery {
    pub page: u32,
    pub limit: u32,
    pub title: String,
}

/// Paged envelope returned by both catalogue endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipePage {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub data: Vec<Recipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SortOrder::Desc).expect("serialize"),
            r#""desc""#
        );
        assert_eq!(
            serde_json::from_str::<SortOrder>(r#""asc""#).expect("deserialize"),
            SortOrder::Asc
        );
    }

    #[test]
    fn decodes_backend_envelope() {
        let page: RecipePage = serde_json::from_str(
            r#"{
                "total": 42,
                "page": 2,
                "limit": 10,
                "data": [{"id": 11, "title": "Ramen", "rating": 4.9}]
            }"#,
        )
        .expect("envelope should decode");
        assert_eq!(page.total, 42);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Ramen");
    }
}
