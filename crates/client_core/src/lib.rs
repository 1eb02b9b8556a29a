//! Client-side coordination for a paged, searchable recipe catalogue.
//!
//! [`ListController`] owns the paging and search state and runs the fetch
//! protocol against a [`RecipeProvider`]; [`HttpRecipeProvider`] is the
//! reqwest implementation speaking the backend's JSON-over-GET endpoints.

pub mod controller;
pub mod provider;

pub use controller::{
    ListController, ListQuery, ListResult, ListSnapshot, LoadState, QueryMode, DEFAULT_PAGE_SIZE,
    FETCH_FAILED_MESSAGE,
};
pub use provider::{HttpRecipeProvider, RecipeProvider, DEFAULT_BASE_URL, MAX_WIRE_LIMIT};
