use crate::models::movie::{MovieDetail, MoviePage};
use crate::utils::config::CatalogConfig;
use crate::utils::error::{AppError, AppResult};
use serde::de::DeserializeOwned;

/// Listing endpoints the upstream catalog exposes. Anything else is a typo
/// or a probe and gets rejected before it reaches the network.
pub const ALLOWED_CATEGORIES: &[&str] = &["popular", "now_playing", "upcoming", "top_rated"];

/// Read-only client for the external movie content API. The service proxies
/// it so catalog credentials never reach the front end.
pub struct CatalogService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogService {
    pub fn new(config: &CatalogConfig) -> Self {
        CatalogService {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn is_known_category(category: &str) -> bool {
        ALLOWED_CATEGORIES.contains(&category)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "catalog returned {} for {}",
                response.status(),
                path
            )));
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn movies_by_category(&self, category: &str, page: u32) -> AppResult<MoviePage> {
        if !Self::is_known_category(category) {
            return Err(AppError::BadRequest(format!(
                "Unknown movie category: {}",
                category
            )));
        }
        let page = page.max(1).to_string();
        self.get(&format!("/movie/{}", category), &[("page", page.as_str())])
            .await
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::BadRequest("Search query is empty".into()));
        }
        let page = page.max(1).to_string();
        self.get(
            "/search/movie",
            &[("query", query), ("page", page.as_str())],
        )
        .await
    }

    pub async fn movie_details(&self, movie_id: i64) -> AppResult<MovieDetail> {
        self.get(&format!("/movie/{}", movie_id), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_allowlist() {
        for cat in ["popular", "now_playing", "upcoming", "top_rated"] {
            assert!(CatalogService::is_known_category(cat));
        }
        assert!(!CatalogService::is_known_category("trending"));
        assert!(!CatalogService::is_known_category(""));
    }
}
