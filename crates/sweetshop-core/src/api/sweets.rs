//! Catalog routes under `/sweets`.
//!
//! Nothing here validates input: stock levels, prices and admin rights are
//! enforced by the server, and its verdict comes back as an `ApiError`.

use crate::models::{
    DeleteResponse, NewSweet, Pagination, Purchase, QuantityRequest, Sweet, SweetSearch,
    SweetUpdate,
};

use super::client::{ApiClient, ApiResult};

pub struct SweetsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn sweets(&self) -> SweetsApi<'_> {
        SweetsApi { client: self }
    }
}

fn sweet_path(id: i64) -> String {
    format!("/sweets/{}", id)
}

impl SweetsApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<Sweet>> {
        self.client.get("/sweets").await
    }

    pub async fn list_page(&self, page: &Pagination) -> ApiResult<Vec<Sweet>> {
        self.client.get_with_query("/sweets", page).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Sweet> {
        self.client.get(&sweet_path(id)).await
    }

    pub async fn search(&self, filter: &SweetSearch) -> ApiResult<Vec<Sweet>> {
        self.client.get_with_query("/sweets/search", filter).await
    }

    pub async fn create(&self, sweet: &NewSweet) -> ApiResult<Sweet> {
        self.client.post("/sweets", sweet).await
    }

    pub async fn update(&self, id: i64, update: &SweetUpdate) -> ApiResult<Sweet> {
        self.client.put(&sweet_path(id), update).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<DeleteResponse> {
        self.client.delete(&sweet_path(id)).await
    }

    pub async fn purchase(&self, id: i64, quantity: i32) -> ApiResult<Purchase> {
        let path = format!("{}/purchase", sweet_path(id));
        self.client.post(&path, &QuantityRequest { quantity }).await
    }

    pub async fn restock(&self, id: i64, quantity: i32) -> ApiResult<Sweet> {
        let path = format!("{}/restock", sweet_path(id));
        self.client.post(&path, &QuantityRequest { quantity }).await
    }
}
