//! Purchase history routes.

use crate::models::Purchase;

use super::client::{ApiClient, ApiResult};

pub struct PurchasesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn purchases(&self) -> PurchasesApi<'_> {
        PurchasesApi { client: self }
    }
}

impl PurchasesApi<'_> {
    /// Purchases made by the authenticated user
    pub async fn mine(&self) -> ApiResult<Vec<Purchase>> {
        self.client.get("/purchases").await
    }
}
