//! Log-related API endpoints

use crate::LogClient;
use crate::error::Result;
use joblog_core::dto::log::{LogListQuery, LogPage};

impl LogClient {
    /// List one page of job records
    ///
    /// # Arguments
    /// * `query` - Paging and filter parameters; unset fields use server defaults
    pub async fn list_logs(&self, query: &LogListQuery) -> Result<LogPage> {
        let url = format!("{}/api/v1/logs", self.base_url);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        self.handle_response(response).await
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(crate::ClientError::api_error(
                status.as_u16(),
                "Health check failed",
            ));
        }

        Ok(())
    }
}
