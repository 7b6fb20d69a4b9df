use async_trait::async_trait;
use reqwest::{Request, Response};

/// Minimal HTTP seam so workbook downloads can be routed through any client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
