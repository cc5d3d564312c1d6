use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::OrderId,
    error::ErrorBody,
    invoice::Document,
    protocol::{
        CreateOrderResponse, HealthResponse, OrderSummary, StoredOrder, UpdateOrderRequest,
        UploadResponse,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub mod controller;
pub mod error;
pub mod events;
pub mod pagination;

pub use controller::{ControllerSnapshot, InvoiceController};
pub use error::ClientError;
pub use events::{ControllerEvent, Notification, NotificationLevel};
pub use pagination::{page_numbers, OrderList, PageToken, DEFAULT_PAGE_SIZE};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Upload ceiling enforced by the extraction service.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "pdf"];

/// A single invoice image or PDF queued for extraction.
#[derive(Debug, Clone)]
pub struct UploadFile {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ClientError> {
        let filename = filename.into();
        if extension_of(&filename).is_none() {
            return Err(ClientError::UnsupportedFile(format!(
                "'{filename}' is not a PNG, JPG, JPEG or PDF file"
            )));
        }
        if bytes.is_empty() {
            return Err(ClientError::UnsupportedFile(format!("'{filename}' is empty")));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ClientError::UnsupportedFile(format!(
                "'{filename}' is {} bytes; the limit is {MAX_UPLOAD_BYTES}",
                bytes.len()
            )));
        }
        Ok(Self { filename, bytes })
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ClientError::UnsupportedFile(format!("'{}' is not a file", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Self::new(filename, bytes)
    }

    pub fn mime_type(&self) -> &'static str {
        match extension_of(&self.filename) {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            _ => "image/jpeg",
        }
    }
}

fn extension_of(filename: &str) -> Option<&'static str> {
    let (_, extension) = filename.rsplit_once('.')?;
    ACCEPTED_EXTENSIONS
        .into_iter()
        .find(|accepted| accepted.eq_ignore_ascii_case(extension))
}

/// The REST surface of the extraction and orders service.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<Document, ClientError>;
    async fn list_orders(&self) -> Result<Vec<OrderSummary>, ClientError>;
    async fn get_order(&self, order_id: OrderId) -> Result<StoredOrder, ClientError>;
    /// Returns the id of the new order when the server reports one.
    async fn create_order(&self, document: &Document) -> Result<Option<OrderId>, ClientError>;
    async fn update_order(
        &self,
        order_id: OrderId,
        body: &UpdateOrderRequest,
    ) -> Result<(), ClientError>;
    async fn delete_order(&self, order_id: OrderId) -> Result<(), ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

pub struct HttpOrdersClient {
    http: Client,
    base_url: Url,
}

impl HttpOrdersClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Turns a non-2xx response into [`ClientError::Api`], keeping the
    /// server's error message when the body carries one.
    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let bytes = response.bytes().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap_or_default();
        warn!(%url, %status, message = ?body.error, "orders API request failed");
        Err(ClientError::Api {
            status,
            message: body.message().map(str::to_owned),
        })
    }
}

#[async_trait]
impl OrdersApi for HttpOrdersClient {
    async fn upload(&self, file: UploadFile) -> Result<Document, ClientError> {
        let mime_type = file.mime_type();
        let UploadFile { filename, bytes } = file;
        info!(%filename, size_bytes = bytes.len(), "uploading invoice for extraction");

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime_type)?;
        let response = self
            .http
            .post(self.endpoint("upload")?)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        let body: UploadResponse = Self::decode(response).await?;
        debug!(stored_as = %body.filename, "extraction finished");
        Ok(body.data)
    }

    async fn list_orders(&self) -> Result<Vec<OrderSummary>, ClientError> {
        let response = self.http.get(self.endpoint("orders")?).send().await?;
        let rows: serde_json::Value = Self::decode(response).await?;
        let orders = OrderSummary::list_from_value(rows);
        debug!(count = orders.len(), "listed orders");
        Ok(orders)
    }

    async fn get_order(&self, order_id: OrderId) -> Result<StoredOrder, ClientError> {
        let response = self
            .http
            .get(self.endpoint(&format!("orders/{order_id}"))?)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_order(&self, document: &Document) -> Result<Option<OrderId>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("orders")?)
            .json(document)
            .send()
            .await?;
        let body: CreateOrderResponse = Self::decode(response).await?;
        Ok(body.order_id)
    }

    async fn update_order(
        &self,
        order_id: OrderId,
        body: &UpdateOrderRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.endpoint(&format!("orders/{order_id}"))?)
            .json(body)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn delete_order(&self, order_id: OrderId) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("orders/{order_id}"))?)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(self.endpoint("health")?).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
