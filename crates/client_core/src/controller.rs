//! Form-state controller: owns the invoice being edited and the order list.
//!
//! State lives behind an async mutex that is never held across a request, so
//! presenters can take a [`ControllerSnapshot`] while a call is in flight and
//! see the in-flight flags. Nothing queues or cancels requests; a slow
//! response is applied to whatever state exists when it lands.

use std::sync::Arc;

use shared::{
    domain::{FieldPath, LineItemEdit, OrderId},
    error::DocumentError,
    invoice::{Document, LineItem},
    protocol::{OrderSummary, UpdateOrderRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    events::{ControllerEvent, Notification, NotificationLevel},
    pagination::{OrderList, PageToken},
    OrdersApi, UploadFile,
};

const UPLOAD_OK: &str = "Invoice data extracted successfully!";
const UPLOAD_FAILED: &str = "Failed to extract invoice data";
const LOAD_ORDER_FAILED: &str = "Failed to load order";
const LOAD_ORDERS_FAILED: &str = "Failed to load orders";
const CREATE_OK: &str = "Invoice saved successfully!";
const CREATE_FAILED: &str = "Failed to save invoice";
const UPDATE_OK: &str = "Order updated successfully!";
const UPDATE_FAILED: &str = "Failed to update order";
const DELETE_OK: &str = "Order deleted successfully!";
const DELETE_FAILED: &str = "Failed to delete order";

/// Read-only copy of the controller state for presenters.
#[derive(Debug, Clone)]
pub struct ControllerSnapshot {
    pub document: Option<Document>,
    pub editing: Option<OrderId>,
    pub pending_delete: Option<OrderId>,
    pub uploading: bool,
    pub saving: bool,
    pub loading_orders: bool,
    pub order_count: usize,
    pub visible_orders: Vec<OrderSummary>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_numbers: Vec<PageToken>,
}

struct ControllerState {
    document: Option<Document>,
    editing: Option<OrderId>,
    pending_delete: Option<OrderId>,
    uploading: bool,
    saving: bool,
    loading_orders: bool,
    orders: OrderList,
}

pub struct InvoiceController {
    api: Arc<dyn OrdersApi>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl InvoiceController {
    pub fn new(api: Arc<dyn OrdersApi>, page_size: usize) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(ControllerState {
                document: None,
                editing: None,
                pending_delete: None,
                uploading: false,
                saving: false,
                loading_orders: false,
                orders: OrderList::new(page_size),
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let guard = self.inner.lock().await;
        ControllerSnapshot {
            document: guard.document.clone(),
            editing: guard.editing,
            pending_delete: guard.pending_delete,
            uploading: guard.uploading,
            saving: guard.saving,
            loading_orders: guard.loading_orders,
            order_count: guard.orders.len(),
            visible_orders: guard.orders.visible().to_vec(),
            current_page: guard.orders.current_page(),
            total_pages: guard.orders.total_pages(),
            page_numbers: guard.orders.page_numbers(),
        }
    }

    pub async fn document(&self) -> Option<Document> {
        self.inner.lock().await.document.clone()
    }

    pub async fn editing(&self) -> Option<OrderId> {
        self.inner.lock().await.editing
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "notify"),
            NotificationLevel::Error => warn!(message = %notification.message, "notify"),
        }
        let _ = self.events.send(ControllerEvent::Notification(notification));
    }

    fn notify_failure(&self, err: &ClientError, fallback: &str) {
        warn!(error = %err, "{fallback}");
        self.notify(Notification::error(err.user_message(fallback)));
    }

    fn document_changed(&self) {
        let _ = self.events.send(ControllerEvent::DocumentChanged);
    }

    /// Replaces the document with freshly extracted data; the result is a new
    /// invoice, not an edit of a stored order.
    pub async fn load_extracted(&self, document: Document) {
        {
            let mut guard = self.inner.lock().await;
            guard.document = Some(document);
            guard.editing = None;
        }
        self.document_changed();
    }

    /// Sends `file` for extraction and loads the result into the form.
    pub async fn upload(&self, file: UploadFile) -> Result<(), ClientError> {
        {
            let mut guard = self.inner.lock().await;
            guard.uploading = true;
            guard.document = None;
        }
        self.document_changed();

        let result = self.api.upload(file).await;
        self.inner.lock().await.uploading = false;

        match result {
            Ok(document) => {
                self.load_extracted(document).await;
                self.notify(Notification::success(UPLOAD_OK));
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err, UPLOAD_FAILED);
                Err(err)
            }
        }
    }

    /// Loads a stored order into the form and marks it as being edited.
    pub async fn view_order(&self, order_id: OrderId) -> Result<(), ClientError> {
        match self.api.get_order(order_id).await {
            Ok(order) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.document = Some(Document::from(order));
                    guard.editing = Some(order_id);
                }
                debug!(%order_id, "loaded stored order for editing");
                self.document_changed();
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err, LOAD_ORDER_FAILED);
                Err(err)
            }
        }
    }

    /// Drops the current document and any edit in progress.
    pub async fn new_invoice(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.document = None;
            guard.editing = None;
        }
        self.document_changed();
    }

    async fn mutate<R>(
        &self,
        apply: impl FnOnce(&mut Document) -> Result<R, DocumentError>,
    ) -> Result<R, ClientError> {
        let result = {
            let mut guard = self.inner.lock().await;
            let document = guard.document.as_mut().ok_or(ClientError::NoDocument)?;
            apply(document)?
        };
        self.document_changed();
        Ok(result)
    }

    pub async fn edit_field(&self, path: FieldPath, value: &str) -> Result<(), ClientError> {
        self.mutate(|document| {
            document.set_field(path, value);
            Ok(())
        })
        .await
    }

    pub async fn edit_line_item(&self, index: usize, edit: LineItemEdit) -> Result<(), ClientError> {
        self.mutate(|document| document.edit_line_item(index, edit))
            .await
    }

    pub async fn add_line_item(&self) -> Result<(), ClientError> {
        self.mutate(|document| {
            document.add_line_item();
            Ok(())
        })
        .await
    }

    pub async fn remove_line_item(&self, index: usize) -> Result<LineItem, ClientError> {
        self.mutate(|document| document.remove_line_item(index))
            .await
    }

    pub async fn set_tax_rate(&self, tax_rate: f64) -> Result<(), ClientError> {
        self.mutate(|document| {
            document.set_tax_rate(tax_rate);
            Ok(())
        })
        .await
    }

    pub async fn set_shipping_handling(&self, amount: f64) -> Result<(), ClientError> {
        self.mutate(|document| {
            document.set_shipping_handling(amount);
            Ok(())
        })
        .await
    }

    /// Persists the form: an update when a stored order is being edited,
    /// otherwise a new order.
    pub async fn save(&self) -> Result<Option<OrderId>, ClientError> {
        let editing = self.inner.lock().await.editing;
        match editing {
            Some(order_id) => self.update_order().await.map(|()| Some(order_id)),
            None => self.create_order().await,
        }
    }

    /// Creates a new order from the form. On success the form is cleared.
    pub async fn create_order(&self) -> Result<Option<OrderId>, ClientError> {
        let document = {
            let mut guard = self.inner.lock().await;
            let document = guard.document.clone().ok_or(ClientError::NoDocument)?;
            guard.saving = true;
            document
        };

        let result = self.api.create_order(&document).await;
        self.inner.lock().await.saving = false;

        match result {
            Ok(order_id) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.document = None;
                    guard.editing = None;
                }
                self.document_changed();
                info!(order_id = ?order_id.map(|id| id.0), "created order");
                let _ = self.refresh_orders().await;
                self.notify(Notification::success(CREATE_OK));
                Ok(order_id)
            }
            Err(err) => {
                self.notify_failure(&err, CREATE_FAILED);
                Err(err)
            }
        }
    }

    /// Writes the form back to the order being edited. The form keeps its
    /// contents afterwards; only the edit marker is cleared.
    pub async fn update_order(&self) -> Result<(), ClientError> {
        let (order_id, body) = {
            let mut guard = self.inner.lock().await;
            let order_id = guard.editing.ok_or(ClientError::NotEditing)?;
            let body = guard
                .document
                .as_ref()
                .map(UpdateOrderRequest::from)
                .ok_or(ClientError::NoDocument)?;
            guard.saving = true;
            (order_id, body)
        };

        let result = self.api.update_order(order_id, &body).await;
        self.inner.lock().await.saving = false;

        match result {
            Ok(()) => {
                info!(%order_id, "updated order");
                let _ = self.refresh_orders().await;
                self.notify(Notification::success(UPDATE_OK));
                self.inner.lock().await.editing = None;
                self.document_changed();
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }

    /// First phase of a delete: remember which order awaits confirmation.
    pub async fn request_delete(&self, order_id: OrderId) {
        self.inner.lock().await.pending_delete = Some(order_id);
    }

    pub async fn cancel_delete(&self) {
        self.inner.lock().await.pending_delete = None;
    }

    /// Second phase of a delete. The pending order is forgotten whether or
    /// not the call succeeds.
    pub async fn confirm_delete(&self) -> Result<OrderId, ClientError> {
        let order_id = self
            .inner
            .lock()
            .await
            .pending_delete
            .ok_or(ClientError::NoPendingDelete)?;

        let result = self.delete_confirmed(order_id).await;
        self.inner.lock().await.pending_delete = None;
        result.map(|()| order_id)
    }

    async fn delete_confirmed(&self, order_id: OrderId) -> Result<(), ClientError> {
        if let Err(err) = self.api.delete_order(order_id).await {
            self.notify_failure(&err, DELETE_FAILED);
            return Err(err);
        }

        info!(%order_id, "deleted order");
        let _ = self.refresh_orders().await;
        let cleared = {
            let mut guard = self.inner.lock().await;
            if guard.editing == Some(order_id) {
                guard.document = None;
                guard.editing = None;
                true
            } else {
                false
            }
        };
        if cleared {
            self.document_changed();
        }
        self.notify(Notification::success(DELETE_OK));
        Ok(())
    }

    /// Refetches the full order list.
    pub async fn refresh_orders(&self) -> Result<usize, ClientError> {
        self.inner.lock().await.loading_orders = true;
        let result = self.api.list_orders().await;

        let mut guard = self.inner.lock().await;
        guard.loading_orders = false;
        match result {
            Ok(orders) => {
                guard.orders.replace(orders);
                let count = guard.orders.len();
                drop(guard);
                debug!(count, "refreshed order list");
                let _ = self.events.send(ControllerEvent::OrdersRefreshed { count });
                Ok(count)
            }
            Err(err) => {
                drop(guard);
                self.notify_failure(&err, LOAD_ORDERS_FAILED);
                Err(err)
            }
        }
    }

    pub async fn set_page(&self, page: usize) -> usize {
        self.inner.lock().await.orders.set_page(page)
    }

    pub async fn next_page(&self) -> usize {
        self.inner.lock().await.orders.next_page()
    }

    pub async fn previous_page(&self) -> usize {
        self.inner.lock().await.orders.previous_page()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
