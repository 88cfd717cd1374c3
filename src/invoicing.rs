use actix_web::web;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{
    db_interaction::invoices::create_invoice_for_order,
    utils::{get_pooled_connection, DbPool},
};

// Handle given to request handlers; the receiving worker owns all invoice writes
#[derive(Clone)]
pub struct InvoiceIssuer{
    sender: UnboundedSender<i32>
}

impl InvoiceIssuer {
    pub fn start(pool: web::Data<DbPool>) -> Self {
        let (sender, receiver) = unbounded_channel();
        tokio::spawn(run_invoice_worker(pool, receiver));
        Self{ sender }
    }

    // Never fails the caller, a closed worker is only logged
    pub fn request(&self, order_id: i32) {
        if self.sender.send(order_id).is_err() {
            tracing::error!(order_id, "Invoice worker is not running, invoice dropped");
        }
    }
}

async fn run_invoice_worker(pool: web::Data<DbPool>, mut receiver: UnboundedReceiver<i32>) {
    while let Some(order_id) = receiver.recv().await {
        issue_invoice(&pool, order_id).await;
    }
}

#[tracing::instrument("Issuing invoice", skip(pool))]
async fn issue_invoice(pool: &web::Data<DbPool>, order_id: i32) {
    let conn = match get_pooled_connection(pool).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = ?e, "Could not get a connection to issue invoice");
            return;
        }
    };

    match create_invoice_for_order(conn, order_id).await {
        Ok(number) => tracing::info!(number = %number, "Invoice issued"),
        Err(e) => tracing::error!(error = ?e, "Failed to issue invoice")
    }
}
