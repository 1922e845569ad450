//! Change notifications fired after successful product mutations.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductEvent {
    Created { id: String },
    StatusUpdated { id: String },
    Updated { id: String },
    Deleted { id: String },
}

impl ProductEvent {
    pub fn product_id(&self) -> &str {
        match self {
            ProductEvent::Created { id }
            | ProductEvent::StatusUpdated { id }
            | ProductEvent::Updated { id }
            | ProductEvent::Deleted { id } => id,
        }
    }
}

/// Typed broadcast channel handed to publishers and subscribers explicitly.
#[derive(Debug, Clone)]
pub struct ProductEvents {
    tx: broadcast::Sender<ProductEvent>,
}

impl ProductEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProductEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: ProductEvent) {
        // No subscribers is not an error.
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(?event, "product event dropped, no subscribers");
        }
    }
}

impl Default for ProductEvents {
    fn default() -> Self {
        Self::new()
    }
}
