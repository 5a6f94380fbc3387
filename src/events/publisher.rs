use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dispatch::DispatchSummary;

/// Something observable that happened during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DispatchEvent {
    RunStarted {
        run_id: Uuid,
        batch_count: usize,
        number_of_items: usize,
    },
    /// The service admitted and processed a batch of `items`
    Processed { items: usize },
    /// The service refused a batch for exceeding its capacity
    Blocked {
        batch_index: usize,
        items: usize,
        limit: u64,
    },
    RunFinished { summary: DispatchSummary },
}

/// Event that has been published
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub event: DispatchEvent,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

/// Broadcast publisher for dispatch events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: DispatchEvent) {
        let published = PublishedEvent {
            event,
            published_at: chrono::Utc::now(),
        };

        if let Err(broadcast::error::SendError(dropped)) = self.sender.send(published) {
            tracing::trace!(event = ?dropped.event, "No event subscribers");
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = EventPublisher::default();
        assert_eq!(publisher.subscriber_count(), 0);
        publisher.publish(DispatchEvent::Processed { items: 3 });
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();

        publisher.publish(DispatchEvent::Processed { items: 25 });
        publisher.publish(DispatchEvent::Blocked {
            batch_index: 1,
            items: 30,
            limit: 25,
        });

        assert_eq!(
            rx.recv().await.unwrap().event,
            DispatchEvent::Processed { items: 25 }
        );
        assert_eq!(
            rx.recv().await.unwrap().event,
            DispatchEvent::Blocked {
                batch_index: 1,
                items: 30,
                limit: 25
            }
        );
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(DispatchEvent::Processed { items: 19 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "processed", "items": 19}));
    }
}
