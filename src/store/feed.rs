use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::model::Score;

pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// A change to the score collection, as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoreEvent {
    Inserted {
        score: Score,
    },
    Updated {
        score: Score,
    },
    #[serde(rename_all = "camelCase")]
    Deleted {
        project_id: String,
        judge_id: String,
        deleted_at: DateTime<Utc>,
    },
}

impl ScoreEvent {
    /// The (project_id, judge_id) key this event refers to
    pub fn key(&self) -> (&str, &str) {
        match self {
            ScoreEvent::Inserted { score } | ScoreEvent::Updated { score } => score.key(),
            ScoreEvent::Deleted {
                project_id,
                judge_id,
                ..
            } => (project_id, judge_id),
        }
    }
}

/// Fan-out of score events to any number of subscribers.
///
/// Delivery is at-least-once per subscriber while it keeps up. A subscriber
/// that falls more than `capacity` events behind is told it lagged and must
/// reload its snapshot. There is no ordering guarantee across keys.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ScoreEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Returns how many subscribers will see it.
    pub fn publish(&self, event: ScoreEvent) -> usize {
        // send only fails when nobody is subscribed
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> ScoreFeed {
        ScoreFeed {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Event(ScoreEvent),
    /// Some events were dropped; the local snapshot can no longer be trusted
    Lagged(u64),
    Closed,
}

#[derive(Debug)]
pub struct ScoreFeed {
    rx: broadcast::Receiver<ScoreEvent>,
}

impl ScoreFeed {
    pub async fn next(&mut self) -> FeedMessage {
        match self.rx.recv().await {
            Ok(event) => FeedMessage::Event(event),
            Err(RecvError::Lagged(skipped)) => FeedMessage::Lagged(skipped),
            Err(RecvError::Closed) => FeedMessage::Closed,
        }
    }

    /// Next message if one is already queued
    pub fn try_next(&mut self) -> Option<FeedMessage> {
        match self.rx.try_recv() {
            Ok(event) => Some(FeedMessage::Event(event)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Lagged(skipped)) => Some(FeedMessage::Lagged(skipped)),
            Err(TryRecvError::Closed) => Some(FeedMessage::Closed),
        }
    }
}
