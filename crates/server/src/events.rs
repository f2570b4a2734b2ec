//! Change notifications for live dashboards.
//!
//! Every successful mutation is published on a broadcast channel; each
//! WebSocket client holds its own receiver and filters by topic.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use models::store;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::metrics::EVENTS_PUBLISHED_TOTAL;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Site,
    Store,
    LabBox,
    FishPond,
    Cage,
    Feeding,
    WaterChange,
    Medication,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Site,
        Topic::Store,
        Topic::LabBox,
        Topic::FishPond,
        Topic::Cage,
        Topic::Feeding,
        Topic::WaterChange,
        Topic::Medication,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Site => "site",
            Topic::Store => "store",
            Topic::LabBox => "lab_box",
            Topic::FishPond => "fish_pond",
            Topic::Cage => "cage",
            Topic::Feeding => "feeding",
            Topic::WaterChange => "water_change",
            Topic::Medication => "medication",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown topic '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Created,
    Updated,
    Deleted,
    Restocked,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub topic: Topic,
    pub action: Action,
    pub id: Uuid,
    /// Entity after the change; `null` for deletions
    pub data: serde_json::Value,
    pub at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Publish one event; returns how many clients received it.
    pub fn publish<T: Serialize>(&self, topic: Topic, action: Action, id: Uuid, data: Option<&T>) -> usize {
        let data = match data.map(serde_json::to_value).transpose() {
            Ok(v) => v.unwrap_or(serde_json::Value::Null),
            Err(e) => {
                warn!(%topic, %id, error = %e, "event_payload_encode_failed");
                serde_json::Value::Null
            }
        };
        self.send(ChangeEvent { topic, action, id, data, at: Utc::now() })
    }

    pub fn deleted(&self, topic: Topic, id: Uuid) -> usize {
        self.publish::<()>(topic, Action::Deleted, id, None)
    }

    /// Store events carry the derived `low_stock` flag next to the row.
    pub fn store_changed(&self, action: Action, store: &store::Model) -> usize {
        let mut data = serde_json::to_value(store).unwrap_or(serde_json::Value::Null);
        if let Some(obj) = data.as_object_mut() {
            obj.insert("low_stock".into(), serde_json::Value::Bool(store.is_low()));
        }
        self.send(ChangeEvent { topic: Topic::Store, action, id: store.id, data, at: Utc::now() })
    }

    fn send(&self, event: ChangeEvent) -> usize {
        EVENTS_PUBLISHED_TOTAL.with_label_values(&[event.topic.as_str()]).inc();
        let topic = event.topic;
        // 没有订阅者时 send 返回 Err，属于正常情况
        let delivered = self.tx.send(event).unwrap_or(0);
        debug!(%topic, delivered, "event_published");
        delivered
    }
}

/// Topics a client asked for; empty means everything.
#[derive(Clone, Debug, Default)]
pub struct TopicFilter(Option<HashSet<Topic>>);

impl TopicFilter {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let topics = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Topic::from_str)
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(if topics.is_empty() { Self(None) } else { Self(Some(topics)) })
    }

    pub fn matches(&self, topic: Topic) -> bool {
        self.0.as_ref().map_or(true, |set| set.contains(&topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    #[test]
    fn filter_parses_known_topics() {
        let f = TopicFilter::parse("feeding, store").unwrap();
        assert!(f.matches(Topic::Feeding));
        assert!(f.matches(Topic::Store));
        assert!(!f.matches(Topic::Site));

        let all = TopicFilter::parse("").unwrap();
        assert!(Topic::ALL.iter().all(|t| all.matches(*t)));

        assert!(TopicFilter::parse("feeding,weather").is_err());
    }

    #[test]
    fn topics_round_trip_through_names() {
        for t in Topic::ALL {
            assert_eq!(t.as_str().parse::<Topic>().unwrap(), t);
            assert_eq!(serde_json::to_value(t).unwrap(), t.as_str());
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let hub = EventHub::new(4);
        assert_eq!(hub.deleted(Topic::Cage, Uuid::new_v4()), 0);
    }

    #[tokio::test]
    async fn subscribers_receive_events() {
        let hub = EventHub::new(4);
        let mut rx = hub.subscribe();
        let id = Uuid::new_v4();
        hub.publish(Topic::Site, Action::Created, id, Some(&serde_json::json!({"name": "North"})));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.topic, Topic::Site);
        assert_eq!(ev.action, Action::Created);
        assert_eq!(ev.id, id);
        assert_eq!(ev.data["name"], "North");
    }

    #[tokio::test]
    async fn slow_subscriber_lags_then_continues() {
        let hub = EventHub::new(2);
        let mut rx = hub.subscribe();
        for _ in 0..5 {
            hub.deleted(Topic::Feeding, Uuid::new_v4());
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        assert!(rx.recv().await.is_ok());
    }
}
