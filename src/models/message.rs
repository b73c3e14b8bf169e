// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Control-channel and notification payloads exchanged with foreground
//! contexts.

use serde::{de, Deserialize, Serialize};

use crate::models::ResourceTag;

/// Messages the foreground sends to the agent.
///
/// Wire shape is `{"type": "...", "data": {...}}`. Unknown types fail to
/// parse and are logged and ignored at the dispatch site, never treated as
/// fatal.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ControlMessage {
    /// Promote a newly installed agent generation to active immediately.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,

    /// Enqueue a pending mutation for background sync.
    #[serde(rename = "QUEUE_OFFLINE_ACTION")]
    QueueOfflineAction {
        #[serde(rename = "resourceTag")]
        resource_tag: ResourceTag,
        payload: serde_json::Value,
    },

    /// Delete one named store, or all stores if no name given.
    #[serde(rename = "CLEAR_CACHE")]
    ClearCache {
        #[serde(rename = "cacheName", default)]
        cache_name: Option<String>,
    },

    /// Reply with `{storeName: entryCount, ...}` for every store.
    #[serde(rename = "GET_CACHE_STATUS")]
    GetCacheStatus,
}

// Hand-rolled: the adjacently-tagged derive rejects a missing `data` key
// for struct variants, but the wire contract allows `CLEAR_CACHE` without
// one (meaning "clear everything").
impl<'de> Deserialize<'de> for ControlMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            data: serde_json::Value,
        }

        #[derive(Deserialize)]
        struct QueuePayload {
            #[serde(rename = "resourceTag")]
            resource_tag: ResourceTag,
            payload: serde_json::Value,
        }

        #[derive(Deserialize, Default)]
        struct ClearPayload {
            #[serde(rename = "cacheName", default)]
            cache_name: Option<String>,
        }

        let envelope = Envelope::deserialize(deserializer)?;
        match envelope.kind.as_str() {
            "SKIP_WAITING" => Ok(ControlMessage::SkipWaiting),
            "GET_CACHE_STATUS" => Ok(ControlMessage::GetCacheStatus),
            "QUEUE_OFFLINE_ACTION" => {
                let QueuePayload {
                    resource_tag,
                    payload,
                } = serde_json::from_value(envelope.data).map_err(de::Error::custom)?;
                Ok(ControlMessage::QueueOfflineAction {
                    resource_tag,
                    payload,
                })
            }
            "CLEAR_CACHE" => {
                let clear: ClearPayload = if envelope.data.is_null() {
                    ClearPayload::default()
                } else {
                    serde_json::from_value(envelope.data).map_err(de::Error::custom)?
                };
                Ok(ControlMessage::ClearCache {
                    cache_name: clear.cache_name,
                })
            }
            other => Err(de::Error::unknown_variant(
                other,
                &[
                    "SKIP_WAITING",
                    "QUEUE_OFFLINE_ACTION",
                    "CLEAR_CACHE",
                    "GET_CACHE_STATUS",
                ],
            )),
        }
    }
}

/// Messages the agent pushes to all foreground contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// A queued mutation was delivered during a sync drain.
    #[serde(rename = "SYNC_SUCCESS")]
    SyncSuccess {
        #[serde(rename = "type")]
        resource: String,
        id: uuid::Uuid,
    },

    /// A new agent generation took control; requests now route through it.
    #[serde(rename = "CLIENTS_CLAIMED")]
    ClientsClaimed { generation: String },
}

/// A user-facing notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    pub tag: String,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
    pub data: NotificationData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
    /// Milliseconds since the epoch, matching the foreground's clock.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_skip_waiting() {
        let msg: ControlMessage = serde_json::from_str(r#"{"type":"SKIP_WAITING"}"#).unwrap();
        assert!(matches!(msg, ControlMessage::SkipWaiting));
    }

    #[test]
    fn parses_queue_offline_action() {
        let msg: ControlMessage = serde_json::from_str(
            r#"{"type":"QUEUE_OFFLINE_ACTION","data":{"resourceTag":"meal","payload":{"calories":300}}}"#,
        )
        .unwrap();
        match msg {
            ControlMessage::QueueOfflineAction {
                resource_tag,
                payload,
            } => {
                assert_eq!(resource_tag, ResourceTag::Meal);
                assert_eq!(payload["calories"], 300);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn clear_cache_data_key_may_be_omitted() {
        // Clear-everything form: no data key at all
        let msg: ControlMessage = serde_json::from_str(r#"{"type":"CLEAR_CACHE"}"#).unwrap();
        assert!(matches!(
            msg,
            ControlMessage::ClearCache { cache_name: None }
        ));
    }

    #[test]
    fn clear_cache_name_is_optional() {
        let msg: ControlMessage =
            serde_json::from_str(r#"{"type":"CLEAR_CACHE","data":{}}"#).unwrap();
        assert!(matches!(
            msg,
            ControlMessage::ClearCache { cache_name: None }
        ));

        let msg: ControlMessage = serde_json::from_str(
            r#"{"type":"CLEAR_CACHE","data":{"cacheName":"gymsync-dynamic-v1.0.0"}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ControlMessage::ClearCache { cache_name: Some(n) } if n == "gymsync-dynamic-v1.0.0"
        ));
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let result = serde_json::from_str::<ControlMessage>(r#"{"type":"REBOOT_EVERYTHING"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sync_success_wire_shape() {
        let msg = ClientMessage::SyncSuccess {
            resource: "workout".to_string(),
            id: uuid::Uuid::nil(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "SYNC_SUCCESS");
        assert_eq!(json["data"]["type"], "workout");
    }
}
