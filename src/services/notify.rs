// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification dispatcher: user-facing reminders and their actions.
//!
//! Reminders fan out over a broadcast channel that foreground contexts
//! subscribe to. "Remind later" schedules a follow-up as a real task whose
//! handle is returned, so callers and tests can await the reschedule
//! instead of racing a timer.

use chrono::Utc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::models::{Notification, NotificationAction, NotificationData};

/// Route opened by the reminder's primary action.
const WORKOUT_ROUTE: &str = "/workouts";

/// Issues reminders and resolves notification actions.
pub struct NotificationDispatcher {
    notifications: broadcast::Sender<Notification>,
    remind_later_delay: Duration,
}

/// What the foreground should do in response to a notification action.
#[derive(Debug)]
pub enum NotificationOutcome {
    /// Open the given route.
    OpenUrl(String),
    /// A follow-up reminder was scheduled; the handle resolves when it has
    /// been dispatched.
    FollowUpScheduled(JoinHandle<()>),
}

impl NotificationDispatcher {
    pub fn new(remind_later_delay: Duration) -> Self {
        let (notifications, _) = broadcast::channel(16);
        Self {
            notifications,
            remind_later_delay,
        }
    }

    /// Subscribe to dispatched notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// The streak reminder shown on a push trigger.
    pub fn workout_reminder(&self) -> Notification {
        Notification {
            title: "GymSync Reminder".to_string(),
            body: "Don't break your streak! Time for your workout 💪".to_string(),
            icon: "/icons/icon-192x192.png".to_string(),
            badge: Some("/icons/icon-96x96.png".to_string()),
            tag: "workout-reminder".to_string(),
            actions: vec![
                NotificationAction {
                    action: "start-workout".to_string(),
                    title: "Start Workout".to_string(),
                    icon: Some("/icons/action-workout.png".to_string()),
                },
                NotificationAction {
                    action: "remind-later".to_string(),
                    title: "Remind Later".to_string(),
                    icon: Some("/icons/action-later.png".to_string()),
                },
            ],
            data: NotificationData {
                url: WORKOUT_ROUTE.to_string(),
                timestamp: Utc::now().timestamp_millis(),
            },
        }
    }

    /// Dispatch the workout reminder to all subscribers.
    pub fn push_reminder(&self) -> Notification {
        let reminder = self.workout_reminder();
        let delivered = self.notifications.send(reminder.clone()).unwrap_or(0);
        tracing::info!(subscribers = delivered, tag = %reminder.tag, "Reminder dispatched");
        reminder
    }

    /// Resolve a notification action chosen by the user.
    pub fn handle_action(&self, action: &str, notification: &Notification) -> NotificationOutcome {
        match action {
            "start-workout" => NotificationOutcome::OpenUrl(WORKOUT_ROUTE.to_string()),
            "remind-later" => {
                let sender = self.notifications.clone();
                let delay = self.remind_later_delay;
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let follow_up = Notification {
                        title: "GymSync Reminder".to_string(),
                        body: "Still time for that workout! 🏋️".to_string(),
                        icon: "/icons/icon-192x192.png".to_string(),
                        badge: None,
                        tag: "workout-reminder-later".to_string(),
                        actions: Vec::new(),
                        data: NotificationData {
                            url: WORKOUT_ROUTE.to_string(),
                            timestamp: Utc::now().timestamp_millis(),
                        },
                    };
                    let _ = sender.send(follow_up);
                });
                NotificationOutcome::FollowUpScheduled(handle)
            }
            // Default action: open the URL the notification carries.
            _ => {
                let url = if notification.data.url.is_empty() {
                    "/".to_string()
                } else {
                    notification.data.url.clone()
                };
                NotificationOutcome::OpenUrl(url)
            }
        }
    }
}
