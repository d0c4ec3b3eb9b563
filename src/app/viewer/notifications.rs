use egui::{Color32, Context, RichText};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Error,
    Warning,
    Success,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub expires_at: Option<Instant>,
}

impl Notification {
    pub fn new_error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            notification_type: NotificationType::Error,
            created_at: Instant::now(),
            expires_at: None, // Errors don't auto-expire
        }
    }

    pub fn new_warning(message: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            message: message.into(),
            notification_type: NotificationType::Warning,
            created_at: now,
            expires_at: Some(now + Duration::from_secs(8)),
        }
    }

    pub fn new_success(message: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            message: message.into(),
            notification_type: NotificationType::Success,
            created_at: now,
            expires_at: Some(now + Duration::from_secs(5)),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    pub fn color(&self) -> Color32 {
        match self.notification_type {
            NotificationType::Error => Color32::from_rgb(220, 50, 50),
            NotificationType::Warning => Color32::from_rgb(255, 150, 0),
            NotificationType::Success => Color32::from_rgb(40, 180, 40),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.notification_type {
            NotificationType::Error => "✗",
            NotificationType::Warning => "⚠",
            NotificationType::Success => "✓",
        }
    }
}

/// Stack of transient messages shown in the bottom-right corner; stands in for
/// browser alerts.
#[derive(Default)]
pub struct NotificationManager {
    notifications: Vec<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.notifications.len() {
            self.notifications.remove(index);
        }
    }

    pub fn prune_expired(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired_at(now));
    }

    pub fn show(&mut self, ctx: &Context) {
        self.prune_expired(Instant::now());
        if self.notifications.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("aztags_notifications"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (index, notification) in self.notifications.iter().enumerate() {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(
                                RichText::new(notification.icon())
                                    .color(notification.color())
                                    .strong(),
                            );
                            ui.label(notification.message.as_str());
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(index);
                            }
                        });
                    });
                }
            });

        if let Some(index) = dismissed {
            self.dismiss(index);
        }

        // Keep repainting so expiring notices disappear on time
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}
