use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::SubscriberEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// A message for the user, e.g. a toast on the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// Surfaces the outcome of a signup to the user. Called synchronously by the
/// controller; how (or whether) the notification is rendered is up to the
/// implementor.
pub trait Notifier {
    fn notify(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    );
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) {
        (**self).notify(kind, title, message)
    }
}

/// Writes notifications as log events. Used by the `signup` binary, where
/// the terminal is the only presentation surface.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) {
        match kind {
            NotificationKind::Info => tracing::info!(notification.title = %title, "{message}"),
            NotificationKind::Error => tracing::error!(notification.title = %title, "{message}"),
        }
    }
}

/// Forwards notifications to whichever task renders them. Notifications sent
/// after the receiver is dropped are discarded.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(
        &self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) {
        let notification = Notification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        };
        if self.sender.send(notification).is_err() {
            tracing::debug!("notification receiver dropped");
        }
    }
}

/// User-facing texts. `Default` holds the landing page form's texts.
///
/// `{email}` in `success` is replaced with the submitted address.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Messages {
    pub invalid_email_title: String,
    pub invalid_email: String,
    pub success_title: String,
    pub success: String,
    pub failure_title: String,
    /// Used when the registrar gives no detail of its own
    pub failure: String,
    pub timeout: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            invalid_email_title: "Email inválido".into(),
            invalid_email: "Por favor, insira um email válido.".into(),
            success_title: "Sucesso!".into(),
            success: "Você foi inscrito na nossa newsletter.".into(),
            failure_title: "Erro".into(),
            failure: "Erro ao processar inscrição. Tente novamente.".into(),
            timeout: "Tempo limite excedido. Verifique sua conexão e tente novamente.".into(),
        }
    }
}

impl Messages {
    /// Texts for the dialog that resends the past issue `newsletter` (its
    /// title, or its id when no title is known)
    pub fn resend(newsletter: &str) -> Self {
        Self {
            success_title: "Newsletter enviada!".into(),
            success: format!("A newsletter \"{newsletter}\" foi enviada para {{email}}"),
            failure: "Erro ao enviar newsletter. Tente novamente.".into(),
            ..Self::default()
        }
    }

    pub fn success_for(
        &self,
        email: &SubscriberEmail,
    ) -> String {
        self.success.replace("{email}", email.as_ref())
    }
}
