//! Inbound event loop: turns the platform event queue into handler calls.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    config::ModerationConfig,
    handler::MessageHandler,
    messaging::{port::MessagingPort, types::InboundEvent},
};

/// Consume `inbound` until the queue closes or `shutdown` is cancelled.
///
/// The handler is built on the first `Ready` event (the bot's own id is only
/// known after login) and rebuilt on every later one. Messages are handled
/// in their own tasks. On cancellation the queue is closed and whatever is
/// already buffered is still handled; in-flight replies are awaited before
/// returning.
pub async fn run_event_loop(
    moderation: ModerationConfig,
    messenger: Arc<dyn MessagingPort>,
    mut inbound: mpsc::Receiver<InboundEvent>,
    shutdown: CancellationToken,
) {
    let mut state = LoopState {
        moderation,
        messenger,
        handler: None,
        tasks: JoinSet::new(),
    };

    loop {
        let event = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("event loop cancelled, draining queue");
                inbound.close();
                while let Some(ev) = inbound.recv().await {
                    state.on_event(ev);
                }
                break;
            }
            ev = inbound.recv() => match ev {
                Some(ev) => ev,
                None => {
                    debug!("inbound queue closed");
                    break;
                }
            },
        };

        state.on_event(event);
        state.reap();
    }

    while let Some(res) = state.tasks.join_next().await {
        if let Err(e) = res {
            warn!("reply task failed: {e}");
        }
    }
}

struct LoopState {
    moderation: ModerationConfig,
    messenger: Arc<dyn MessagingPort>,
    handler: Option<Arc<MessageHandler>>,
    tasks: JoinSet<()>,
}

impl LoopState {
    fn on_event(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Ready(me) => {
                info!("logged in as {} ({}).", me.name.to_lowercase(), me.id.0);
                info!("orbis is now operational.");
                self.handler = Some(Arc::new(MessageHandler::new(self.moderation, me.id)));
            }
            InboundEvent::Message(msg) => {
                let Some(h) = self.handler.clone() else {
                    warn!(channel = msg.channel_id.0, "message before ready, dropped");
                    return;
                };
                let messenger = self.messenger.clone();
                self.tasks.spawn(async move {
                    match h.handle(&msg, messenger.as_ref()).await {
                        Ok(Some(sent)) => debug!(
                            channel = sent.channel_id.0,
                            message = sent.message_id.0,
                            "reply sent"
                        ),
                        Ok(None) => {}
                        Err(e) => {
                            warn!(channel = msg.channel_id.0, "failed to send reply: {e}")
                        }
                    }
                });
            }
        }
    }

    fn reap(&mut self) {
        while let Some(res) = self.tasks.try_join_next() {
            if let Err(e) = res {
                warn!("reply task failed: {e}");
            }
        }
    }
}
