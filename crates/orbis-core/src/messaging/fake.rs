use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    domain::{ChannelId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::OutboundReply,
    },
    Result,
};

/// Records every send; optionally fails them all.
#[derive(Default)]
pub(crate) struct FakeMessenger {
    pub sends: Mutex<Vec<OutboundReply>>,
    pub fail: bool,
}

impl FakeMessenger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundReply> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<MessageRef> {
        if self.fail {
            return Err(Error::External("send failed".to_string()));
        }
        let mut sends = self.sends.lock().unwrap();
        sends.push(OutboundReply {
            channel_id,
            text: text.to_string(),
        });
        Ok(MessageRef {
            channel_id,
            message_id: MessageId(sends.len() as u64),
        })
    }
}
