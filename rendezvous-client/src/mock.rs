//! In-process doubles for the RTC collaborator and the signaling output.

use crate::error::{ConnectionError, RtcError};
use crate::signaling::SignalingOutput;
use crate::transport::{ChannelHandle, RtcPeer};
use async_trait::async_trait;
use bytes::Bytes;
use rendezvous_core::{IceCandidate, SdpKind, SessionDescription, SignalMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) const MOCK_OFFER: &str = "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=mock-offer\r\n";
pub(crate) const MOCK_ANSWER: &str = "v=0\r\no=- 2 1 IN IP4 127.0.0.1\r\ns=mock-answer\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RtcCall {
    CreateOffer,
    CreateAnswer,
    SetLocal(SdpKind),
    SetRemote(SdpKind),
    AddCandidate(String),
    CreateChannel(String),
    Close,
}

#[derive(Default)]
pub(crate) struct MockPeer {
    calls: Mutex<Vec<RtcCall>>,
    channels: Mutex<Vec<Arc<MockChannel>>>,
    pub(crate) reject_remote: AtomicBool,
}

impl MockPeer {
    pub(crate) fn calls(&self) -> Vec<RtcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn candidates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RtcCall::AddCandidate(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn channel(&self, label: &str) -> Option<Arc<MockChannel>> {
        self.channels
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.label == label)
            .cloned()
    }

    fn record(&self, call: RtcCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RtcPeer for MockPeer {
    async fn create_offer(&self) -> Result<SessionDescription, RtcError> {
        self.record(RtcCall::CreateOffer);
        Ok(SessionDescription::offer(MOCK_OFFER))
    }

    async fn create_answer(&self) -> Result<SessionDescription, RtcError> {
        self.record(RtcCall::CreateAnswer);
        Ok(SessionDescription::answer(MOCK_ANSWER))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        self.record(RtcCall::SetLocal(desc.kind));
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), RtcError> {
        self.record(RtcCall::SetRemote(desc.kind));
        if self.reject_remote.load(Ordering::SeqCst) {
            return Err(RtcError::Engine("remote description rejected".to_string()));
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), RtcError> {
        self.record(RtcCall::AddCandidate(candidate.candidate));
        Ok(())
    }

    async fn create_data_channel(&self, label: &str) -> Result<Arc<dyn ChannelHandle>, RtcError> {
        self.record(RtcCall::CreateChannel(label.to_string()));
        let channel = MockChannel::new(label);
        self.channels.lock().unwrap().push(channel.clone());
        Ok(channel)
    }

    async fn close(&self) -> Result<(), RtcError> {
        self.record(RtcCall::Close);
        Ok(())
    }
}

pub(crate) struct MockChannel {
    label: String,
    sent: Mutex<Vec<Bytes>>,
    closed: AtomicBool,
}

impl MockChannel {
    pub(crate) fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub(crate) fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChannelHandle for MockChannel {
    fn label(&self) -> &str {
        &self.label
    }

    async fn send(&self, data: Bytes) -> Result<(), RtcError> {
        self.sent.lock().unwrap().push(data);
        Ok(())
    }

    async fn close(&self) -> Result<(), RtcError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingOutput {
    sent: Mutex<Vec<SignalMessage>>,
    pub(crate) fail: AtomicBool,
}

impl RecordingOutput {
    pub(crate) fn sent(&self) -> Vec<SignalMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalingOutput for RecordingOutput {
    async fn send_signal(&self, msg: SignalMessage) -> Result<(), ConnectionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConnectionError::Closed);
        }
        self.sent.lock().unwrap().push(msg);
        Ok(())
    }
}
