use std::sync::Arc;

use log::warn;

use crate::remote::{
    call::RemoteMethodCall,
    error::MessengerError,
    interface::RemoteName,
    messenger::RemoteMessenger,
    value::RemoteValue,
};

// RemoteHandle
/// Caller side of a point-to-point remote. Calls go through the messenger, so
/// the caller never knows whether the implementor is local or on a peer.
#[derive(Clone)]
pub struct RemoteHandle {
    messenger: Arc<RemoteMessenger>,
    name: RemoteName,
}

impl RemoteHandle {
    pub(crate) fn new(messenger: Arc<RemoteMessenger>, name: RemoteName) -> Self {
        Self { messenger, name }
    }

    pub fn name(&self) -> &RemoteName {
        &self.name
    }

    /// Calls `method` on the single implementor of this remote and returns
    /// its value
    pub fn invoke(
        &self,
        method: &str,
        args: Vec<RemoteValue>,
    ) -> Result<RemoteValue, MessengerError> {
        let call = RemoteMethodCall::new(self.name.name(), method, args);
        call.resolve(self.name.interface())?;

        let mut results = self.messenger.invoke_and_wait(&call)?;
        if results.len() > 1 {
            return Err(MessengerError::AmbiguousResult {
                name: self.name.name().to_string(),
                method: method.to_string(),
                count: results.len(),
            });
        }
        let Some(result) = results.pop() else {
            // the implementor went away between resolution and the call
            return Err(MessengerError::NoSuchRemote {
                name: self.name.name().to_string(),
            });
        };

        result
            .into_result()
            .map_err(|fault| MessengerError::RemoteFault {
                name: self.name.name().to_string(),
                method: method.to_string(),
                fault,
            })
    }
}

// ChannelBroadcaster
/// Caller side of a broadcast channel: every call fans out to all local and
/// remote subscribers, in the channel's global order
#[derive(Clone)]
pub struct ChannelBroadcaster {
    messenger: Arc<RemoteMessenger>,
    channel: RemoteName,
}

impl ChannelBroadcaster {
    pub(crate) fn new(messenger: Arc<RemoteMessenger>, channel: RemoteName) -> Self {
        Self { messenger, channel }
    }

    pub fn channel(&self) -> &RemoteName {
        &self.channel
    }

    /// Broadcasts `method` to every subscriber and returns how many were
    /// reached. A failing subscriber is logged and does not fail the
    /// broadcast.
    pub fn broadcast(&self, method: &str, args: Vec<RemoteValue>) -> Result<usize, MessengerError> {
        let call = RemoteMethodCall::new(self.channel.name(), method, args);
        call.resolve(self.channel.interface())?;

        let results = self.messenger.invoke_and_wait(&call)?;
        for fault in results.iter().filter_map(|result| result.fault()) {
            warn!("subscriber of {} failed: {}", call, fault);
        }
        Ok(results.len())
    }
}
