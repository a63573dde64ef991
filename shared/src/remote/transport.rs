use crate::{
    remote::{call::RemoteMethodCall, error::TransportError, results::InvocationResult},
    PeerId,
};

/// Results one peer produced for a forwarded invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerResponse {
    pub peer: PeerId,
    pub results: Vec<InvocationResult>,
}

/// The network fabric a [`RemoteMessenger`](crate::RemoteMessenger) fans
/// invocations out through.
///
/// Implementations deliver each forwarded call to the receiving node's
/// `RemoteMessenger::take_ticket` in arrival order, then to
/// `RemoteMessenger::on_incoming_invocation`.
pub trait PeerTransport: Send + Sync {
    /// Forwards `call` to every connected peer implementing `service_name`
    fn send_to_peers(
        &self,
        service_name: &str,
        call: &RemoteMethodCall,
    ) -> Result<Vec<PeerResponse>, TransportError>;

    /// Tells the peers this node now implements `service_name`
    fn announce(&self, service_name: &str) -> Result<(), TransportError>;

    /// Tells the peers this node no longer implements `service_name`
    fn withdraw(&self, service_name: &str) -> Result<(), TransportError>;

    /// Whether any connected peer implements `service_name`
    fn has_remote_implementors(&self, service_name: &str) -> bool;

    fn is_connected(&self) -> bool;
}

// LocalOnlyTransport
/// Transport of a node that plays alone: nothing is forwarded anywhere
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalOnlyTransport;

impl PeerTransport for LocalOnlyTransport {
    fn send_to_peers(
        &self,
        _service_name: &str,
        _call: &RemoteMethodCall,
    ) -> Result<Vec<PeerResponse>, TransportError> {
        Ok(Vec::new())
    }

    fn announce(&self, _service_name: &str) -> Result<(), TransportError> {
        Ok(())
    }

    fn withdraw(&self, _service_name: &str) -> Result<(), TransportError> {
        Ok(())
    }

    fn has_remote_implementors(&self, _service_name: &str) -> bool {
        false
    }

    fn is_connected(&self) -> bool {
        true
    }
}
