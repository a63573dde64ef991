//! In-memory transport connecting several messengers in one process.
//! Invocations are delivered synchronously on the calling thread, without
//! network I/O.

use std::{
    collections::{BTreeMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use log::debug;

use skirmish_shared::{
    PeerId, PeerResponse, PeerTransport, RemoteMessenger, RemoteMethodCall, TransportError,
};

struct Node {
    messenger: Weak<RemoteMessenger>,
    services: HashSet<String>,
    connected: bool,
}

/// Hub every joined messenger is connected through
#[derive(Default)]
pub struct LocalHub {
    nodes: Mutex<BTreeMap<PeerId, Node>>,
}

impl LocalHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Creates the messenger of `peer`, connected to every other node
    pub fn join(self: &Arc<Self>, peer: PeerId) -> Arc<RemoteMessenger> {
        let transport = Arc::new(LocalTransport {
            hub: self.clone(),
            peer: peer.clone(),
        });
        let messenger = Arc::new(RemoteMessenger::new(peer.clone(), transport));
        self.lock().insert(
            peer,
            Node {
                messenger: Arc::downgrade(&messenger),
                services: HashSet::new(),
                connected: true,
            },
        );
        messenger
    }

    /// Cuts `peer` off: its services vanish for the others and its own
    /// transport reports the connection lost
    pub fn disconnect(&self, peer: &PeerId) {
        if let Some(node) = self.lock().get_mut(peer) {
            node.connected = false;
            node.services.clear();
        }
    }

    pub fn connected_peers(&self) -> Vec<PeerId> {
        self.lock()
            .iter()
            .filter(|(_, node)| node.connected)
            .map(|(peer, _)| peer.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PeerId, Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_connected(&self, peer: &PeerId) -> bool {
        self.lock().get(peer).is_some_and(|node| node.connected)
    }

    // connected nodes other than `from` implementing `service_name`
    fn implementors(
        &self,
        from: &PeerId,
        service_name: &str,
    ) -> Vec<(PeerId, Arc<RemoteMessenger>)> {
        self.lock()
            .iter()
            .filter(|(peer, node)| {
                *peer != from && node.connected && node.services.contains(service_name)
            })
            .filter_map(|(peer, node)| {
                node.messenger
                    .upgrade()
                    .map(|messenger| (peer.clone(), messenger))
            })
            .collect()
    }

    fn set_service(&self, peer: &PeerId, service_name: &str, offered: bool) {
        if let Some(node) = self.lock().get_mut(peer) {
            if offered {
                node.services.insert(service_name.to_string());
            } else {
                node.services.remove(service_name);
            }
        }
    }
}

// LocalTransport
/// [`PeerTransport`] of one node of a [`LocalHub`]
pub struct LocalTransport {
    hub: Arc<LocalHub>,
    peer: PeerId,
}

impl PeerTransport for LocalTransport {
    fn send_to_peers(
        &self,
        service_name: &str,
        call: &RemoteMethodCall,
    ) -> Result<Vec<PeerResponse>, TransportError> {
        if !self.hub.is_connected(&self.peer) {
            return Err(TransportError::ConnectionLost);
        }

        let mut responses = Vec::new();
        for (peer, messenger) in self.hub.implementors(&self.peer, service_name) {
            let Some(inbound) = messenger.take_ticket(service_name) else {
                continue;
            };
            debug!("{} -> {}: {}", self.peer, peer, call);
            let results = messenger
                .on_incoming_invocation(call, inbound, &self.peer)
                .map_err(|err| TransportError::DeliveryFailed {
                    service: service_name.to_string(),
                    peer: peer.to_string(),
                    reason: err.to_string(),
                })?;
            responses.push(PeerResponse { peer, results });
        }
        Ok(responses)
    }

    fn announce(&self, service_name: &str) -> Result<(), TransportError> {
        self.hub.set_service(&self.peer, service_name, true);
        Ok(())
    }

    fn withdraw(&self, service_name: &str) -> Result<(), TransportError> {
        self.hub.set_service(&self.peer, service_name, false);
        Ok(())
    }

    fn has_remote_implementors(&self, service_name: &str) -> bool {
        !self.hub.implementors(&self.peer, service_name).is_empty()
    }

    fn is_connected(&self) -> bool {
        self.hub.is_connected(&self.peer)
    }
}
