use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};

use crate::{
    remote::{
        call::RemoteMethodCall,
        endpoint::ServiceEndpoint,
        error::{EndpointError, MessengerError},
        handle::{ChannelBroadcaster, RemoteHandle},
        interface::{RemoteHandler, RemoteName},
        registry::EndpointRegistry,
        results::InvocationResult,
        ticket_queue::Ticket,
        transport::PeerTransport,
    },
    PeerId,
};

// InboundTicket
/// Place in line of an invocation that arrived from the network, bound to
/// the endpoint that issued it. Dispatching through the token keeps the
/// ticket on that endpoint even if the service is withdrawn and
/// registered again in between.
#[derive(Clone, Debug)]
pub struct InboundTicket {
    endpoint: Arc<ServiceEndpoint>,
    ticket: Ticket,
}

impl InboundTicket {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn service_name(&self) -> &str {
        self.endpoint.name()
    }
}

// RemoteMessenger
/// One node's view of the dispatch layer.
///
/// Local handlers live in endpoints of the registry; invocations are
/// dispatched to them and forwarded to peers through the transport.
/// Point-to-point remotes are registered on multi-threaded endpoints,
/// broadcast channels on single-threaded (ordered) ones.
pub struct RemoteMessenger {
    local_peer: PeerId,
    registry: EndpointRegistry,
    transport: Arc<dyn PeerTransport>,
    // serializes registration changes with endpoint creation and removal
    registration: Mutex<()>,
}

impl RemoteMessenger {
    pub fn new(local_peer: PeerId, transport: Arc<dyn PeerTransport>) -> Self {
        Self {
            local_peer,
            registry: EndpointRegistry::new(),
            transport,
            registration: Mutex::new(()),
        }
    }

    pub fn local_peer(&self) -> &PeerId {
        &self.local_peer
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn register_remote(
        &self,
        name: &RemoteName,
        handler: Arc<dyn RemoteHandler>,
    ) -> Result<(), MessengerError> {
        self.add_handler(name, handler, false)
    }

    pub fn register_channel_subscriber(
        &self,
        channel: &RemoteName,
        handler: Arc<dyn RemoteHandler>,
    ) -> Result<(), MessengerError> {
        self.add_handler(channel, handler, true)
    }

    fn add_handler(
        &self,
        name: &RemoteName,
        handler: Arc<dyn RemoteHandler>,
        single_threaded: bool,
    ) -> Result<(), MessengerError> {
        let _registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let endpoint = self.registry.get_or_create(name, single_threaded)?;
        if endpoint.register(handler)? {
            info!("{} now implements {:?}", self.local_peer, name.name());
            self.transport.announce(name.name())?;
        }
        Ok(())
    }

    /// Removes a handler registered with `register_remote` or
    /// `register_channel_subscriber`
    pub fn unregister(
        &self,
        name: &RemoteName,
        handler: &Arc<dyn RemoteHandler>,
    ) -> Result<(), MessengerError> {
        let _registration = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let endpoint =
            self.registry
                .get(name.name())
                .ok_or_else(|| EndpointError::HandlerNotRegistered {
                    endpoint: name.name().to_string(),
                    registered: 0,
                })?;
        if endpoint.unregister(handler)? {
            self.registry.remove_if_empty(name.name());
            info!("{} no longer implements {:?}", self.local_peer, name.name());
            self.transport.withdraw(name.name())?;
        }
        Ok(())
    }

    pub fn has_local_implementors(&self, service_name: &str) -> bool {
        self.registry
            .get(service_name)
            .is_some_and(|endpoint| endpoint.local_handler_count() > 0)
    }

    /// Whether this node or any connected peer implements `service_name`
    pub fn has_implementors(&self, service_name: &str) -> bool {
        self.has_local_implementors(service_name)
            || self.transport.has_remote_implementors(service_name)
    }

    /// Resolves a point-to-point remote, wherever it is implemented
    pub fn remote(self: &Arc<Self>, name: &RemoteName) -> Result<RemoteHandle, MessengerError> {
        if !self.transport.is_connected() {
            return Err(MessengerError::ConnectionLost);
        }
        if !self.has_implementors(name.name()) {
            return Err(MessengerError::NoSuchRemote {
                name: name.name().to_string(),
            });
        }
        Ok(RemoteHandle::new(self.clone(), name.clone()))
    }

    /// Resolves the broadcaster of a channel. Broadcasting to a channel
    /// without subscribers reaches nobody and is not an error.
    pub fn channel_broadcaster(self: &Arc<Self>, channel: &RemoteName) -> ChannelBroadcaster {
        ChannelBroadcaster::new(self.clone(), channel.clone())
    }

    /// Invokes `call` on every implementor of its service, local and remote.
    /// Local results come first, then each peer's in the order the transport
    /// reports them.
    pub fn invoke_and_wait(
        &self,
        call: &RemoteMethodCall,
    ) -> Result<Vec<InvocationResult>, MessengerError> {
        if !self.transport.is_connected() {
            return Err(MessengerError::ConnectionLost);
        }

        let mut results = match self.registry.get(call.service_name()) {
            Some(endpoint) => {
                let ticket = endpoint.take_ticket();
                endpoint.dispatch(call, ticket, &self.local_peer)?
            }
            None => Vec::new(),
        };

        for response in self.transport.send_to_peers(call.service_name(), call)? {
            debug!(
                "{} answered {} with {} results",
                response.peer,
                call,
                response.results.len()
            );
            results.extend(response.results);
        }

        Ok(results)
    }

    /// Takes a ticket for an invocation arriving from the network. Must be
    /// called in arrival order; the dispatch itself may then run on any
    /// thread. Returns `None` if nothing local implements the service.
    pub fn take_ticket(&self, service_name: &str) -> Option<InboundTicket> {
        self.registry.get(service_name).map(|endpoint| {
            let ticket = endpoint.take_ticket();
            InboundTicket { endpoint, ticket }
        })
    }

    /// Runs an invocation that arrived from `origin` on the handlers of the
    /// endpoint that issued `inbound`. The ticket is released whatever the
    /// outcome.
    pub fn on_incoming_invocation(
        &self,
        call: &RemoteMethodCall,
        inbound: InboundTicket,
        origin: &PeerId,
    ) -> Result<Vec<InvocationResult>, MessengerError> {
        let InboundTicket { endpoint, ticket } = inbound;
        Ok(endpoint.dispatch(call, ticket, origin)?)
    }

    /// The only local handler of `service_name`
    pub fn sole_local_implementor(
        &self,
        service_name: &str,
    ) -> Result<Arc<dyn RemoteHandler>, MessengerError> {
        let endpoint = self.registry.get(service_name).ok_or_else(|| {
            EndpointError::InvalidImplementorCount {
                endpoint: service_name.to_string(),
                count: 0,
            }
        })?;
        Ok(endpoint.sole_handler()?)
    }
}
