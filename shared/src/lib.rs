//! # Skirmish Shared
//! Ordered multicast dispatch and login vocabulary shared between
//! skirmish-server & skirmish-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod login;
mod remote;
mod types;

pub use login::{
    error::{AuthenticationError, VersionError},
    version::EngineVersion,
};
pub use remote::{
    call::RemoteMethodCall,
    endpoint::ServiceEndpoint,
    error::{EndpointError, MessengerError, TransportError},
    handle::{ChannelBroadcaster, RemoteHandle},
    interface::{MessageContext, MethodSignature, RemoteHandler, RemoteInterface, RemoteName},
    messenger::{InboundTicket, RemoteMessenger},
    registry::EndpointRegistry,
    results::{HandlerFault, InvocationResult},
    ticket_queue::{Ticket, TicketQueue},
    transport::{LocalOnlyTransport, PeerResponse, PeerTransport},
    value::{ArgType, RemoteValue},
};
pub use types::{PeerId, Properties};
