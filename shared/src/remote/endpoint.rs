use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;

use crate::{
    remote::{
        call::RemoteMethodCall,
        error::EndpointError,
        interface::{MessageContext, MethodSignature, RemoteHandler, RemoteInterface},
        results::{HandlerFault, InvocationResult},
        ticket_queue::{ReleaseOnDrop, Ticket, TicketQueue},
        value::RemoteValue,
    },
    PeerId,
};

/// The local side of one named service: the handlers registered on this node
/// and the queue that orders invocations on them.
///
/// A single-threaded endpoint runs invocations strictly in ticket order, one
/// at a time. A multi-threaded endpoint runs them as they arrive, so its
/// handlers must tolerate concurrent entry.
pub struct ServiceEndpoint {
    name: String,
    interface: &'static RemoteInterface,
    single_threaded: bool,
    tickets: TicketQueue,
    handlers: Mutex<Vec<Arc<dyn RemoteHandler>>>,
}

impl ServiceEndpoint {
    pub fn new(
        name: impl Into<String>,
        interface: &'static RemoteInterface,
        single_threaded: bool,
    ) -> Self {
        Self {
            name: name.into(),
            interface,
            single_threaded,
            tickets: TicketQueue::new(),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interface(&self) -> &'static RemoteInterface {
        self.interface
    }

    pub fn is_single_threaded(&self) -> bool {
        self.single_threaded
    }

    /// Adds a handler. Returns whether it is the first one, in which case the
    /// caller should announce the service to its peers.
    pub fn register(&self, handler: Arc<dyn RemoteHandler>) -> Result<bool, EndpointError> {
        if handler.interface() != self.interface {
            return Err(EndpointError::InterfaceMismatch {
                endpoint: self.name.clone(),
                expected: self.interface.name,
                found: handler.interface().name,
            });
        }

        let mut handlers = self.lock_handlers()?;
        let is_first = handlers.is_empty();
        handlers.push(handler);
        Ok(is_first)
    }

    /// Removes a handler. Returns whether the endpoint is now empty.
    pub fn unregister(&self, handler: &Arc<dyn RemoteHandler>) -> Result<bool, EndpointError> {
        let mut handlers = self.lock_handlers()?;
        let Some(index) = handlers
            .iter()
            .position(|registered| Arc::ptr_eq(registered, handler))
        else {
            return Err(EndpointError::HandlerNotRegistered {
                endpoint: self.name.clone(),
                registered: handlers.len(),
            });
        };
        handlers.remove(index);
        Ok(handlers.is_empty())
    }

    pub fn local_handler_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The only handler of this endpoint, for capabilities that exist once
    /// per node
    pub fn sole_handler(&self) -> Result<Arc<dyn RemoteHandler>, EndpointError> {
        let handlers = self.lock_handlers()?;
        match handlers.as_slice() {
            [handler] => Ok(handler.clone()),
            _ => Err(EndpointError::InvalidImplementorCount {
                endpoint: self.name.clone(),
                count: handlers.len(),
            }),
        }
    }

    /// Allocates the next place in line. Never blocks.
    pub fn take_ticket(&self) -> Ticket {
        self.tickets.take()
    }

    /// Invokes `call` on every local handler and returns one result per
    /// handler, in the order of the handler snapshot.
    ///
    /// On a single-threaded endpoint this blocks until `ticket` comes up.
    /// The ticket is released when this returns, whatever the outcome.
    pub fn dispatch(
        &self,
        call: &RemoteMethodCall,
        ticket: Ticket,
        origin: &PeerId,
    ) -> Result<Vec<InvocationResult>, EndpointError> {
        let _release = ReleaseOnDrop::new(&self.tickets);
        if self.single_threaded {
            self.tickets.wait_for_turn(ticket);
        }

        let method = call.resolve(self.interface)?;
        let handlers = self.lock_handlers()?.clone();

        debug!(
            "dispatching {} with ticket {} from {} to {} handlers",
            call,
            ticket.number(),
            origin,
            handlers.len()
        );

        let context = MessageContext::new(origin);
        Ok(handlers
            .iter()
            .map(|handler| invoke_single(handler.as_ref(), method, call.args(), &context))
            .collect())
    }

    fn lock_handlers(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<Arc<dyn RemoteHandler>>>, EndpointError> {
        self.handlers
            .lock()
            .map_err(|_| EndpointError::LockPoisoned {
                endpoint: self.name.clone(),
            })
    }
}

impl fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("name", &self.name)
            .field("interface", &self.interface.name)
            .field("single_threaded", &self.single_threaded)
            .field("handlers", &self.local_handler_count())
            .finish()
    }
}

fn invoke_single(
    handler: &dyn RemoteHandler,
    method: &MethodSignature,
    args: &[RemoteValue],
    context: &MessageContext<'_>,
) -> InvocationResult {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.invoke(method, args, context))) {
        Ok(result) => {
            if let Err(fault) = &result {
                debug!("handler fault in {}: {}", method.name, fault);
            }
            result.into()
        }
        Err(payload) => InvocationResult::Fault(HandlerFault::Panicked(panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
