use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use log::{debug, info, warn};

use skirmish_shared::Properties;

use crate::login::{
    error::HandshakeError, handshake::LoginHandshake, validator::LoginValidator,
};

/// What the Server should do after a handshake event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeAction {
    /// Send this challenge to the Client
    SendChallenge(Properties),
    /// Admit the Client under the name it asked for
    AcceptPeer { name: String },
    /// Turn the Client away, telling it why
    RejectPeer { reason: String },
}

/// Tracks the login handshakes in progress, one per remote address.
/// Challenges left unanswered for longer than `timeout` are forgotten.
pub struct HandshakeManager {
    validator: Arc<LoginValidator>,
    timeout: Duration,
    pending: Mutex<HashMap<SocketAddr, LoginHandshake>>,
}

impl HandshakeManager {
    pub fn new(validator: Arc<LoginValidator>, timeout: Duration) -> Self {
        Self {
            validator,
            timeout,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn validator(&self) -> &Arc<LoginValidator> {
        &self.validator
    }

    /// Starts a handshake with `addr`, replacing any unanswered one
    pub fn receive_challenge_request(
        &self,
        addr: SocketAddr,
        user_name: &str,
    ) -> Result<HandshakeAction, HandshakeError> {
        let mut handshake = LoginHandshake::new(addr, user_name);
        let challenge = handshake.issue_challenge(&self.validator)?;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune_expired(&mut pending);
        let replaced = pending.insert(addr, handshake);
        if replaced.is_some() {
            info!("Restarting login handshake with {}", addr);
        }
        Ok(HandshakeAction::SendChallenge(challenge))
    }

    /// Finishes the handshake with `addr`. Verification runs outside the
    /// lock so a delayed password rejection does not hold up other logins.
    pub fn receive_response(
        &self,
        addr: SocketAddr,
        response: &Properties,
    ) -> Result<HandshakeAction, HandshakeError> {
        let handshake = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&addr);
        let Some(mut handshake) = handshake else {
            return Err(HandshakeError::NoPendingHandshake { addr });
        };
        if handshake.is_expired(self.timeout) {
            warn!("Login response from {} arrived after its challenge expired", addr);
            return Err(HandshakeError::NoPendingHandshake { addr });
        }

        match handshake.receive_response(&self.validator, response) {
            Ok(name) => {
                info!("Login accepted for {} at {}", name, addr);
                Ok(HandshakeAction::AcceptPeer { name })
            }
            Err(HandshakeError::Rejected(rejection)) => {
                warn!("Login rejected for {}: {}", addr, rejection);
                Ok(HandshakeAction::RejectPeer {
                    reason: rejection.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Handshakes still waiting for a response, expired ones excluded
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        self.prune_expired(&mut pending);
        pending.len()
    }

    fn prune_expired(&self, pending: &mut HashMap<SocketAddr, LoginHandshake>) {
        let before = pending.len();
        pending.retain(|_, handshake| !handshake.is_expired(self.timeout));
        let expired = before - pending.len();
        if expired > 0 {
            debug!("Forgot {} unanswered login challenges", expired);
        }
    }

    /// Drops every handshake in progress
    pub fn reset(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
