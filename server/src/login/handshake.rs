use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use log::debug;

use skirmish_shared::{login, Properties};

use crate::login::{error::HandshakeError, validator::LoginValidator};

/// Where a single login attempt stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitingChallengeRequest,
    ChallengeIssued,
    ResponseReceived,
    Accepted,
    Rejected,
}

impl HandshakeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

// LoginHandshake
/// One challenge/response exchange with a joining Client
pub struct LoginHandshake {
    remote_addr: SocketAddr,
    user_name: String,
    state: HandshakeState,
    challenge: Option<Properties>,
    started: Instant,
}

impl LoginHandshake {
    pub fn new(remote_addr: SocketAddr, user_name: &str) -> Self {
        Self {
            remote_addr,
            user_name: user_name.to_string(),
            state: HandshakeState::AwaitingChallengeRequest,
            challenge: None,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.started.elapsed() >= timeout
    }

    /// The name the Client is admitted under: the one in its response, or
    /// the one it asked to join with when the response names nobody
    pub fn admitted_name(&self, response: &Properties) -> String {
        response
            .get(login::CLIENT_NAME)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.user_name)
            .to_string()
    }

    /// Generates the challenge and keeps a copy for verification
    pub fn issue_challenge(
        &mut self,
        validator: &LoginValidator,
    ) -> Result<Properties, HandshakeError> {
        self.expect_state(HandshakeState::AwaitingChallengeRequest, "challenge request")?;

        let challenge =
            validator.challenge_properties(&self.user_name, &self.remote_addr.ip())?;
        self.challenge = Some(challenge.clone());
        self.state = HandshakeState::ChallengeIssued;
        Ok(challenge)
    }

    /// Verifies the Client's response and returns the name it is admitted
    /// under. The challenge is discarded whatever the verdict, so a
    /// handshake can only be answered once.
    pub fn receive_response(
        &mut self,
        validator: &LoginValidator,
        response: &Properties,
    ) -> Result<String, HandshakeError> {
        self.expect_state(HandshakeState::ChallengeIssued, "response")?;
        self.state = HandshakeState::ResponseReceived;

        let challenge = self.challenge.take().unwrap_or_default();
        let name = self.admitted_name(response);
        match validator.verify_connection(&challenge, response, &name, &self.remote_addr.ip()) {
            Ok(()) => {
                self.state = HandshakeState::Accepted;
                debug!("Login handshake with {} accepted", self.remote_addr);
                Ok(name)
            }
            Err(rejection) => {
                self.state = HandshakeState::Rejected;
                Err(rejection.into())
            }
        }
    }

    fn expect_state(
        &self,
        expected: HandshakeState,
        event: &'static str,
    ) -> Result<(), HandshakeError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(HandshakeError::UnexpectedEvent {
                state: self.state,
                event,
            })
        }
    }
}
