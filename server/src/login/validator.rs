use std::{
    net::IpAddr,
    sync::{Arc, Mutex, PoisonError, RwLock},
    thread,
    time::Duration,
};

use log::{info, warn};

use skirmish_shared::{
    login::{self, current, fingerprint, legacy},
    AuthenticationError, EngineVersion, Properties,
};

use crate::{
    login::{ban_list::BanRegistry, error::LoginRejection},
    server::LoginConfig,
};

// Longest client version string worth parsing
const MAX_VERSION_LENGTH: usize = 20;

/// Issues login challenges and judges the responses of joining Clients
pub struct LoginValidator {
    engine_version: EngineVersion,
    max_failed_password_delay: Duration,
    password: RwLock<Option<String>>,
    bans: Arc<dyn BanRegistry>,
    delay_rng: Mutex<fastrand::Rng>,
}

impl LoginValidator {
    pub fn new(config: &LoginConfig, bans: Arc<dyn BanRegistry>) -> Self {
        Self {
            engine_version: config.engine_version,
            max_failed_password_delay: config.max_failed_password_delay,
            password: RwLock::new(config.game_password.clone()),
            bans,
            delay_rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Makes the failed-password delays reproducible
    pub fn with_delay_seed(self, seed: u64) -> Self {
        Self {
            delay_rng: Mutex::new(fastrand::Rng::with_seed(seed)),
            ..self
        }
    }

    /// Replaces the game password; `None` opens the game
    pub fn set_game_password(&self, password: Option<String>) {
        *self.password.write().unwrap_or_else(PoisonError::into_inner) = password;
    }

    pub fn is_password_required(&self) -> bool {
        self.password
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn engine_version(&self) -> EngineVersion {
        self.engine_version
    }

    /// Builds the challenge sent to a Client that asked to join
    pub fn challenge_properties(
        &self,
        user_name: &str,
        remote_addr: &IpAddr,
    ) -> Result<Properties, AuthenticationError> {
        let mut challenge = Properties::new();
        challenge.insert(
            login::SERVER_VERSION.to_string(),
            self.engine_version.to_string(),
        );
        let password_required = self.is_password_required();
        challenge.insert(
            login::PASSWORD_REQUIRED.to_string(),
            password_required.to_string(),
        );
        if password_required {
            challenge.extend(legacy::new_challenge()?);
            challenge.extend(current::new_challenge()?);
        }
        info!("Issuing login challenge to {} at {}", user_name, remote_addr);
        Ok(challenge)
    }

    /// Checks a Client's response to `challenge`, for a Client that will be
    /// admitted as `client_name`. The first failing check decides the
    /// rejection. A wrong password is only answered after a random delay.
    pub fn verify_connection(
        &self,
        challenge: &Properties,
        response: &Properties,
        client_name: &str,
        remote_addr: &IpAddr,
    ) -> Result<(), LoginRejection> {
        self.check_version(response)?;

        if let Some(first_token) = client_name.split_whitespace().next() {
            if self.bans.is_name_banned(first_token) {
                warn!(
                    "Rejecting login from {}: name {} is banned",
                    remote_addr, first_token
                );
                return Err(LoginRejection::Banned);
            }
        }

        if self.bans.is_ip_banned(remote_addr) {
            warn!("Rejecting login from {}: address is banned", remote_addr);
            return Err(LoginRejection::Banned);
        }

        let Some(fingerprint) = response.get(login::CLIENT_FINGERPRINT) else {
            warn!("Rejecting login from {}: no fingerprint", remote_addr);
            return Err(LoginRejection::MissingFingerprint);
        };
        if !fingerprint::is_well_formed(fingerprint) {
            warn!("Rejecting login from {}: malformed fingerprint", remote_addr);
            return Err(LoginRejection::InvalidFingerprint);
        }
        if self.bans.is_fingerprint_banned(fingerprint) {
            warn!("Rejecting login from {}: fingerprint is banned", remote_addr);
            return Err(LoginRejection::Banned);
        }

        self.check_password(challenge, response, remote_addr)
    }

    fn check_version(&self, response: &Properties) -> Result<(), LoginRejection> {
        let raw = response.get(login::CLIENT_VERSION);
        let invalid = || LoginRejection::InvalidVersion { raw: raw.cloned() };

        let trimmed = raw.map(|raw| raw.trim()).ok_or_else(invalid)?;
        if trimmed.is_empty() || trimmed.chars().count() > MAX_VERSION_LENGTH {
            return Err(invalid());
        }
        let client: EngineVersion = trimmed.parse().map_err(|_| invalid())?;
        if client != self.engine_version {
            return Err(LoginRejection::VersionMismatch {
                client,
                server: self.engine_version,
            });
        }
        Ok(())
    }

    fn check_password(
        &self,
        challenge: &Properties,
        response: &Properties,
        remote_addr: &IpAddr,
    ) -> Result<(), LoginRejection> {
        // The issued challenge decides, not the password as it is now
        let required = challenge
            .get(login::PASSWORD_REQUIRED)
            .map_or(false, |flag| flag == "true");
        if !required {
            return Ok(());
        }

        let password = self
            .password
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let verdict = match password {
            Some(password) if current::can_process_response(response) => {
                current::authenticate(&password, challenge, response)
            }
            Some(password) => legacy::authenticate(&password, challenge, response),
            None => {
                info!("Game password was cleared after {} was challenged", remote_addr);
                Err(AuthenticationError::ProofMismatch)
            }
        };

        match verdict {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("Rejecting login from {}: {}", remote_addr, err);
                self.delay_failed_password();
                Err(LoginRejection::InvalidPassword)
            }
        }
    }

    /// Draws the wait before a wrong password is answered, uniform in
    /// `0..=max_failed_password_delay`
    pub fn next_failed_password_delay(&self) -> Duration {
        let max_millis =
            u64::try_from(self.max_failed_password_delay.as_millis()).unwrap_or(u64::MAX);
        if max_millis == 0 {
            return Duration::ZERO;
        }
        let millis = self
            .delay_rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .u64(0..=max_millis);
        Duration::from_millis(millis)
    }

    fn delay_failed_password(&self) {
        let delay = self.next_failed_password_delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
