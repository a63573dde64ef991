use std::{default::Default, fmt, time::Duration};

use skirmish_shared::EngineVersion;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Used to configure the login handshake of joining Clients
    pub login: LoginConfig,
    /// How long pausing the game waits for running delegates to step out
    /// before giving up
    pub execution_block_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            login: LoginConfig::default(),
            execution_block_timeout: Duration::from_secs(2),
        }
    }
}

/// Contains Config properties of the login handshake
#[derive(Clone)]
pub struct LoginConfig {
    /// Version Clients must be running to join
    pub engine_version: EngineVersion,
    /// Password Clients must prove they know, or `None` for an open game
    pub game_password: Option<String>,
    /// Upper bound of the random delay before a wrong password is answered
    pub max_failed_password_delay: Duration,
    /// How long a challenge may go unanswered before it is forgotten
    pub handshake_timeout: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            engine_version: EngineVersion::new(1, 0, 0),
            game_password: None,
            max_failed_password_delay: Duration::from_secs(4),
            handshake_timeout: Duration::from_secs(30),
        }
    }
}

impl fmt::Debug for LoginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginConfig")
            .field("engine_version", &self.engine_version)
            .field(
                "game_password",
                &self.game_password.as_ref().map(|_| "<redacted>"),
            )
            .field("max_failed_password_delay", &self.max_failed_password_delay)
            .field("handshake_timeout", &self.handshake_timeout)
            .finish()
    }
}
