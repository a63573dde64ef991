use log::debug;

use skirmish_shared::{
    login::{self, current, fingerprint, legacy},
    EngineVersion, Properties,
};

use crate::error::ClientLoginError;

/// Builds the answer to a server's login challenge
pub struct ClientLogin {
    engine_version: EngineVersion,
    name: String,
    fingerprint: String,
    password: Option<String>,
}

impl ClientLogin {
    pub fn new(
        engine_version: EngineVersion,
        name: &str,
        fingerprint: String,
        password: Option<String>,
    ) -> Self {
        Self {
            engine_version,
            name: name.to_string(),
            fingerprint,
            password,
        }
    }

    /// Uses the fingerprint of `machine_id`
    pub fn for_machine(
        engine_version: EngineVersion,
        name: &str,
        machine_id: &[u8],
        password: Option<String>,
    ) -> Self {
        Self::new(
            engine_version,
            name,
            fingerprint::hash_machine_id(machine_id),
            password,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }

    /// The response to `challenge`. The current proof scheme is used when the
    /// server offers it, the legacy one otherwise.
    pub fn respond(&self, challenge: &Properties) -> Result<Properties, ClientLoginError> {
        let mut response = Properties::new();
        response.insert(
            login::CLIENT_VERSION.to_string(),
            self.engine_version.to_string(),
        );
        response.insert(login::CLIENT_NAME.to_string(), self.name.clone());
        response.insert(
            login::CLIENT_FINGERPRINT.to_string(),
            self.fingerprint.clone(),
        );

        if !is_password_required(challenge) {
            return Ok(response);
        }
        let password = self
            .password
            .as_deref()
            .ok_or(ClientLoginError::PasswordRequired)?;

        if current::is_offered(challenge) {
            debug!("Answering login challenge with current proof");
            response.extend(current::new_response(password, challenge)?);
        } else {
            debug!("Answering login challenge with legacy proof");
            response.extend(legacy::new_response(password, challenge)?);
        }
        Ok(response)
    }
}

fn is_password_required(challenge: &Properties) -> bool {
    challenge
        .get(login::PASSWORD_REQUIRED)
        .is_some_and(|required| required.trim().eq_ignore_ascii_case("true"))
}
