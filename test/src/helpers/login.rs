use std::{net::SocketAddr, sync::Arc, time::Duration};

use skirmish_client::ClientLogin;
use skirmish_server::{HandshakeAction, LoginConfig, Server, ServerConfig};
use skirmish_shared::{EngineVersion, PeerId, RemoteMessenger};

use crate::local_hub::LocalHub;

/// Server config with a quick failed-password delay
pub fn test_server_config(password: Option<&str>) -> ServerConfig {
    ServerConfig {
        login: LoginConfig {
            engine_version: EngineVersion::new(1, 9, 0),
            game_password: password.map(str::to_string),
            max_failed_password_delay: Duration::from_millis(5),
            ..LoginConfig::default()
        },
        execution_block_timeout: Duration::from_millis(200),
    }
}

/// Runs the login handshake of `client` against `server` and, once
/// admitted, joins the hub under the name the server assigned. A rejection
/// comes back as its reason.
pub fn admit_client(
    hub: &Arc<LocalHub>,
    server: &Server,
    addr: SocketAddr,
    client: &ClientLogin,
) -> Result<Arc<RemoteMessenger>, String> {
    let challenge = match server.receive_login_request(addr, client.name()) {
        Ok(HandshakeAction::SendChallenge(challenge)) => challenge,
        Ok(other) => return Err(format!("unexpected action {:?}", other)),
        Err(err) => return Err(err.to_string()),
    };
    let response = client.respond(&challenge).map_err(|err| err.to_string())?;

    match server.receive_login_response(addr, &response) {
        Ok(HandshakeAction::AcceptPeer { name }) => Ok(hub.join(PeerId::new(name))),
        Ok(HandshakeAction::RejectPeer { reason }) => Err(reason),
        Ok(other) => Err(format!("unexpected action {:?}", other)),
        Err(err) => Err(err.to_string()),
    }
}
