//! Client and server running the login handshake against each other

use std::{net::SocketAddr, sync::Arc};

use skirmish_client::ClientLogin;
use skirmish_server::{HandshakeAction, HandshakeError, Server};
use skirmish_shared::{EngineVersion, LocalOnlyTransport, PeerId, Properties, RemoteMessenger};
use skirmish_test::{admit_client, test_server_config, LocalHub};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn client(name: &str, version: EngineVersion, password: Option<&str>) -> ClientLogin {
    ClientLogin::for_machine(
        version,
        name,
        format!("{}-machine", name).as_bytes(),
        password.map(str::to_string),
    )
}

fn addr(last: u8) -> SocketAddr {
    SocketAddr::from(([192, 168, 0, last], 3300))
}

fn v19() -> EngineVersion {
    EngineVersion::new(1, 9, 0)
}

fn host(hub: &Arc<LocalHub>, password: Option<&str>) -> Server {
    Server::new(test_server_config(password), hub.join(PeerId::new("host")))
}

#[test]
fn correct_password_admits_peer() {
    init_logging();
    let hub = LocalHub::new();
    let server = host(&hub, Some("s3cret"));

    let messenger = admit_client(&hub, &server, addr(2), &client("amy", v19(), Some("s3cret")))
        .unwrap();

    assert_eq!(messenger.local_peer(), &PeerId::new("amy"));
    assert!(server.is_admitted(&PeerId::new("amy")));
    assert_eq!(server.peer_addr(&PeerId::new("amy")), Some(addr(2)));
    assert_eq!(
        hub.connected_peers(),
        vec![PeerId::new("amy"), PeerId::new("host")]
    );
}

#[test]
fn wrong_password_is_rejected_and_not_admitted() {
    init_logging();
    let hub = LocalHub::new();
    let server = host(&hub, Some("s3cret"));

    let reason = admit_client(&hub, &server, addr(3), &client("amy", v19(), Some("guess")))
        .err()
        .unwrap();

    assert_eq!(reason, "Invalid password");
    assert!(server.peers().is_empty());
}

#[test]
fn version_mismatch_names_both_versions() {
    init_logging();
    let hub = LocalHub::new();
    let server = host(&hub, None);

    let reason = admit_client(
        &hub,
        &server,
        addr(4),
        &client("amy", EngineVersion::new(1, 8, 0), None),
    )
    .err()
    .unwrap();

    assert_eq!(
        reason,
        "Client is using 1.8.0 but server requires version 1.9.0"
    );
}

#[test]
fn bans_apply_by_name_address_and_fingerprint() {
    init_logging();
    let hub = LocalHub::new();
    let server = host(&hub, Some("s3cret"));

    server.bans().ban_name("griefer", None);
    let by_name = admit_client(
        &hub,
        &server,
        addr(5),
        &client("griefer the second", v19(), Some("s3cret")),
    );
    assert_eq!(by_name.err().unwrap(), "The host has banned you from this game");

    server.bans().ban_ip(addr(6).ip(), None);
    let by_ip = admit_client(&hub, &server, addr(6), &client("amy", v19(), Some("s3cret")));
    assert_eq!(by_ip.err().unwrap(), "The host has banned you from this game");

    let bo = client("bo", v19(), Some("s3cret"));
    server.bans().ban_fingerprint(bo.fingerprint(), None);
    let by_fingerprint = admit_client(&hub, &server, addr(7), &bo);
    assert_eq!(
        by_fingerprint.err().unwrap(),
        "The host has banned you from this game"
    );

    assert!(server.bans().lift_name_ban("griefer"));
    assert!(admit_client(
        &hub,
        &server,
        addr(8),
        &client("griefer", v19(), Some("s3cret"))
    )
    .is_ok());
}

#[test]
fn same_name_twice_gets_a_suffix() {
    init_logging();
    let hub = LocalHub::new();
    let server = host(&hub, None);

    admit_client(&hub, &server, addr(10), &client("amy", v19(), None)).unwrap();
    let second = admit_client(&hub, &server, addr(11), &client("amy", v19(), None)).unwrap();
    let third = admit_client(&hub, &server, addr(12), &client("host", v19(), None)).unwrap();

    assert_eq!(second.local_peer(), &PeerId::new("amy (2)"));
    assert_eq!(third.local_peer(), &PeerId::new("host (2)"));
    assert!(server.disconnect_peer(&PeerId::new("amy")));
    assert!(!server.disconnect_peer(&PeerId::new("amy")));
}

#[test]
fn response_without_challenge_is_refused() {
    init_logging();
    let server = Server::new(
        test_server_config(None),
        Arc::new(RemoteMessenger::new(
            PeerId::new("host"),
            Arc::new(LocalOnlyTransport),
        )),
    );

    assert_eq!(
        server.receive_login_response(addr(20), &Properties::new()),
        Err(HandshakeError::NoPendingHandshake { addr: addr(20) })
    );

    // a handshake is answered once
    let challenge = match server.receive_login_request(addr(21), "amy") {
        Ok(HandshakeAction::SendChallenge(challenge)) => challenge,
        other => panic!("expected a challenge, got {:?}", other),
    };
    let response = client("amy", v19(), None).respond(&challenge).unwrap();
    assert!(matches!(
        server.receive_login_response(addr(21), &response),
        Ok(HandshakeAction::AcceptPeer { .. })
    ));
    assert!(server.receive_login_response(addr(21), &response).is_err());
}
