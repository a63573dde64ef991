//! Sound clips fanned out over a hub to the sound channel subscribers of a
//! game, local and remote alike.

use std::{net::SocketAddr, sync::Arc};

use skirmish_client::ClientLogin;
use skirmish_server::{
    sound_channel, DelegateBridge, GameStep, HistoryLog, PlainRandomSource, PlayerId, Server,
    SOUND,
};
use skirmish_shared::{EngineVersion, PeerId, RemoteValue};
use skirmish_test::{
    admit_client, test_server_config, CallLog, FakeGameSession, LocalHub, RecordingHandler,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sound_broadcast_reaches_local_and_remote_subscribers() {
    init_logging();

    let hub = LocalHub::new();
    let host = hub.join(PeerId::new("host"));
    let server = Server::new(test_server_config(None), host.clone());

    let log = CallLog::new();
    host.register_channel_subscriber(
        &sound_channel("g1"),
        RecordingHandler::new("host", &SOUND, &log).into_arc(),
    )
    .unwrap();

    for (octet, name) in [(1, "amy"), (2, "bo")] {
        let client = ClientLogin::for_machine(
            EngineVersion::new(1, 9, 0),
            name,
            name.as_bytes(),
            None,
        );
        let addr = SocketAddr::from(([10, 0, 1, octet], 5000));
        let messenger = admit_client(&hub, &server, addr, &client).unwrap();
        messenger
            .register_channel_subscriber(
                &sound_channel("g1"),
                RecordingHandler::new(name, &SOUND, &log).into_arc(),
            )
            .unwrap();
    }

    // another game's sounds stay there
    let other_log = CallLog::new();
    host.register_channel_subscriber(
        &sound_channel("g2"),
        RecordingHandler::new("host-g2", &SOUND, &other_log).into_arc(),
    )
    .unwrap();

    let services = server.game_services(
        "g1",
        FakeGameSession::new(),
        Arc::new(HistoryLog::new()),
    );
    let bridge = DelegateBridge::new(
        services,
        GameStep::new("germansBattle", "Battle").with_player(PlayerId::new("Germans")),
        Arc::new(PlainRandomSource::new()),
    );

    server.execution().enter_delegate_execution().unwrap();
    let sound = bridge.resolve_sound_broadcaster();
    assert_eq!(
        sound
            .play_sound_for_all("battle_start", &PlayerId::new("Germans"))
            .unwrap(),
        3
    );
    assert_eq!(
        sound
            .play_sound_to_players(
                "defeat",
                &[PlayerId::new("Russians"), PlayerId::new("British")]
            )
            .unwrap(),
        3
    );
    assert!(server.execution().is_current_thread_executing());
    server.execution().leave_delegate_execution().unwrap();

    let targeted: Vec<_> = log
        .finished()
        .into_iter()
        .filter(|call| call.method == "play_sound_to_players")
        .collect();
    let mut receivers: Vec<String> = targeted.iter().map(|call| call.handler.clone()).collect();
    receivers.sort();
    assert_eq!(receivers, vec!["amy", "bo", "host"]);
    for call in &targeted {
        assert_eq!(call.sender, PeerId::new("host"));
        assert_eq!(
            call.args,
            vec![
                RemoteValue::from("defeat"),
                RemoteValue::List(vec![
                    RemoteValue::from("Russians"),
                    RemoteValue::from("British"),
                ]),
            ]
        );
    }

    assert_eq!(
        log.finished()
            .iter()
            .filter(|call| call.method == "play_sound_for_all")
            .count(),
        3
    );
    assert!(other_log.calls().is_empty());
}
