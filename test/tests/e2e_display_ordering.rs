//! End-to-end ordering of display broadcasts: a single-threaded "Display"
//! endpoint with two handlers, and a display channel spread over a hub.

use std::{sync::Arc, thread, time::Duration};

use skirmish_client::ClientLogin;
use skirmish_server::{
    display_channel, DelegateBridge, GameStep, HistoryLog, PlainRandomSource, Server, DISPLAY,
};
use skirmish_shared::{
    EngineVersion, InvocationResult, PeerId, RemoteMethodCall, RemoteValue, ServiceEndpoint,
};
use skirmish_test::{
    admit_client, test_server_config, CallLog, CallPhase, FakeGameSession, LocalHub,
    RecordingHandler,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn status(text: &str) -> RemoteMethodCall {
    RemoteMethodCall::new("Display", "set_status", vec![RemoteValue::from(text)])
}

#[test]
fn later_ticket_waits_for_slow_earlier_ticket() {
    init_logging();

    let log = CallLog::new();
    let endpoint = Arc::new(ServiceEndpoint::new("Display", &DISPLAY, true));
    endpoint
        .register(
            RecordingHandler::new("map", &DISPLAY, &log)
                .slow(Duration::from_millis(60))
                .replying("map")
                .into_arc(),
        )
        .unwrap();
    endpoint
        .register(
            RecordingHandler::new("panel", &DISPLAY, &log)
                .replying("panel")
                .into_arc(),
        )
        .unwrap();
    let host = PeerId::new("host");

    // tickets 0..=3 come and go
    for n in 0..4 {
        let ticket = endpoint.take_ticket();
        endpoint
            .dispatch(&status(&format!("turn {}", n)), ticket, &host)
            .unwrap();
    }

    let ticket_4 = endpoint.take_ticket();
    let ticket_5 = endpoint.take_ticket();
    assert_eq!((ticket_4.number(), ticket_5.number()), (4, 5));

    let fifth = {
        let endpoint = endpoint.clone();
        let host = host.clone();
        thread::spawn(move || endpoint.dispatch(&status("five"), ticket_5, &host).unwrap())
    };
    // give ticket 5 every chance to jump the queue
    thread::sleep(Duration::from_millis(20));
    let fourth = {
        let endpoint = endpoint.clone();
        thread::spawn(move || endpoint.dispatch(&status("four"), ticket_4, &host).unwrap())
    };

    let fourth_results = fourth.join().unwrap();
    let fifth_results = fifth.join().unwrap();

    assert_eq!(
        fourth_results,
        vec![
            InvocationResult::Returned(RemoteValue::from("map")),
            InvocationResult::Returned(RemoteValue::from("panel")),
        ]
    );
    assert_eq!(fifth_results.len(), 2);

    let statuses: Vec<RemoteValue> = log
        .calls()
        .into_iter()
        .skip(16)
        .map(|call| call.args[0].clone())
        .collect();
    let four = RemoteValue::from("four");
    let five = RemoteValue::from("five");
    assert_eq!(
        statuses,
        vec![
            four.clone(),
            four.clone(),
            four.clone(),
            four,
            five.clone(),
            five.clone(),
            five.clone(),
            five,
        ]
    );
    assert_eq!(
        log.timeline()[16..20]
            .iter()
            .map(|(_, phase)| *phase)
            .collect::<Vec<_>>(),
        vec![
            CallPhase::Started,
            CallPhase::Finished,
            CallPhase::Started,
            CallPhase::Finished,
        ]
    );
}

#[test]
fn display_broadcast_reaches_every_peer() {
    init_logging();

    let hub = LocalHub::new();
    let host = hub.join(PeerId::new("host"));
    let server = Server::new(test_server_config(None), host.clone());

    let log = CallLog::new();
    host.register_channel_subscriber(
        &display_channel("g1"),
        RecordingHandler::new("host", &DISPLAY, &log).into_arc(),
    )
    .unwrap();

    for (port, name) in [(4001, "amy"), (4002, "bo")] {
        let client = ClientLogin::for_machine(
            EngineVersion::new(1, 9, 0),
            name,
            name.as_bytes(),
            None,
        );
        let addr = format!("10.0.0.{}:{}", port - 4000, port).parse().unwrap();
        let messenger = admit_client(&hub, &server, addr, &client).unwrap();
        messenger
            .register_channel_subscriber(
                &display_channel("g1"),
                RecordingHandler::new(name, &DISPLAY, &log).into_arc(),
            )
            .unwrap();
    }

    let session = FakeGameSession::new();
    let services = server.game_services("g1", session, Arc::new(HistoryLog::new()));
    let bridge = DelegateBridge::new(
        services,
        GameStep::new("russiansPurchase", "Purchase"),
        Arc::new(PlainRandomSource::new()),
    );

    let display = bridge.resolve_display_broadcaster();
    assert_eq!(display.set_status("Russians buying").unwrap(), 3);
    assert_eq!(display.show_dice("attack", &[1, 5]).unwrap(), 3);

    let mut receivers: Vec<String> = log
        .finished()
        .into_iter()
        .filter(|call| call.method == "show_dice")
        .map(|call| {
            assert_eq!(call.sender, PeerId::new("host"));
            call.handler
        })
        .collect();
    receivers.sort();
    assert_eq!(receivers, vec!["amy", "bo", "host"]);
}
