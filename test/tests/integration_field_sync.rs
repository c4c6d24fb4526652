/// Integration tests for replicated field synchronization: authority-only
/// mutation, forwarded requests, observer semantics, and late-join catch-up

use std::sync::{Arc, Mutex};

use tether_client::FieldUpdateEvent;
use tether_shared::{CharacterId, PartyOrder, PartyRoster};
use tether_test::{exchange, join_client, start_server, BossPhase};

#[test]
fn two_connected_clients_converge_on_roster() {
    let (mut server, channel) = start_server();
    let mut client_a = join_client(&channel, 10001, CharacterId(1));
    let mut client_b = join_client(&channel, 10002, CharacterId(2));
    exchange(&mut server, &mut [&mut client_a, &mut client_b]);

    let roster = PartyRoster(vec![CharacterId(1), CharacterId(2), CharacterId(3)]);
    server.set_field(&roster);
    exchange(&mut server, &mut [&mut client_a, &mut client_b]);

    assert_eq!(server.field::<PartyRoster>(), Some(roster.clone()));
    assert_eq!(client_a.field::<PartyRoster>(), Some(roster.clone()));
    assert_eq!(client_b.field::<PartyRoster>(), Some(roster));
}

#[test]
fn forwarded_set_does_not_change_local_value_until_announce() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    client.request_field_set(&BossPhase(2));

    // request sent but not yet applied anywhere
    assert_eq!(client.field::<BossPhase>(), None);

    // the authority applies and broadcasts, but the announce is still in
    // flight back to the client
    server.receive();
    assert_eq!(server.field::<BossPhase>(), Some(BossPhase(2)));
    assert_eq!(client.field::<BossPhase>(), None);

    client.receive();
    assert_eq!(client.field::<BossPhase>(), Some(BossPhase(2)));
}

#[test]
fn observers_fire_exactly_once_per_announce_in_registration_order() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    let calls = Arc::new(Mutex::new(Vec::new()));
    let first_calls = calls.clone();
    client.on_field_change::<BossPhase>(move |phase| {
        first_calls.lock().unwrap().push(("first", phase.0));
    });
    let second_calls = calls.clone();
    client.on_field_change::<BossPhase>(move |phase| {
        second_calls.lock().unwrap().push(("second", phase.0));
    });

    server.set_field(&BossPhase(1));
    server.set_field(&BossPhase(2));
    exchange(&mut server, &mut [&mut client]);

    assert_eq!(
        calls.lock().unwrap().as_slice(),
        &[("first", 1), ("second", 1), ("first", 2), ("second", 2)]
    );
}

#[test]
fn authority_observers_fire_on_direct_set() {
    let (mut server, _channel) = start_server();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let observer_seen = seen.clone();
    server.on_field_change::<BossPhase>(move |phase| {
        observer_seen.lock().unwrap().push(phase.0);
    });

    server.set_field(&BossPhase(7));
    assert_eq!(seen.lock().unwrap().as_slice(), &[7]);
}

#[test]
fn client_that_left_before_the_announce_never_receives_it() {
    let (mut server, channel) = start_server();
    let mut stayer = join_client(&channel, 10001, CharacterId(1));
    let mut leaver = join_client(&channel, 10002, CharacterId(2));
    exchange(&mut server, &mut [&mut stayer, &mut leaver]);

    leaver.disconnect();
    server.receive();

    server.set_field(&BossPhase(3));
    exchange(&mut server, &mut [&mut stayer, &mut leaver]);

    assert_eq!(stayer.field::<BossPhase>(), Some(BossPhase(3)));
    assert_eq!(leaver.field::<BossPhase>(), None);
}

#[test]
fn late_joiner_catches_up_on_current_values() {
    let (mut server, channel) = start_server();
    server.set_field(&PartyRoster(vec![CharacterId(5)]));
    server.set_field(&BossPhase(4));

    let mut late = join_client(&channel, 10003, CharacterId(9));
    exchange(&mut server, &mut [&mut late]);

    assert_eq!(late.field::<PartyRoster>(), Some(PartyRoster(vec![CharacterId(5)])));
    assert_eq!(late.field::<BossPhase>(), Some(BossPhase(4)));
}

#[test]
fn roster_and_order_notify_independently() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    server.set_field(&PartyRoster(vec![CharacterId(1), CharacterId(2)]));
    server.set_field(&PartyOrder(vec![1, 0]));
    let (_, mut client_events) = exchange(&mut server, &mut [&mut client]);

    let events = &mut client_events[0];
    let rosters: Vec<PartyRoster> = events.read::<FieldUpdateEvent<PartyRoster>>().collect();
    let orders: Vec<PartyOrder> = events.read::<FieldUpdateEvent<PartyOrder>>().collect();
    assert_eq!(rosters, vec![PartyRoster(vec![CharacterId(1), CharacterId(2)])]);
    assert_eq!(orders, vec![PartyOrder(vec![1, 0])]);
}
