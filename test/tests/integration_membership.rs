/// Integration tests for session membership: the join handshake,
/// accept/reject, joining gates, and member announcements

use tether_client::{ConnectionStatus, MemberJoinEvent, MemberLeaveEvent, RejectEvent};
use tether_server::{ConnectEvent, DisconnectEvent, JoinEvent, ServerConfig};
use tether_shared::CharacterId;
use tether_test::{
    client_addr, exchange, join_client, start_server, start_server_with_config,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn join_waits_for_the_application_to_accept() {
    init_logger();
    let (mut server, channel) = start_server_with_config(ServerConfig {
        require_join_approval: true,
        joining_open: true,
    });
    let mut client = join_client(&channel, 10001, CharacterId(7));

    let (mut server_events, _) = exchange(&mut server, &mut [&mut client]);
    let joins: Vec<_> = server_events.read::<JoinEvent>().collect();
    assert_eq!(joins.len(), 1);
    let (user_key, character) = joins[0];
    assert_eq!(character, CharacterId(7));

    // not yet a member
    assert_eq!(server.users_count(), 0);
    assert_eq!(client.connection_status(), ConnectionStatus::Connecting);

    server.accept_connection(&user_key);
    let (mut server_events, _) = exchange(&mut server, &mut [&mut client]);

    let connections: Vec<_> = server_events.read::<ConnectEvent>().collect();
    assert_eq!(connections, vec![user_key]);
    assert_eq!(server.users_count(), 1);
    assert!(client.is_connected());
    assert_eq!(server.user(&user_key).address(), client_addr(10001));
    assert_eq!(server.user(&user_key).character(), CharacterId(7));
}

#[test]
fn rejected_join_never_becomes_a_member() {
    let (mut server, channel) = start_server_with_config(ServerConfig {
        require_join_approval: true,
        joining_open: true,
    });
    let mut client = join_client(&channel, 10001, CharacterId(7));

    let (mut server_events, _) = exchange(&mut server, &mut [&mut client]);
    let joins: Vec<_> = server_events.read::<JoinEvent>().collect();
    server.reject_connection(&joins[0].0);

    let (_, mut client_events) = exchange(&mut server, &mut [&mut client]);
    let rejections: Vec<_> = client_events[0].read::<RejectEvent>().collect();
    assert_eq!(rejections.len(), 1);
    assert_eq!(client.connection_status(), ConnectionStatus::Rejected);
    assert_eq!(server.users_count(), 0);
    assert!(!server.user_exists(&joins[0].0));
}

#[test]
fn closed_joining_rejects_without_surfacing_an_event() {
    let (mut server, channel) = start_server();
    server.close_joining();
    assert!(!server.is_joining_open());

    let mut client = join_client(&channel, 10001, CharacterId(1));
    let (mut server_events, mut client_events) = exchange(&mut server, &mut [&mut client]);

    assert!(!server_events.has::<JoinEvent>());
    let rejections: Vec<_> = client_events[0].read::<RejectEvent>().collect();
    assert_eq!(rejections.len(), 1);
    assert_eq!(server.users_count(), 0);

    // reopening lets the next attempt through
    server.open_joining();
    let mut retry = join_client(&channel, 10002, CharacterId(2));
    exchange(&mut server, &mut [&mut retry]);
    assert!(retry.is_connected());
}

#[test]
fn members_see_each_other_join_and_leave() {
    let (mut server, channel) = start_server();
    let mut first = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut first]);

    let mut second = join_client(&channel, 10002, CharacterId(2));
    let (_, mut client_events) = exchange(&mut server, &mut [&mut first, &mut second]);

    // the existing member is told about the newcomer
    let joins: Vec<_> = client_events[0].read::<MemberJoinEvent>().collect();
    assert_eq!(joins, vec![(client_addr(10002), CharacterId(2))]);
    // the newcomer's snapshot lists the existing member
    let seen: Vec<_> = client_events[1].read::<MemberJoinEvent>().collect();
    assert_eq!(seen, vec![(client_addr(10001), CharacterId(1))]);
    assert_eq!(second.members(), vec![(client_addr(10001), CharacterId(1))]);

    second.disconnect();
    let (mut server_events, mut client_events) = exchange(&mut server, &mut [&mut first]);

    let disconnections: Vec<_> = server_events.read::<DisconnectEvent>().collect();
    assert_eq!(disconnections.len(), 1);
    assert_eq!(disconnections[0].1, client_addr(10002));
    let leaves: Vec<_> = client_events[0].read::<MemberLeaveEvent>().collect();
    assert_eq!(leaves, vec![client_addr(10002)]);
    assert_eq!(first.members_count(), 0);
    assert_eq!(server.users_count(), 1);
}

#[test]
fn kicked_user_is_announced_to_the_remaining_members() {
    let (mut server, channel) = start_server();
    let mut stayer = join_client(&channel, 10001, CharacterId(1));
    let mut kicked = join_client(&channel, 10002, CharacterId(2));
    exchange(&mut server, &mut [&mut stayer, &mut kicked]);

    let kicked_key = server
        .user_keys()
        .into_iter()
        .find(|key| server.user(key).address() == client_addr(10002))
        .unwrap();
    server.user_mut(&kicked_key).disconnect();

    let (_, mut client_events) = exchange(&mut server, &mut [&mut stayer]);
    let leaves: Vec<_> = client_events[0].read::<MemberLeaveEvent>().collect();
    assert_eq!(leaves, vec![client_addr(10002)]);
    assert_eq!(server.users_count(), 1);
}

#[test]
fn duplicate_join_from_the_same_address_is_ignored() {
    init_logger();
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);
    assert_eq!(server.users_count(), 1);

    // a second join request over the same link changes nothing
    let mut imposter = join_client(&channel, 10001, CharacterId(9));
    exchange(&mut server, &mut [&mut imposter]);
    assert_eq!(server.users_count(), 1);

    let key = server.user_keys()[0];
    assert_eq!(server.user(&key).character(), CharacterId(1));
}
