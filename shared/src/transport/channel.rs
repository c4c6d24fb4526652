use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use flume::{Receiver, Sender, TryRecvError};

use super::{client, server, RecvError, SendError};

type Routes = Arc<Mutex<HashMap<SocketAddr, Sender<Box<[u8]>>>>>;

/// In-memory packet link between one server and any number of clients.
/// Each side polls its receiver from its own simulation loop; per-link
/// packet order is preserved.
pub struct PacketChannel {
    server_addr: SocketAddr,
    incoming_tx: Sender<(SocketAddr, Box<[u8]>)>,
    incoming_rx: Receiver<(SocketAddr, Box<[u8]>)>,
    routes: Routes,
}

impl PacketChannel {
    pub fn new(server_addr: SocketAddr) -> Self {
        let (incoming_tx, incoming_rx) = flume::unbounded();
        Self {
            server_addr,
            incoming_tx,
            incoming_rx,
            routes: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// The server-side endpoint pair. All client packets arrive through the
    /// one receiver, tagged with the sending address.
    pub fn listen(&self) -> (Box<dyn server::PacketSender>, Box<dyn server::PacketReceiver>) {
        let packet_sender = ServerChannelSender {
            routes: self.routes.clone(),
        };
        let packet_receiver = ServerChannelReceiver::new(self.incoming_rx.clone());
        (Box::new(packet_sender), Box::new(packet_receiver))
    }

    /// A client-side endpoint pair for the given address. Registers the
    /// downstream route the server sends announcements over.
    pub fn connect(
        &self,
        client_addr: SocketAddr,
    ) -> (Box<dyn client::PacketSender>, Box<dyn client::PacketReceiver>) {
        let (downstream_tx, downstream_rx) = flume::unbounded();
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(client_addr, downstream_tx);
        }

        let packet_sender = ClientChannelSender {
            sender: self.incoming_tx.clone(),
            client_addr,
            server_addr: self.server_addr,
        };
        let packet_receiver = ClientChannelReceiver::new(downstream_rx, self.server_addr);
        (Box::new(packet_sender), Box::new(packet_receiver))
    }

    /// Severs the downstream route to the given client. Packets sent to the
    /// address afterwards fail with a send error, the way an abruptly
    /// dropped connection would.
    pub fn disconnect(&self, client_addr: &SocketAddr) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.remove(client_addr);
        }
    }
}

// Server endpoints

struct ServerChannelSender {
    routes: Routes,
}

impl server::PacketSender for ServerChannelSender {
    fn send(&self, address: &SocketAddr, payload: &[u8]) -> Result<(), SendError> {
        let routes = self.routes.lock().map_err(|_| SendError)?;
        let Some(sender) = routes.get(address) else {
            return Err(SendError);
        };
        sender.send(payload.into()).map_err(|_| SendError)
    }
}

struct ServerChannelReceiver {
    receiver: Receiver<(SocketAddr, Box<[u8]>)>,
    current_payload: Option<Box<[u8]>>,
}

impl ServerChannelReceiver {
    fn new(receiver: Receiver<(SocketAddr, Box<[u8]>)>) -> Self {
        Self {
            receiver,
            current_payload: None,
        }
    }
}

impl server::PacketReceiver for ServerChannelReceiver {
    fn receive(&mut self) -> Result<Option<(SocketAddr, &[u8])>, RecvError> {
        match self.receiver.try_recv() {
            Ok((address, payload)) => {
                self.current_payload = Some(payload);
                Ok(Some((
                    address,
                    self.current_payload.as_ref().map(|payload| payload.as_ref()).unwrap_or(&[]),
                )))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }
}

// Client endpoints

struct ClientChannelSender {
    sender: Sender<(SocketAddr, Box<[u8]>)>,
    client_addr: SocketAddr,
    server_addr: SocketAddr,
}

impl client::PacketSender for ClientChannelSender {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        self.sender
            .send((self.client_addr, payload.into()))
            .map_err(|_| SendError)
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}

struct ClientChannelReceiver {
    receiver: Receiver<Box<[u8]>>,
    server_addr: SocketAddr,
    current_payload: Option<Box<[u8]>>,
}

impl ClientChannelReceiver {
    fn new(receiver: Receiver<Box<[u8]>>, server_addr: SocketAddr) -> Self {
        Self {
            receiver,
            server_addr,
            current_payload: None,
        }
    }
}

impl client::PacketReceiver for ClientChannelReceiver {
    fn receive(&mut self) -> Result<Option<&[u8]>, RecvError> {
        match self.receiver.try_recv() {
            Ok(payload) => {
                self.current_payload = Some(payload);
                Ok(self.current_payload.as_ref().map(|payload| payload.as_ref()))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(RecvError),
        }
    }

    fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }
}
