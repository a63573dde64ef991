use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
};

use log::info;

use skirmish_shared::{PeerId, Properties, RemoteMessenger};

use crate::{
    delegate::{
        bridge::GameServices,
        execution::DelegateExecutionManager,
        random_stats::RandomStats,
        session::{GameSession, HistoryWriter},
    },
    login::{
        ban_list::BanList,
        error::HandshakeError,
        handshake_manager::{HandshakeAction, HandshakeManager},
        validator::LoginValidator,
    },
    ServerConfig,
};

/// The hosting node of a game: admits Clients through the login handshake
/// and hands the game's delegates the services they run against
pub struct Server {
    server_config: ServerConfig,
    messenger: Arc<RemoteMessenger>,
    handshake_manager: HandshakeManager,
    bans: Arc<BanList>,
    peers: RwLock<HashMap<PeerId, SocketAddr>>,
    execution: Arc<DelegateExecutionManager>,
    random_stats: Arc<RandomStats>,
}

impl Server {
    /// Create a new Server hosting on `messenger`
    pub fn new(server_config: ServerConfig, messenger: Arc<RemoteMessenger>) -> Self {
        let bans = Arc::new(BanList::new());
        let validator = Arc::new(LoginValidator::new(&server_config.login, bans.clone()));
        let handshake_manager =
            HandshakeManager::new(validator, server_config.login.handshake_timeout);

        Self {
            server_config,
            messenger,
            handshake_manager,
            bans,
            peers: RwLock::new(HashMap::new()),
            execution: Arc::new(DelegateExecutionManager::new()),
            random_stats: Arc::new(RandomStats::new()),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.server_config
    }

    pub fn messenger(&self) -> &Arc<RemoteMessenger> {
        &self.messenger
    }

    pub fn bans(&self) -> &Arc<BanList> {
        &self.bans
    }

    pub fn execution(&self) -> &Arc<DelegateExecutionManager> {
        &self.execution
    }

    pub fn random_stats(&self) -> &Arc<RandomStats> {
        &self.random_stats
    }

    /// Changes the password of the game for Clients that join from now on
    pub fn set_game_password(&self, password: Option<String>) {
        self.handshake_manager
            .validator()
            .set_game_password(password);
    }

    // Login

    /// A Client at `addr` asks to join as `user_name`
    pub fn receive_login_request(
        &self,
        addr: SocketAddr,
        user_name: &str,
    ) -> Result<HandshakeAction, HandshakeError> {
        self.handshake_manager
            .receive_challenge_request(addr, user_name)
    }

    /// A Client at `addr` answered its challenge. On acceptance the Client
    /// is admitted under a name no other peer uses, which the returned
    /// action carries.
    pub fn receive_login_response(
        &self,
        addr: SocketAddr,
        response: &Properties,
    ) -> Result<HandshakeAction, HandshakeError> {
        match self.handshake_manager.receive_response(addr, response)? {
            HandshakeAction::AcceptPeer { name } => {
                let peer = self.admit_peer(&name, addr);
                Ok(HandshakeAction::AcceptPeer {
                    name: peer.name().to_string(),
                })
            }
            action => Ok(action),
        }
    }

    fn admit_peer(&self, requested: &str, addr: SocketAddr) -> PeerId {
        let mut peers = self.peers.write().unwrap_or_else(PoisonError::into_inner);
        let is_taken = |name: &str| {
            name == self.messenger.local_peer().name()
                || peers.contains_key(&PeerId::new(name))
        };

        let mut name = requested.to_string();
        let mut suffix = 1;
        while is_taken(&name) {
            suffix += 1;
            name = format!("{} ({})", requested, suffix);
        }

        let peer = PeerId::new(name);
        peers.insert(peer.clone(), addr);
        info!("Admitted {} from {}", peer, addr);
        peer
    }

    // Peers

    /// Admitted peers, sorted by name
    pub fn peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        peers.sort();
        peers
    }

    pub fn is_admitted(&self, peer: &PeerId) -> bool {
        self.peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(peer)
    }

    pub fn peer_addr(&self, peer: &PeerId) -> Option<SocketAddr> {
        self.peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(peer)
            .copied()
    }

    /// Removes `peer` from the admitted set. Returns whether it was there.
    pub fn disconnect_peer(&self, peer: &PeerId) -> bool {
        let removed = self
            .peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(peer);
        if let Some(addr) = removed {
            info!("Disconnected {} at {}", peer, addr);
            true
        } else {
            false
        }
    }

    // Delegates

    /// Services the delegates of game `game_id` run against
    pub fn game_services(
        &self,
        game_id: &str,
        session: Arc<dyn GameSession>,
        history: Arc<dyn HistoryWriter>,
    ) -> GameServices {
        GameServices {
            game_id: game_id.to_string(),
            session,
            messenger: self.messenger.clone(),
            execution: self.execution.clone(),
            random_stats: self.random_stats.clone(),
            history,
        }
    }

    /// Waits for running delegates to step out and keeps new ones from
    /// starting. Returns false if they did not step out in time.
    pub fn pause_delegates(&self) -> bool {
        self.execution
            .block_delegate_execution(self.server_config.execution_block_timeout)
    }

    pub fn resume_delegates(&self) {
        self.execution.resume_delegate_execution();
    }

    /// Ends the game for every delegate
    pub fn end_game(&self) {
        info!("Game over");
        self.execution.set_game_over();
    }
}
