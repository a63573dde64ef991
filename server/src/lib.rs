//! # Skirmish Server
//! The hosting side of a game: admits joining Clients through a
//! challenge/response login, and gives rule-execution code (delegates) a
//! bridge to randomness, state changes and the other peers.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

mod delegate;
mod login;
mod server;

pub use delegate::{
    bridge::{DelegateBridge, GameServices},
    change::{Change, PropertyChange},
    error::DelegateError,
    execution::DelegateExecutionManager,
    random::{PlainRandomSource, RandomCategory, RandomSource, RandomSourceError},
    random_stats::{RandomStatistic, RandomStats},
    remotes::{
        display_channel, remote_player_name, sound_channel, DisplayBroadcaster, RemotePlayer,
        SoundBroadcaster, DISPLAY, REMOTE_PLAYER, SOUND,
    },
    session::{
        ChangeLog, GameSession, GameStep, HistoryEvent, HistoryLog, HistoryWriter, PlayerId,
    },
};
pub use login::{
    ban_list::{BanList, BanRegistry},
    error::{HandshakeError, LoginRejection},
    handshake::{HandshakeState, LoginHandshake},
    handshake_manager::{HandshakeAction, HandshakeManager},
    validator::LoginValidator,
};
pub use server::{LoginConfig, Server, ServerConfig};
