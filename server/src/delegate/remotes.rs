use std::sync::Arc;

use skirmish_shared::{
    ArgType, ChannelBroadcaster, MethodSignature, RemoteHandle, RemoteInterface, RemoteName,
    RemoteValue,
};

use crate::delegate::{
    error::DelegateError, execution::DelegateExecutionManager, session::PlayerId,
};

/// Point-to-point capability of the peer playing a player
pub static REMOTE_PLAYER: RemoteInterface = RemoteInterface::new(
    "RemotePlayer",
    &[
        MethodSignature::new("report_error", &[ArgType::Text]),
        MethodSignature::new("report_message", &[ArgType::Text, ArgType::Text]),
        MethodSignature::new("confirm", &[ArgType::Text]),
        MethodSignature::new("select_option", &[ArgType::Text, ArgType::List]),
    ],
);

/// Broadcast capability of every peer showing the game
pub static DISPLAY: RemoteInterface = RemoteInterface::new(
    "Display",
    &[
        MethodSignature::new("report_message", &[ArgType::Text, ArgType::Text]),
        MethodSignature::new("set_status", &[ArgType::Text]),
        MethodSignature::new("show_dice", &[ArgType::Text, ArgType::List]),
        MethodSignature::new("shut_down", &[]),
    ],
);

/// Broadcast capability of every peer playing game sounds
pub static SOUND: RemoteInterface = RemoteInterface::new(
    "Sound",
    &[
        MethodSignature::new("play_sound_for_all", &[ArgType::Text, ArgType::Text]),
        MethodSignature::new("play_sound_to_players", &[ArgType::Text, ArgType::List]),
    ],
);

pub fn remote_player_name(player: &PlayerId) -> RemoteName {
    RemoteName::new(format!("game.player.{}", player.name()), &REMOTE_PLAYER)
}

pub fn display_channel(game_id: &str) -> RemoteName {
    RemoteName::new(format!("game.{}.display", game_id), &DISPLAY)
}

pub fn sound_channel(game_id: &str) -> RemoteName {
    RemoteName::new(format!("game.{}.sound", game_id), &SOUND)
}

fn text_list<'a>(items: impl IntoIterator<Item = &'a str>) -> RemoteValue {
    RemoteValue::List(items.into_iter().map(RemoteValue::from).collect())
}

// RemotePlayer
/// Handle on the peer playing one player. Each call steps out of delegate
/// execution while it waits on the network.
#[derive(Clone)]
pub struct RemotePlayer {
    player: PlayerId,
    handle: RemoteHandle,
    execution: Arc<DelegateExecutionManager>,
}

impl RemotePlayer {
    pub(crate) fn new(
        player: PlayerId,
        handle: RemoteHandle,
        execution: Arc<DelegateExecutionManager>,
    ) -> Self {
        Self {
            player,
            handle,
            execution,
        }
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    pub fn invoke(
        &self,
        method: &str,
        args: Vec<RemoteValue>,
    ) -> Result<RemoteValue, DelegateError> {
        Ok(self
            .execution
            .run_outbound(|| self.handle.invoke(method, args))??)
    }

    pub fn report_error(&self, error: &str) -> Result<(), DelegateError> {
        self.invoke("report_error", vec![error.into()]).map(|_| ())
    }

    pub fn report_message(&self, message: &str, title: &str) -> Result<(), DelegateError> {
        self.invoke("report_message", vec![message.into(), title.into()])
            .map(|_| ())
    }

    /// Asks the player a yes/no question
    pub fn confirm(&self, question: &str) -> Result<bool, DelegateError> {
        let answer = self.invoke("confirm", vec![question.into()])?;
        answer
            .as_bool()
            .ok_or_else(|| unexpected_reply("confirm", answer))
    }

    /// Asks the player to pick one of `options`; `None` if they declined
    /// by answering with unit
    pub fn select_option(
        &self,
        prompt: &str,
        options: &[&str],
    ) -> Result<Option<usize>, DelegateError> {
        let answer = self.invoke(
            "select_option",
            vec![prompt.into(), text_list(options.iter().copied())],
        )?;
        if answer == RemoteValue::Unit {
            return Ok(None);
        }
        answer
            .as_int()
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < options.len())
            .map(Some)
            .ok_or_else(|| unexpected_reply("select_option", answer))
    }
}

fn unexpected_reply(method: &str, reply: RemoteValue) -> DelegateError {
    DelegateError::UnexpectedReply {
        method: method.to_string(),
        reply,
    }
}

// OutboundBroadcaster
#[derive(Clone)]
struct OutboundBroadcaster {
    broadcaster: ChannelBroadcaster,
    execution: Arc<DelegateExecutionManager>,
}

impl OutboundBroadcaster {
    fn broadcast(&self, method: &str, args: Vec<RemoteValue>) -> Result<usize, DelegateError> {
        Ok(self
            .execution
            .run_outbound(|| self.broadcaster.broadcast(method, args))??)
    }
}

// DisplayBroadcaster
/// Fans display updates out to every display of the game
#[derive(Clone)]
pub struct DisplayBroadcaster {
    outbound: OutboundBroadcaster,
}

impl DisplayBroadcaster {
    pub(crate) fn new(
        broadcaster: ChannelBroadcaster,
        execution: Arc<DelegateExecutionManager>,
    ) -> Self {
        Self {
            outbound: OutboundBroadcaster {
                broadcaster,
                execution,
            },
        }
    }

    pub fn channel(&self) -> &RemoteName {
        self.outbound.broadcaster.channel()
    }

    /// Returns how many displays were reached
    pub fn broadcast(&self, method: &str, args: Vec<RemoteValue>) -> Result<usize, DelegateError> {
        self.outbound.broadcast(method, args)
    }

    pub fn report_message(&self, message: &str, title: &str) -> Result<usize, DelegateError> {
        self.broadcast("report_message", vec![message.into(), title.into()])
    }

    pub fn set_status(&self, status: &str) -> Result<usize, DelegateError> {
        self.broadcast("set_status", vec![status.into()])
    }

    pub fn show_dice(&self, annotation: &str, dice: &[u32]) -> Result<usize, DelegateError> {
        let dice = dice.iter().map(|die| RemoteValue::Int(i64::from(*die))).collect();
        self.broadcast("show_dice", vec![annotation.into(), RemoteValue::List(dice)])
    }

    pub fn shut_down(&self) -> Result<usize, DelegateError> {
        self.broadcast("shut_down", Vec::new())
    }
}

// SoundBroadcaster
/// Fans sound clips out to every sound channel subscriber of the game
#[derive(Clone)]
pub struct SoundBroadcaster {
    outbound: OutboundBroadcaster,
}

impl SoundBroadcaster {
    pub(crate) fn new(
        broadcaster: ChannelBroadcaster,
        execution: Arc<DelegateExecutionManager>,
    ) -> Self {
        Self {
            outbound: OutboundBroadcaster {
                broadcaster,
                execution,
            },
        }
    }

    pub fn channel(&self) -> &RemoteName {
        self.outbound.broadcaster.channel()
    }

    pub fn play_sound_for_all(
        &self,
        clip: &str,
        player: &PlayerId,
    ) -> Result<usize, DelegateError> {
        self.outbound
            .broadcast("play_sound_for_all", vec![clip.into(), player.name().into()])
    }

    pub fn play_sound_to_players(
        &self,
        clip: &str,
        players: &[PlayerId],
    ) -> Result<usize, DelegateError> {
        self.outbound.broadcast(
            "play_sound_to_players",
            vec![clip.into(), text_list(players.iter().map(PlayerId::name))],
        )
    }
}
