use std::{collections::HashMap, sync::Arc};

use log::debug;

use skirmish_shared::RemoteMessenger;

use crate::delegate::{
    change::Change,
    error::DelegateError,
    execution::DelegateExecutionManager,
    random::{RandomCategory, RandomSource},
    random_stats::RandomStats,
    remotes::{
        display_channel, remote_player_name, sound_channel, DisplayBroadcaster, RemotePlayer,
        SoundBroadcaster,
    },
    session::{GameSession, GameStep, HistoryWriter, PlayerId},
};

/// Everything a game's delegates share across steps
#[derive(Clone)]
pub struct GameServices {
    pub game_id: String,
    pub session: Arc<dyn GameSession>,
    pub messenger: Arc<RemoteMessenger>,
    pub execution: Arc<DelegateExecutionManager>,
    pub random_stats: Arc<RandomStats>,
    pub history: Arc<dyn HistoryWriter>,
}

/// The way rule-execution code touches the game during one step: random
/// numbers, state changes and the other peers. A bridge belongs to a single
/// step and is dropped with it.
pub struct DelegateBridge {
    services: GameServices,
    step: GameStep,
    random_source: Arc<dyn RandomSource>,
}

impl DelegateBridge {
    pub fn new(
        services: GameServices,
        step: GameStep,
        random_source: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            services,
            step,
            random_source,
        }
    }

    pub fn set_random_source(&mut self, random_source: Arc<dyn RandomSource>) {
        self.random_source = random_source;
    }

    /// Player of the current step
    pub fn player_id(&self) -> Option<&PlayerId> {
        self.step.player()
    }

    pub fn current_step_name(&self) -> &str {
        self.step.name()
    }

    pub fn current_step_properties(&self) -> &HashMap<String, String> {
        self.step.properties()
    }

    pub fn history_writer(&self) -> &Arc<dyn HistoryWriter> {
        &self.services.history
    }

    pub fn stop_game_sequence(&self) {
        self.services.session.stop_game_sequence();
    }

    fn is_game_over(&self) -> bool {
        self.services.session.is_game_over() || self.services.execution.is_game_over()
    }

    /// One value in `[0, max)`
    pub fn get_random(
        &self,
        max: u32,
        player: Option<&PlayerId>,
        category: RandomCategory,
        annotation: &str,
    ) -> Result<u32, DelegateError> {
        let mut values = self.get_random_numbers(max, 1, player, category, annotation)?;
        values.pop().ok_or(DelegateError::RandomCountMismatch {
            expected: 1,
            received: 0,
        })
    }

    /// `count` values in `[0, max)`, recorded in the roll statistics of
    /// `player` (the step's player if `None`) under `category`
    pub fn get_random_numbers(
        &self,
        max: u32,
        count: usize,
        player: Option<&PlayerId>,
        category: RandomCategory,
        annotation: &str,
    ) -> Result<Vec<u32>, DelegateError> {
        if max == 0 || count == 0 {
            return Err(DelegateError::InvalidRandomRequest { max, count });
        }
        if self.is_game_over() {
            return Err(DelegateError::GameOver);
        }

        let values = self
            .services
            .execution
            .run_outbound(|| self.random_source.get_randoms(max, count, annotation))??;

        if values.len() != count {
            return Err(DelegateError::RandomCountMismatch {
                expected: count,
                received: values.len(),
            });
        }
        if let Some(value) = values.iter().find(|value| **value >= max) {
            return Err(DelegateError::RandomOutOfRange { value: *value, max });
        }

        let player = player.or_else(|| self.step.player());
        self.services
            .random_stats
            .add_random(player, category, &values);
        debug!("{}: rolled {:?} (max {})", annotation, values, max);
        Ok(values)
    }

    /// Publishes `change` to the session once. Empty changes are dropped
    /// and single-child composites are unwrapped first.
    pub fn apply_change(&self, change: Change) {
        let change = change.flatten();
        if change.is_empty() {
            return;
        }
        self.services.session.add_change(change);
    }

    /// Handle on the peer playing `player`, or the step's player if `None`
    pub fn resolve_remote_player(
        &self,
        player: Option<&PlayerId>,
    ) -> Result<RemotePlayer, DelegateError> {
        let player = player
            .or_else(|| self.step.player())
            .cloned()
            .ok_or_else(|| DelegateError::NoPlayer {
                step: self.step.name().to_string(),
            })?;
        if self.is_game_over() {
            return Err(DelegateError::GameOver);
        }

        let handle = self
            .services
            .messenger
            .remote(&remote_player_name(&player))?;
        Ok(RemotePlayer::new(
            player,
            handle,
            self.services.execution.clone(),
        ))
    }

    pub fn resolve_display_broadcaster(&self) -> DisplayBroadcaster {
        let broadcaster = self
            .services
            .messenger
            .channel_broadcaster(&display_channel(&self.services.game_id));
        DisplayBroadcaster::new(broadcaster, self.services.execution.clone())
    }

    pub fn resolve_sound_broadcaster(&self) -> SoundBroadcaster {
        let broadcaster = self
            .services
            .messenger
            .channel_broadcaster(&sound_channel(&self.services.game_id));
        SoundBroadcaster::new(broadcaster, self.services.execution.clone())
    }

    /// Steps out of delegate execution before a network round-trip
    pub fn enter_network_section(&self) -> Result<(), DelegateError> {
        self.services.execution.leave_delegate_execution()
    }

    /// Steps back into delegate execution after a network round-trip
    pub fn leave_network_section(&self) -> Result<(), DelegateError> {
        self.services.execution.enter_delegate_execution()
    }
}
