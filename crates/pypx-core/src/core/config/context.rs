use super::PypxConfig;
use crate::core::runtime::effects::{Effects, SharedEffects};
use crate::core::runtime::CommandGroup;

#[derive(Clone, Copy, Debug)]
pub struct CommandInfo {
    pub group: CommandGroup,
    pub name: &'static str,
}

impl CommandInfo {
    #[must_use]
    pub const fn new(group: CommandGroup, name: &'static str) -> Self {
        Self { group, name }
    }
}

/// Managed roots and effects handed to every command handler.
pub struct CommandContext {
    config: PypxConfig,
    effects: SharedEffects,
}

impl CommandContext {
    #[must_use]
    pub fn new(config: PypxConfig, effects: SharedEffects) -> Self {
        Self { config, effects }
    }

    #[must_use]
    pub fn config(&self) -> &PypxConfig {
        &self.config
    }

    pub fn effects(&self) -> &dyn Effects {
        self.effects.as_ref()
    }
}
