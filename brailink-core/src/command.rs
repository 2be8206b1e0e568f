//! Logical command resolution
//!
//! Raw key codes go through the command table, then the routing submode
//! decides how routing keys are offset. Keys 1 and 2 do not produce a
//! command of their own; they arm the submode for the next routing key.

use crate::config::{CommandTable, RoutingOffsets};

/// Translated code that arms begin-block routing
pub const SET_BEGIN_BLOCK: u8 = 1;

/// Translated code that arms end-block routing
pub const SET_END_BLOCK: u8 = 2;

/// High bit marking a translated code as a routing key
pub const ROUTING_FLAG: u8 = 0x80;

/// Logical command passed up to the screen layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command(pub u16);

impl Command {
    /// Command that does nothing
    pub const NOOP: Command = Command(0);

    /// Interpret this command as a routing request
    ///
    /// Returns the kind of routing and the cell index, or `None` for
    /// ordinary commands.
    pub fn routing_target(self, offsets: &RoutingOffsets) -> Option<(Routing, u8)> {
        let ranges = [
            (Routing::Route, offsets.route),
            (Routing::BeginBlock, offsets.begin_block),
            (Routing::EndBlock, offsets.end_block),
        ];
        ranges.into_iter().find_map(|(kind, base)| {
            let cell = self.0.checked_sub(base)?;
            (cell <= u16::from(!ROUTING_FLAG)).then_some((kind, cell as u8))
        })
    }
}

/// Kinds of routing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routing {
    Route,
    BeginBlock,
    EndBlock,
}

/// How key input should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// Translate keys through the command table
    #[default]
    Normal,
    /// A message is on the display; every key just dismisses it
    Message,
}

/// Pending modifier for the next routing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoutingSubmode {
    #[default]
    None,
    BeginBlock,
    EndBlock,
}

/// Turns raw key codes into logical commands
///
/// Holds the routing submode between calls.
#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    submode: RoutingSubmode,
}

impl CommandResolver {
    /// Create a resolver with no submode armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently armed submode
    pub fn submode(&self) -> RoutingSubmode {
        self.submode
    }

    /// Resolve one raw key
    ///
    /// Returns `None` when the key only armed a submode.
    pub fn resolve(
        &mut self,
        raw: u8,
        mode: InputMode,
        table: &CommandTable,
        offsets: &RoutingOffsets,
    ) -> Option<Command> {
        let code = match mode {
            InputMode::Normal => table.translate(raw),
            InputMode::Message => Command::NOOP.0 as u8,
        };

        match code {
            SET_BEGIN_BLOCK => {
                self.submode = RoutingSubmode::BeginBlock;
                return None;
            }
            SET_END_BLOCK => {
                self.submode = RoutingSubmode::EndBlock;
                return None;
            }
            _ => {}
        }

        let submode = core::mem::take(&mut self.submode);
        if code & ROUTING_FLAG == 0 {
            return Some(Command(u16::from(code)));
        }

        let cell = u16::from(code & !ROUTING_FLAG);
        let base = match submode {
            RoutingSubmode::None => offsets.route,
            RoutingSubmode::BeginBlock => offsets.begin_block,
            RoutingSubmode::EndBlock => offsets.end_block,
        };
        tracing::trace!(cell, ?submode, "routing key");
        Some(Command(cell + base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(resolver: &mut CommandResolver, raw: u8) -> Option<Command> {
        resolver.resolve(
            raw,
            InputMode::Normal,
            &CommandTable::default(),
            &RoutingOffsets::default(),
        )
    }

    #[test]
    fn test_plain_routing() {
        let mut resolver = CommandResolver::new();
        assert_eq!(resolve(&mut resolver, 0x85), Some(Command(0x105)));
        assert_eq!(resolver.submode(), RoutingSubmode::None);
    }

    #[test]
    fn test_begin_block_submode() {
        let mut resolver = CommandResolver::new();
        assert_eq!(resolve(&mut resolver, SET_BEGIN_BLOCK), None);
        assert_eq!(resolver.submode(), RoutingSubmode::BeginBlock);
        assert_eq!(resolve(&mut resolver, 0x85), Some(Command(0x205)));
        assert_eq!(resolver.submode(), RoutingSubmode::None);
        assert_eq!(resolve(&mut resolver, 0x85), Some(Command(0x105)));
    }

    #[test]
    fn test_end_block_submode() {
        let mut resolver = CommandResolver::new();
        assert_eq!(resolve(&mut resolver, SET_END_BLOCK), None);
        assert_eq!(resolve(&mut resolver, 0x80), Some(Command(0x300)));
    }

    #[test]
    fn test_later_setter_wins() {
        let mut resolver = CommandResolver::new();
        resolve(&mut resolver, SET_BEGIN_BLOCK);
        resolve(&mut resolver, SET_END_BLOCK);
        assert_eq!(resolve(&mut resolver, 0x81), Some(Command(0x301)));
    }

    #[test]
    fn test_ordinary_command_clears_submode() {
        let mut table = CommandTable::default();
        table.bind(0x07, 0x21);
        let offsets = RoutingOffsets::default();
        let mut resolver = CommandResolver::new();

        resolve(&mut resolver, SET_BEGIN_BLOCK);
        let cmd = resolver.resolve(0x07, InputMode::Normal, &table, &offsets);
        assert_eq!(cmd, Some(Command(0x21)));
        assert_eq!(resolver.submode(), RoutingSubmode::None);
    }

    #[test]
    fn test_message_mode_yields_noop() {
        let mut resolver = CommandResolver::new();
        resolve(&mut resolver, SET_END_BLOCK);
        let cmd = resolver.resolve(
            SET_BEGIN_BLOCK,
            InputMode::Message,
            &CommandTable::default(),
            &RoutingOffsets::default(),
        );
        assert_eq!(cmd, Some(Command::NOOP));
        assert_eq!(resolver.submode(), RoutingSubmode::None);
    }

    #[test]
    fn test_routing_target() {
        let offsets = RoutingOffsets::default();
        assert_eq!(
            Command(0x105).routing_target(&offsets),
            Some((Routing::Route, 5))
        );
        assert_eq!(
            Command(0x27F).routing_target(&offsets),
            Some((Routing::BeginBlock, 0x7F))
        );
        assert_eq!(
            Command(0x300).routing_target(&offsets),
            Some((Routing::EndBlock, 0))
        );
        assert_eq!(Command(0x21).routing_target(&offsets), None);
        assert_eq!(Command(0x180).routing_target(&offsets), None);
    }
}
