//! JSON-lines turn protocol.
//!
//! Each input line is one JSON object describing what the bot sees this turn.
//! The first line also carries a `config` object with the arena size. The answer
//! is a single line: `N`, `S`, `E`, `W` or `WAIT`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ArenaDimensions;
use crate::error::{ArenaError, InvalidCellError, ProtocolError};
use crate::infra::{Move, Position};
use crate::state::{ArenaState, Terrain};

#[derive(Debug, Clone, Deserialize)]
pub struct GameSettings {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub vis_radius: Option<i32>,
    #[serde(default)]
    pub gem_ttl: Option<i32>,
    #[serde(default)]
    pub max_ticks: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GemMessage {
    pub position: [i32; 2],
    #[serde(default)]
    pub ttl: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotMessage {
    pub position: [i32; 2],
}

/// One decoded input line. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnMessage {
    #[serde(default)]
    pub config: Option<GameSettings>,
    #[serde(default)]
    pub tick: u32,
    pub bot: [i32; 2],
    #[serde(default)]
    pub initiative: bool,
    #[serde(default)]
    pub wall: Vec<[i32; 2]>,
    #[serde(default)]
    pub floor: Vec<[i32; 2]>,
    #[serde(default)]
    pub visible_gems: Vec<GemMessage>,
    #[serde(default)]
    pub visible_bots: Vec<BotMessage>,
}

fn position(coords: [i32; 2]) -> Position {
    Position::new(coords[0], coords[1])
}

#[derive(Debug, Clone, Default)]
struct DecoderMemory {
    dimensions: Option<(i32, i32)>,
    default_ttl: Option<i32>,
    known: HashMap<Position, Terrain>,
    seen: HashMap<Position, u32>,
    gems: BTreeMap<Position, Option<i32>>,
}

/// Turns protocol messages into arena snapshots.
///
/// Observed terrain and gems outlive the turn they were seen in: walls and
/// floors accumulate, and gems out of sight are kept until their TTL runs out.
/// A message is folded into a copy of the memory which replaces the old one
/// only once the snapshot builds, so a rejected turn leaves no trace.
#[derive(Debug, Default)]
pub struct TurnDecoder {
    memory: DecoderMemory,
}

impl TurnDecoder {
    pub fn new(fallback: Option<ArenaDimensions>) -> Self {
        Self {
            memory: DecoderMemory {
                dimensions: fallback.map(|d| (d.width, d.height)),
                ..DecoderMemory::default()
            },
        }
    }

    pub fn dimensions(&self) -> Option<(i32, i32)> {
        self.memory.dimensions
    }

    pub fn decode(&mut self, line: &str) -> Result<ArenaState, ProtocolError> {
        let message: TurnMessage = serde_json::from_str(line)?;
        self.apply(message)
    }

    pub fn apply(&mut self, message: TurnMessage) -> Result<ArenaState, ProtocolError> {
        let mut memory = match &message.config {
            Some(settings) => {
                debug!(
                    "Arena {}x{}, vis_radius: {:?}, gem_ttl: {:?}, max_ticks: {:?}",
                    settings.width,
                    settings.height,
                    settings.vis_radius,
                    settings.gem_ttl,
                    settings.max_ticks
                );
                ArenaState::check_dimensions(settings.width, settings.height)?;
                DecoderMemory {
                    dimensions: Some((settings.width, settings.height)),
                    default_ttl: settings.gem_ttl,
                    ..DecoderMemory::default()
                }
            }
            None => self.memory.clone(),
        };
        let state = memory.observe(&message)?;
        self.memory = memory;
        Ok(state)
    }
}

impl DecoderMemory {
    fn observe(&mut self, message: &TurnMessage) -> Result<ArenaState, ProtocolError> {
        let (width, height) = self.dimensions.ok_or(ProtocolError::MissingDimensions)?;
        ArenaState::check_dimensions(width, height)?;

        let check = |coords: [i32; 2]| -> Result<Position, InvalidCellError> {
            let pos = position(coords);
            if pos.x < 0 || pos.y < 0 || pos.x >= width || pos.y >= height {
                return Err(InvalidCellError {
                    position: pos,
                    width,
                    height,
                });
            }
            Ok(pos)
        };
        let agent = check(message.bot).map_err(ArenaError::from)?;
        let walls = collect_checked(&message.wall, check)?;
        let floors = collect_checked(&message.floor, check)?;
        let enemies = collect_checked(
            &message.visible_bots.iter().map(|b| b.position).collect::<Vec<_>>(),
            check,
        )?;
        let visible_gems = message
            .visible_gems
            .iter()
            .map(|g| check(g.position).map(|pos| (pos, g.ttl)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ArenaError::from)?;

        for pos in &walls {
            self.known.insert(*pos, Terrain::Wall);
            self.seen.remove(pos);
        }
        for pos in &floors {
            self.known.insert(*pos, Terrain::Empty);
            self.seen.insert(*pos, message.tick);
        }
        self.remember_gems(&floors, &visible_gems, agent);

        let mut builder = ArenaState::builder(width, height)
            .fill(Terrain::Unknown)
            .tick(message.tick)
            .initiative(message.initiative)
            .agent(agent);
        for (pos, terrain) in &self.known {
            builder = builder.terrain(*pos, *terrain);
        }
        for (pos, tick) in &self.seen {
            builder = builder.seen(*pos, *tick);
        }
        for (pos, ttl) in &self.gems {
            builder = builder.gem(*pos, *ttl);
        }
        for pos in enemies {
            builder = builder.enemy(pos);
        }
        Ok(builder.build()?)
    }

    fn remember_gems(
        &mut self,
        floors: &[Position],
        visible: &[(Position, Option<i32>)],
        agent: Position,
    ) {
        self.gems.retain(|_, ttl| match ttl {
            Some(left) => {
                *left -= 1;
                *left > 0
            }
            None => true,
        });

        // A remembered gem on a visible floor cell that is no longer reported is gone.
        let seen: BTreeSet<Position> = visible.iter().map(|(pos, _)| *pos).collect();
        for pos in floors {
            if !seen.contains(pos) {
                self.gems.remove(pos);
            }
        }

        for (pos, ttl) in visible {
            if self.known.get(pos) == Some(&Terrain::Wall) {
                warn!("Ignoring gem reported on wall {}", pos);
                continue;
            }
            self.gems.insert(*pos, ttl.or(self.default_ttl));
        }

        // A cell later reported as wall cannot hold a gem.
        let known = &self.known;
        self.gems.retain(|pos, _| known.get(pos) != Some(&Terrain::Wall));
        self.gems.remove(&agent);
    }
}

fn collect_checked(
    coords: &[[i32; 2]],
    check: impl Fn([i32; 2]) -> Result<Position, InvalidCellError>,
) -> Result<Vec<Position>, ArenaError> {
    Ok(coords.iter().map(|c| check(*c)).collect::<Result<Vec<_>, _>>()?)
}

pub fn encode_move(mv: Move) -> &'static str {
    mv.as_str_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str = r#"{"config": {"width": 5, "height": 4, "gem_ttl": 10}, "tick": 1, "bot": [1, 1], "wall": [[0, 0]], "floor": [[1, 1], [2, 1], [3, 1]], "initiative": true, "visible_gems": [{"position": [3, 1], "ttl": 3}], "visible_bots": [{"position": [1, 2]}]}"#;

    #[test]
    fn test_decode_first_message() {
        let mut decoder = TurnDecoder::new(None);
        let state = decoder.decode(FIRST).unwrap();
        assert_eq!(decoder.dimensions(), Some((5, 4)));
        assert_eq!((state.width(), state.height()), (5, 4));
        assert_eq!(state.tick(), 1);
        assert_eq!(state.agent(), Position::new(1, 1));
        assert_eq!(state.terrain_at(&Position::new(0, 0)), Some(Terrain::Wall));
        assert_eq!(state.terrain_at(&Position::new(2, 1)), Some(Terrain::Empty));
        assert_eq!(state.terrain_at(&Position::new(4, 3)), Some(Terrain::Unknown));
        assert_eq!(state.gems().len(), 1);
        assert_eq!(state.gems()[0].ttl, Some(3));
        assert_eq!(state.enemies(), &[Position::new(1, 2)]);
        assert!(state.initiative());
        assert_eq!(state.last_seen(&Position::new(3, 1)), Some(1));
        assert_eq!(state.last_seen(&Position::new(0, 0)), None);
    }

    #[test]
    fn test_terrain_and_gems_are_remembered() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        let state = decoder
            .decode(r#"{"tick": 2, "bot": [1, 2], "wall": [], "floor": [[1, 2]], "visible_gems": []}"#)
            .unwrap();
        assert_eq!(state.terrain_at(&Position::new(0, 0)), Some(Terrain::Wall));
        assert_eq!(state.terrain_at(&Position::new(3, 1)), Some(Terrain::Empty));
        assert_eq!(state.gems().len(), 1);
        assert_eq!(state.gems()[0].ttl, Some(2));
        assert!(state.enemies().is_empty());
    }

    #[test]
    fn test_remembered_gems_expire() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        let quiet = r#"{"tick": 2, "bot": [1, 1]}"#;
        assert_eq!(decoder.decode(quiet).unwrap().gems().len(), 1);
        assert_eq!(decoder.decode(quiet).unwrap().gems().len(), 1);
        assert!(decoder.decode(quiet).unwrap().gems().is_empty());
    }

    #[test]
    fn test_gem_on_visible_floor_without_report_is_dropped() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        let state = decoder
            .decode(r#"{"tick": 2, "bot": [2, 1], "floor": [[2, 1], [3, 1]], "visible_gems": []}"#)
            .unwrap();
        assert!(state.gems().is_empty());
    }

    #[test]
    fn test_gem_under_agent_is_dropped() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        let state = decoder.decode(r#"{"tick": 2, "bot": [3, 1]}"#).unwrap();
        assert!(state.gems().is_empty());
    }

    #[test]
    fn test_default_ttl_from_settings() {
        let mut decoder = TurnDecoder::new(None);
        let state = decoder
            .decode(r#"{"config": {"width": 3, "height": 3, "gem_ttl": 7}, "bot": [0, 0], "visible_gems": [{"position": [2, 2]}]}"#)
            .unwrap();
        assert_eq!(state.gems()[0].ttl, Some(7));
    }

    #[test]
    fn test_missing_dimensions() {
        let mut decoder = TurnDecoder::new(None);
        assert!(matches!(
            decoder.decode(r#"{"tick": 1, "bot": [0, 0]}"#),
            Err(ProtocolError::MissingDimensions)
        ));

        let mut decoder = TurnDecoder::new(Some(ArenaDimensions { width: 2, height: 2 }));
        assert!(decoder.decode(r#"{"tick": 1, "bot": [0, 0]}"#).is_ok());
    }

    #[test]
    fn test_out_of_bounds_rejected_without_polluting_memory() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        let err = decoder
            .decode(r#"{"tick": 2, "bot": [1, 1], "wall": [[2, 1], [9, 9]]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Arena(ArenaError::InvalidCell(InvalidCellError { .. }))
        ));
        let state = decoder.decode(r#"{"tick": 3, "bot": [1, 1]}"#).unwrap();
        assert_eq!(state.terrain_at(&Position::new(2, 1)), Some(Terrain::Empty));
    }

    #[test]
    fn test_agent_on_wall_and_bad_json() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();
        assert!(matches!(
            decoder.decode(r#"{"tick": 2, "bot": [0, 0]}"#),
            Err(ProtocolError::Arena(ArenaError::AgentOnWall(_)))
        ));
        assert!(matches!(decoder.decode("not json"), Err(ProtocolError::Json(_))));
        assert!(matches!(decoder.decode(r#"{"tick": 2}"#), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_oversized_arena_rejected_and_decoder_still_usable() {
        let mut decoder = TurnDecoder::new(None);
        let err = decoder
            .decode(r#"{"config": {"width": 65536, "height": 65536}, "bot": [0, 0]}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Arena(ArenaError::TooLarge {
                width: 65536,
                height: 65536
            })
        ));
        assert_eq!(decoder.dimensions(), None);
        assert!(matches!(
            decoder.decode(r#"{"config": {"width": 0, "height": 3}, "bot": [0, 0]}"#),
            Err(ProtocolError::Arena(ArenaError::EmptyArena { .. }))
        ));
        assert!(decoder.decode(FIRST).is_ok());
        assert_eq!(decoder.dimensions(), Some((5, 4)));
    }

    #[test]
    fn test_gem_on_later_wall_is_dropped() {
        let mut decoder = TurnDecoder::new(None);
        decoder
            .decode(r#"{"config": {"width": 5, "height": 2}, "bot": [0, 0], "floor": [[0, 0]], "visible_gems": [{"position": [3, 0]}]}"#)
            .unwrap();
        let state = decoder
            .decode(r#"{"tick": 2, "bot": [0, 0], "wall": [[3, 0]]}"#)
            .unwrap();
        assert_eq!(state.terrain_at(&Position::new(3, 0)), Some(Terrain::Wall));
        assert!(state.gems().is_empty());
        assert!(decoder.decode(r#"{"tick": 3, "bot": [1, 0]}"#).is_ok());
    }

    #[test]
    fn test_rejected_turn_leaves_memory_untouched() {
        let mut decoder = TurnDecoder::new(None);
        decoder.decode(FIRST).unwrap();

        // Agent on a known wall: terrain, last-seen ticks and gem TTLs stay as they were.
        assert!(
            decoder
                .decode(r#"{"tick": 2, "bot": [0, 0], "floor": [[4, 3]], "wall": [[2, 1]]}"#)
                .is_err()
        );
        // Enemy on a wall fails in the builder, after memory would have been updated.
        assert!(matches!(
            decoder.decode(r#"{"tick": 3, "bot": [1, 1], "floor": [[4, 0]], "visible_bots": [{"position": [0, 0]}]}"#),
            Err(ProtocolError::Arena(ArenaError::OccupiedWall(_)))
        ));

        let state = decoder.decode(r#"{"tick": 4, "bot": [1, 1]}"#).unwrap();
        assert_eq!(state.terrain_at(&Position::new(2, 1)), Some(Terrain::Empty));
        assert_eq!(state.terrain_at(&Position::new(4, 3)), Some(Terrain::Unknown));
        assert_eq!(state.terrain_at(&Position::new(4, 0)), Some(Terrain::Unknown));
        assert_eq!(state.last_seen(&Position::new(2, 1)), Some(1));
        assert_eq!(state.gems()[0].ttl, Some(2));
    }

    #[test]
    fn test_encode_move() {
        assert_eq!(encode_move(Move::Up), "N");
        assert_eq!(encode_move(Move::Down), "S");
        assert_eq!(encode_move(Move::Left), "W");
        assert_eq!(encode_move(Move::Right), "E");
        assert_eq!(encode_move(Move::Stay), "WAIT");
    }
}
