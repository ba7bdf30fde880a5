use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Points awarded for a successful whack.
pub const WHACK_POINTS: u32 = 10;
/// Spawner tick; each tick spawns one mole after a random delay below this.
pub const SPAWN_INTERVAL_MS: u64 = 500;
/// Largest payload a single UDP datagram can carry over IPv4.
pub const MAX_PACKET_SIZE: usize = 65_507;
/// Most moles a single listing reply carries, so the reply fits one datagram.
pub const MAX_LISTED_MOLES: usize = 2_048;

/// Name a player registers under. Two players are the same player iff their
/// names are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PlayerName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Opaque mole identifier, compared only for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoleId(Uuid);

impl MoleId {
    /// Generates a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub name: PlayerName,
    pub score: u32,
}

/// Operations a client may ask of the game server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Register { name: PlayerName },
    Deregister { name: PlayerName },
    ListPlayers,
    Start,
    Stop,
    ListMoles,
    Whack { name: PlayerName, mole: MoleId },
    UnreadEvents,
}

/// Outcome of a [`Command`].
///
/// The failure variants mirror the status classes a client acts upon:
/// `Conflict` for a duplicate registration, `BadRequest` for an operation
/// naming an unregistered player, `ServerError` for anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Done,
    Players(Vec<PlayerScore>),
    Moles(Vec<MoleId>),
    Hit,
    Missed,
    Events(Vec<String>),
    Conflict { reason: String },
    BadRequest { reason: String },
    ServerError { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Packet {
    Request { request_id: u64, command: Command },
    Response { request_id: u64, reply: Reply },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_name_equality_is_by_value() {
        let a = PlayerName::new("dan");
        let b = PlayerName::from("dan".to_string());

        assert_eq!(a, b);
        assert_ne!(a, PlayerName::from("Dan"));
        assert_eq!(a.as_str(), "dan");
        assert_eq!(a.to_string(), "dan");
    }

    #[test]
    fn test_mole_ids_are_unique() {
        let first = MoleId::random();
        let second = MoleId::random();

        assert_ne!(first, second);
    }

    #[test]
    fn test_mole_id_displays_as_uuid_v4() {
        let mole = MoleId::random();
        let parsed = Uuid::parse_str(&mole.to_string()).unwrap();

        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_packet_serialization_whack_request() {
        let mole = MoleId::random();
        let packet = Packet::Request {
            request_id: 7,
            command: Command::Whack {
                name: PlayerName::new("player-one"),
                mole,
            },
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Request {
                request_id,
                command: Command::Whack { name, mole: id },
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(name.as_str(), "player-one");
                assert_eq!(id, mole);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_packet_serialization_players_response() {
        let packet = Packet::Response {
            request_id: 3,
            reply: Reply::Players(vec![
                PlayerScore {
                    name: PlayerName::new("dan"),
                    score: 20,
                },
                PlayerScore {
                    name: PlayerName::new("eve"),
                    score: 0,
                },
            ]),
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();

        match deserialized {
            Packet::Response {
                request_id,
                reply: Reply::Players(players),
            } => {
                assert_eq!(request_id, 3);
                assert_eq!(players.len(), 2);
                assert_eq!(players[0].name.as_str(), "dan");
                assert_eq!(players[0].score, 20);
                assert_eq!(players[1].score, 0);
            }
            _ => panic!("Wrong packet type after deserialization"),
        }
    }

    #[test]
    fn test_capped_mole_listing_fits_in_one_datagram() {
        let moles: Vec<MoleId> = (0..MAX_LISTED_MOLES).map(|_| MoleId::random()).collect();
        let packet = Packet::Response {
            request_id: u64::MAX,
            reply: Reply::Moles(moles),
        };

        let serialized = bincode::serialize(&packet).unwrap();
        assert!(serialized.len() <= MAX_PACKET_SIZE);
    }

    #[test]
    fn test_uncapped_mole_listing_can_exceed_one_datagram() {
        let moles: Vec<MoleId> = (0..3_000).map(|_| MoleId::random()).collect();
        let packet = Packet::Response {
            request_id: 1,
            reply: Reply::Moles(moles),
        };

        let serialized = bincode::serialize(&packet).unwrap();
        assert!(serialized.len() > MAX_PACKET_SIZE);
    }
}
