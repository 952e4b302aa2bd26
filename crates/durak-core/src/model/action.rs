use crate::model::card::CardCodeError;
use crate::model::face::CardFace;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Verb {
    Play = 0,
    Cover = 1,
    Reverse = 2,
    Pass = 3,
    PickUp = 4,
    Defer = 5,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Verb::Play,
        Verb::Cover,
        Verb::Reverse,
        Verb::Pass,
        Verb::PickUp,
        Verb::Defer,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Play => "Play",
            Verb::Cover => "Cover",
            Verb::Reverse => "Reverse",
            Verb::Pass => "Pass",
            Verb::PickUp => "Pick Up",
            Verb::Defer => "Defer",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One move by one player. Legality checks compare actions structurally, so
/// every field takes part in equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "ActionRecord", try_from = "ActionRecord")]
pub struct Action {
    pub player: usize,
    pub verb: Verb,
    pub card: Option<CardFace>,
    /// The attacking card a cover answers.
    pub covering: Option<CardFace>,
}

impl Action {
    pub fn play(player: usize, card: impl Into<CardFace>) -> Self {
        Self {
            player,
            verb: Verb::Play,
            card: Some(card.into()),
            covering: None,
        }
    }

    pub fn cover(player: usize, card: impl Into<CardFace>, covering: impl Into<CardFace>) -> Self {
        Self {
            player,
            verb: Verb::Cover,
            card: Some(card.into()),
            covering: Some(covering.into()),
        }
    }

    pub fn reverse(player: usize, card: impl Into<CardFace>) -> Self {
        Self {
            player,
            verb: Verb::Reverse,
            card: Some(card.into()),
            covering: None,
        }
    }

    pub const fn pass(player: usize) -> Self {
        Self::bare(player, Verb::Pass)
    }

    pub const fn pick_up(player: usize) -> Self {
        Self::bare(player, Verb::PickUp)
    }

    pub const fn defer(player: usize) -> Self {
        Self::bare(player, Verb::Defer)
    }

    const fn bare(player: usize, verb: Verb) -> Self {
        Self {
            player,
            verb,
            card: None,
            covering: None,
        }
    }

    pub fn to_record(self) -> ActionRecord {
        ActionRecord {
            player: self.player,
            verb: self.verb,
            card: CardFace::encode(self.card),
            covering: CardFace::encode(self.covering),
        }
    }

    pub fn from_record(record: ActionRecord) -> Result<Self, CardCodeError> {
        Ok(Self {
            player: record.player,
            verb: record.verb,
            card: CardFace::decode(record.card)?,
            covering: CardFace::decode(record.covering)?,
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {} {}", self.player, self.verb)?;
        if let Some(card) = self.card {
            write!(f, " {card}")?;
        }
        if let Some(covering) = self.covering {
            write!(f, " on {covering}")?;
        }
        Ok(())
    }
}

/// Four-field wire form of an [`Action`]; card fields use the integer codes
/// from [`CardFace::encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionRecord {
    pub player: usize,
    pub verb: Verb,
    pub card: i8,
    pub covering: i8,
}

impl From<Action> for ActionRecord {
    fn from(action: Action) -> Self {
        action.to_record()
    }
}

impl TryFrom<ActionRecord> for Action {
    type Error = CardCodeError;

    fn try_from(record: ActionRecord) -> Result<Self, Self::Error> {
        Action::from_record(record)
    }
}
