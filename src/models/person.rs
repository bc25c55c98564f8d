//! Person (external identity) and the archer color palette.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity key handed to us by the identity provider.
pub type PersonId = String;

/// Archer colors. A match needs four distinct ones.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Green,
    Blue,
    Pink,
    Orange,
    White,
    Yellow,
    Cyan,
    Purple,
}

impl Color {
    /// The full palette, in display order.
    pub const ALL: [Color; 8] = [
        Color::Green,
        Color::Blue,
        Color::Pink,
        Color::Orange,
        Color::White,
        Color::Yellow,
        Color::Cyan,
        Color::Purple,
    ];

    /// Pick a color uniformly from `choices`. None if there is nothing to pick from.
    pub fn random_from<R: Rng + ?Sized>(choices: &[Color], rng: &mut R) -> Option<Color> {
        choices.choose(rng).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Pink => "pink",
            Color::Orange => "orange",
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
        };
        f.write_str(s)
    }
}

/// Someone known to the system. We only read these fields; login and sessions live elsewhere.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub nick: String,
    /// First entry is the preferred color.
    #[serde(default)]
    pub color_preference: Vec<Color>,
    #[serde(default)]
    pub avatar_url: String,
    /// Disabled people are not actively playing and always rank last.
    #[serde(default)]
    pub disabled: bool,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>, nick: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nick: nick.into(),
            color_preference: vec![color],
            avatar_url: String::new(),
            disabled: false,
        }
    }

    /// Preferred color, if the person picked one.
    pub fn preferred_color(&self) -> Option<Color> {
        self.color_preference.first().copied()
    }

    /// Key used to detect duplicate joins.
    pub fn nick_key(&self) -> String {
        self.nick.trim().to_lowercase()
    }

    /// Fill in a nick and a color for people that never completed registration.
    /// Returns true if anything changed, so the caller can write the person back.
    pub fn correct<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut changed = false;
        if self.nick.trim().is_empty() {
            self.nick = self
                .name
                .split_whitespace()
                .next()
                .unwrap_or(self.id.as_str())
                .to_string();
            log::info!("Corrected nick for {} to {}", self.id, self.nick);
            changed = true;
        }
        if self.color_preference.is_empty() {
            if let Some(c) = Color::random_from(&Color::ALL, rng) {
                self.color_preference.push(c);
                log::info!("Corrected color for {} to {}", self.nick, c);
                changed = true;
            }
        }
        changed
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Person {} ({})>", self.name, self.nick)
    }
}
