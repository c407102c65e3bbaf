//! Species and the conversion rule

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the three fighting species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Rock,
    Paper,
    Scissors,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Rock, Species::Paper, Species::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Rock => "rock",
            Species::Paper => "paper",
            Species::Scissors => "scissors",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Species::Rock => "🪨",
            Species::Paper => "📜",
            Species::Scissors => "✂️",
        }
    }

    /// The species this one converts on contact
    pub fn prey(&self) -> Species {
        match self {
            Species::Rock => Species::Scissors,
            Species::Scissors => Species::Paper,
            Species::Paper => Species::Rock,
        }
    }

    fn index(&self) -> usize {
        match self {
            Species::Rock => 0,
            Species::Paper => 1,
            Species::Scissors => 2,
        }
    }
}

impl FromStr for Species {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(Species::Rock),
            "paper" => Ok(Species::Paper),
            "scissors" => Ok(Species::Scissors),
            _ => Err(ConfigError::UnknownSpecies(s.to_string())),
        }
    }
}

/// Winner of a collision between `a` and `b`.
///
/// Identical species tie to themselves; otherwise the predator wins, and
/// anything `a` does not beat goes to `b`.
pub fn winner(a: Species, b: Species) -> Species {
    if a == b || a.prey() == b { a } else { b }
}

/// Live population per species
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    counts: [u32; 3],
}

impl SpeciesCounts {
    pub fn new(rock: u32, paper: u32, scissors: u32) -> Self {
        Self {
            counts: [rock, paper, scissors],
        }
    }

    /// Same count for every species
    pub fn equal(count: u32) -> Self {
        Self::new(count, count, count)
    }

    pub fn get(&self, species: Species) -> u32 {
        self.counts[species.index()]
    }

    pub fn set(&mut self, species: Species, count: u32) {
        self.counts[species.index()] = count;
    }

    pub fn increment(&mut self, species: Species) {
        self.counts[species.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Species with at least one member, in `Species::ALL` order
    pub fn surviving(&self) -> impl Iterator<Item = Species> + '_ {
        Species::ALL.into_iter().filter(|s| self.get(*s) > 0)
    }

    pub fn surviving_count(&self) -> usize {
        self.surviving().count()
    }

    /// The only species left, if exactly one remains
    pub fn sole_survivor(&self) -> Option<Species> {
        let mut alive = self.surviving();
        match (alive.next(), alive.next()) {
            (Some(species), None) => Some(species),
            _ => None,
        }
    }

    /// Strictly largest population (None on ties)
    pub fn leader(&self) -> Option<Species> {
        Species::ALL.into_iter().find(|&s| {
            Species::ALL
                .into_iter()
                .filter(|&other| other != s)
                .all(|other| self.get(s) > self.get(other))
        })
    }
}
