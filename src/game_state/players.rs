//! Seats at the table and who controls them.

use std::fmt;
use std::str::FromStr;

use crate::board::topology::Variant;
use crate::chess_errors::{ConfigResult, ConfigurationError};
use crate::game_state::chess_types::TeamColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerKind {
    Human,
    Random,
    MonteCarlo,
}

impl FromStr for ControllerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(ControllerKind::Human),
            "random" => Ok(ControllerKind::Random),
            "mc" | "mcts" | "montecarlo" | "monte-carlo" => Ok(ControllerKind::MonteCarlo),
            other => Err(format!("unknown controller `{other}`")),
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerKind::Human => f.write_str("human"),
            ControllerKind::Random => f.write_str("random"),
            ControllerKind::MonteCarlo => f.write_str("monte-carlo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Seat index, the order turns are taken in.
    pub id: usize,
    pub team: usize,
    pub color: TeamColor,
    pub controller: ControllerKind,
}

/// Teams that sit down for a given participant count.
pub fn default_teams(variant: Variant, count: usize) -> ConfigResult<Vec<usize>> {
    match (variant, count) {
        (Variant::Normal, 2) => Ok(vec![0, 1]),
        (Variant::Wormhole, 2) => Ok(vec![0, 3]),
        (Variant::Wormhole, 4) => Ok(vec![0, 1, 2, 3]),
        _ => Err(ConfigurationError::UnsupportedPlayerCount {
            count,
            variant: variant.to_string(),
        }),
    }
}

/// One player per default team, controllers assigned in seat order.
pub fn create_players(variant: Variant, controllers: &[ControllerKind]) -> ConfigResult<Vec<Player>> {
    let teams = default_teams(variant, controllers.len())?;
    Ok(teams
        .into_iter()
        .zip(controllers)
        .enumerate()
        .filter_map(|(id, (team, controller))| {
            TeamColor::from_index(team).map(|color| Player {
                id,
                team,
                color,
                controller: *controller,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_player_wormhole_seats_white_and_red() {
        let players = create_players(Variant::Wormhole, &[ControllerKind::Human, ControllerKind::Random])
            .expect("two players should be supported");
        let colors: Vec<TeamColor> = players.iter().map(|p| p.color).collect();
        assert_eq!(colors, vec![TeamColor::White, TeamColor::Red]);
        assert_eq!(players[1].id, 1);
        assert_eq!(players[1].team, 3);
    }

    #[test]
    fn normal_variant_rejects_four_players() {
        assert!(matches!(
            create_players(Variant::Normal, &[ControllerKind::Random; 4]),
            Err(ConfigurationError::UnsupportedPlayerCount { count: 4, .. })
        ));
        assert!("monte-carlo".parse::<ControllerKind>().is_ok());
    }
}
