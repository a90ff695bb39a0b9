//! Calendar Types
//!
//! Seasons and weather for the day-by-day simulation.
//!
//! # Example
//!
//! ```
//! use life_events::{Season, Weather};
//!
//! assert_eq!(Season::Winter.next(), Season::Spring);
//! assert_eq!(Weather::Perfect.mood_bonus(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vocab::UnknownTag;

/// Number of days between season changes.
pub const DAYS_PER_SEASON: u32 = 30;

/// Season of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Returns the next season in order.
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        }
    }

    /// Relative weights of each weather type drawn during this season.
    ///
    /// Weather types absent from the table never occur from a fresh draw.
    pub fn weather_weights(self) -> &'static [(Weather, u32)] {
        match self {
            Season::Winter => &[
                (Weather::Sunny, 1),
                (Weather::Cloudy, 3),
                (Weather::Rainy, 1),
                (Weather::Stormy, 1),
                (Weather::Snowy, 3),
            ],
            Season::Summer => &[
                (Weather::Sunny, 4),
                (Weather::Cloudy, 2),
                (Weather::Rainy, 1),
                (Weather::Stormy, 1),
                (Weather::Perfect, 2),
            ],
            Season::Spring => &[
                (Weather::Sunny, 2),
                (Weather::Cloudy, 2),
                (Weather::Rainy, 3),
                (Weather::Stormy, 1),
                (Weather::Perfect, 2),
            ],
            Season::Fall => &[
                (Weather::Sunny, 2),
                (Weather::Cloudy, 3),
                (Weather::Rainy, 2),
                (Weather::Stormy, 1),
                (Weather::Perfect, 1),
            ],
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            // Accept the alternate spelling used by some content files
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            _ => Err(UnknownTag {
                kind: "season",
                value: s.to_string(),
            }),
        }
    }
}

/// Today's weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Overcast,
    Rainy,
    Stormy,
    Snowy,
    Foggy,
    Hot,
    Humid,
    Warm,
    Cool,
    Windy,
    Perfect,
}

impl Weather {
    pub const ALL: &'static [Weather] = &[
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Overcast,
        Weather::Rainy,
        Weather::Stormy,
        Weather::Snowy,
        Weather::Foggy,
        Weather::Hot,
        Weather::Humid,
        Weather::Warm,
        Weather::Cool,
        Weather::Windy,
        Weather::Perfect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Overcast => "overcast",
            Weather::Rainy => "rainy",
            Weather::Stormy => "stormy",
            Weather::Snowy => "snowy",
            Weather::Foggy => "foggy",
            Weather::Hot => "hot",
            Weather::Humid => "humid",
            Weather::Warm => "warm",
            Weather::Cool => "cool",
            Weather::Windy => "windy",
            Weather::Perfect => "perfect",
        }
    }

    /// Daily happiness adjustment; its sign also nudges starting energy.
    pub fn mood_bonus(self) -> i32 {
        match self {
            Weather::Perfect => 2,
            Weather::Sunny | Weather::Warm | Weather::Cool => 1,
            Weather::Cloudy | Weather::Snowy | Weather::Foggy | Weather::Windy => 0,
            Weather::Overcast
            | Weather::Rainy
            | Weather::Stormy
            | Weather::Hot
            | Weather::Humid => -1,
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weather {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weather::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "weather",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_cycle() {
        let mut season = Season::Spring;
        for _ in 0..4 {
            season = season.next();
        }
        assert_eq!(season, Season::Spring);
        assert_eq!(Season::Summer.next(), Season::Fall);
    }

    #[test]
    fn test_season_parse() {
        assert_eq!("Winter".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!("autumn".parse::<Season>().unwrap(), Season::Fall);
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_weather_tables_never_snow_in_summer() {
        assert!(Season::Summer
            .weather_weights()
            .iter()
            .all(|(w, _)| *w != Weather::Snowy));
        assert!(Season::Winter
            .weather_weights()
            .iter()
            .any(|(w, _)| *w == Weather::Snowy));
    }

    #[test]
    fn test_weather_parse_and_serde() {
        assert_eq!("stormy".parse::<Weather>().unwrap(), Weather::Stormy);
        assert_eq!(
            serde_json::to_string(&Weather::Foggy).unwrap(),
            r#""foggy""#
        );
        assert_eq!(Weather::Rainy.mood_bonus(), -1);
    }
}
