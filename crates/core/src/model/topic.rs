use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("unknown topic: {0}")]
    Unknown(String),
}

/// Fixed set of driving-knowledge topics a question can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    Signs,
    TrafficSignals,
    PavementMarkings,
    RightOfWay,
    SpeedAndDistance,
    Parking,
    SafeDriving,
    SpecialSituations,
}

impl Topic {
    /// Every topic, in corpus order.
    pub const ALL: [Topic; 8] = [
        Topic::Signs,
        Topic::TrafficSignals,
        Topic::PavementMarkings,
        Topic::RightOfWay,
        Topic::SpeedAndDistance,
        Topic::Parking,
        Topic::SafeDriving,
        Topic::SpecialSituations,
    ];

    /// Tag used in question records (`RIGHT_OF_WAY`).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Topic::Signs => "SIGNS",
            Topic::TrafficSignals => "TRAFFIC_SIGNALS",
            Topic::PavementMarkings => "PAVEMENT_MARKINGS",
            Topic::RightOfWay => "RIGHT_OF_WAY",
            Topic::SpeedAndDistance => "SPEED_AND_DISTANCE",
            Topic::Parking => "PARKING",
            Topic::SafeDriving => "SAFE_DRIVING",
            Topic::SpecialSituations => "SPECIAL_SITUATIONS",
        }
    }

    /// Three-letter code embedded in question ids (`TX-ROW-0001`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Topic::Signs => "SIG",
            Topic::TrafficSignals => "TRA",
            Topic::PavementMarkings => "PAV",
            Topic::RightOfWay => "ROW",
            Topic::SpeedAndDistance => "SPD",
            Topic::Parking => "PRK",
            Topic::SafeDriving => "SAF",
            Topic::SpecialSituations => "SPC",
        }
    }

    /// File stem of the topic's source file (`right_of_way`).
    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            Topic::Signs => "signs",
            Topic::TrafficSignals => "traffic_signals",
            Topic::PavementMarkings => "pavement_markings",
            Topic::RightOfWay => "right_of_way",
            Topic::SpeedAndDistance => "speed_and_distance",
            Topic::Parking => "parking",
            Topic::SafeDriving => "safe_driving",
            Topic::SpecialSituations => "special_situations",
        }
    }

    /// Human-readable name (`Right Of Way`).
    #[must_use]
    pub fn display_name(self) -> String {
        self.tag()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Topic {
    type Err = TopicError;

    /// Accepts the tag in any case, with `-` or spaces in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Topic::ALL
            .into_iter()
            .find(|topic| topic.tag() == normalized)
            .ok_or_else(|| TopicError::Unknown(s.to_owned()))
    }
}
