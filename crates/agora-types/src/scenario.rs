//! Scenario catalog and scenario modes.
//!
//! A scenario key selects two things: the persona set used to seed a new
//! room, and the [`ScenarioMode`] that decides which prompt template family
//! and generation budget every turn in the room uses.

use serde::{Deserialize, Serialize};

/// Scenario used when a room is created without one.
pub const DEFAULT_SCENARIO: &str = "freeplay";

/// Scenario keys that switch a room into short/adversarial mode.
pub const SHORT_MODE_SCENARIOS: &[&str] = &["argument_short"];

/// Closed set of prompt template families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMode {
    /// Longer, in-character prose.
    Default,
    /// Terse single-sentence retorts anchored on a topic.
    Short,
}

impl ScenarioMode {
    /// Resolve the mode for a scenario key. Unknown keys use the default family.
    pub fn for_scenario(key: &str) -> Self {
        if SHORT_MODE_SCENARIOS.contains(&key) {
            ScenarioMode::Short
        } else {
            ScenarioMode::Default
        }
    }
}

impl std::fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioMode::Default => write!(f, "default"),
            ScenarioMode::Short => write!(f, "short"),
        }
    }
}

/// A persona definition used to seed a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaDefinition {
    pub name: &'static str,
    pub role: &'static str,
    pub goal: &'static str,
}

/// A catalog entry: description plus ordered persona list.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioDefinition {
    pub key: &'static str,
    pub description: &'static str,
    pub agents: &'static [PersonaDefinition],
}

impl ScenarioDefinition {
    pub fn mode(&self) -> ScenarioMode {
        ScenarioMode::for_scenario(self.key)
    }
}

const SCENARIOS: &[ScenarioDefinition] = &[
    ScenarioDefinition {
        key: "freeplay",
        description: "Open room with no preset personas. Add your own agents.",
        agents: &[],
    },
    ScenarioDefinition {
        key: "debate",
        description: "Two agents debate a topic, and one aims to persuade the other.",
        agents: &[
            PersonaDefinition {
                name: "Alex",
                role: "Pro side",
                goal: "Argue in favor of the topic.",
            },
            PersonaDefinition {
                name: "Blake",
                role: "Con side",
                goal: "Argue against the topic.",
            },
        ],
    },
    ScenarioDefinition {
        key: "startup_planning",
        description: "A startup team discusses features for an MVP product.",
        agents: &[
            PersonaDefinition {
                name: "Ava",
                role: "CEO",
                goal: "Define the vision and priorities.",
            },
            PersonaDefinition {
                name: "Ben",
                role: "Engineer",
                goal: "Simplify scope and estimate effort.",
            },
            PersonaDefinition {
                name: "Mia",
                role: "PM",
                goal: "Align business goals and technical constraints.",
            },
        ],
    },
    ScenarioDefinition {
        key: "story_writing",
        description: "Writers collaborate to create a short story idea.",
        agents: &[
            PersonaDefinition {
                name: "Luna",
                role: "Author",
                goal: "Generate creative story ideas.",
            },
            PersonaDefinition {
                name: "Eli",
                role: "Editor",
                goal: "Improve clarity and coherence.",
            },
        ],
    },
    ScenarioDefinition {
        key: "argument_short",
        description: "Two people in a heated argument. Very short, blunt replies.",
        agents: &[
            PersonaDefinition {
                name: "Riley",
                role: "Arguer A",
                goal: "Win the argument with blunt, snappy points.",
            },
            PersonaDefinition {
                name: "Jordan",
                role: "Arguer B",
                goal: "Shut down A's points with sharp rebuttals.",
            },
        ],
    },
];

/// All built-in scenarios, in catalog order.
pub fn builtin_scenarios() -> &'static [ScenarioDefinition] {
    SCENARIOS
}

/// Look up a scenario by key.
pub fn find_scenario(key: &str) -> Option<&'static ScenarioDefinition> {
    SCENARIOS.iter().find(|s| s.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_mode_keys() {
        assert_eq!(ScenarioMode::for_scenario("argument_short"), ScenarioMode::Short);
        assert_eq!(ScenarioMode::for_scenario("debate"), ScenarioMode::Default);
        assert_eq!(ScenarioMode::for_scenario("no-such-scenario"), ScenarioMode::Default);
    }

    #[test]
    fn test_every_short_key_is_in_catalog() {
        for key in SHORT_MODE_SCENARIOS {
            assert!(find_scenario(key).is_some(), "missing catalog entry for {key}");
        }
    }

    #[test]
    fn test_debate_persona_order() {
        let debate = find_scenario("debate").unwrap();
        let names: Vec<&str> = debate.agents.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Alex", "Blake"]);
    }

    #[test]
    fn test_default_scenario_has_no_personas() {
        let freeplay = find_scenario(DEFAULT_SCENARIO).unwrap();
        assert!(freeplay.agents.is_empty());
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&ScenarioMode::Short).unwrap();
        assert_eq!(json, "\"short\"");
    }
}
