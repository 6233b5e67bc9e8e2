use std::{env, str::FromStr};

use tracing::warn;

use crate::model::{BoardConfig, PRESETS, Preset};

pub const DIFFICULTY_VAR: &str = "MINESWEEPER_DIFFICULTY";
pub const ROWS_VAR: &str = "MINESWEEPER_ROWS";
pub const COLS_VAR: &str = "MINESWEEPER_COLS";
pub const MINES_VAR: &str = "MINESWEEPER_MINES";
pub const SEED_VAR: &str = "MINESWEEPER_SEED";

/// Settings for the `minesweeper` driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub board: BoardConfig,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: PRESETS[0].config,
            seed: None,
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<T> {
    let raw = lookup(var)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", var, raw);
            None
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds settings from any variable source, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let preset = match lookup(DIFFICULTY_VAR) {
            Some(name) => Preset::find(&name).unwrap_or_else(|err| {
                warn!("{}, using {}", err, PRESETS[0].name);
                &PRESETS[0]
            }),
            None => &PRESETS[0],
        };

        let custom = match (
            parse(&lookup, ROWS_VAR),
            parse(&lookup, COLS_VAR),
            parse(&lookup, MINES_VAR),
        ) {
            (Some(rows), Some(cols), Some(mines)) => {
                let config = BoardConfig::new(rows, cols, mines);
                match config.validate() {
                    Ok(_) => Some(config),
                    Err(err) => {
                        warn!("{}, using {}", err, preset.name);
                        None
                    }
                }
            }
            _ => None,
        };

        Self {
            board: custom.unwrap_or(preset.config),
            seed: parse(&lookup, SEED_VAR),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_to_beginner() {
        assert_eq!(settings(&[]), Settings::default());
        assert_eq!(settings(&[]).board, BoardConfig::BEGINNER);
    }

    #[test]
    fn reads_preset_and_seed() {
        let settings = settings(&[(DIFFICULTY_VAR, "Advanced"), (SEED_VAR, "1234")]);
        assert_eq!(settings.board, BoardConfig::ADVANCED);
        assert_eq!(settings.seed, Some(1234));
    }

    #[test]
    fn custom_dimensions_override_preset() {
        let settings = settings(&[
            (DIFFICULTY_VAR, "intermediate"),
            (ROWS_VAR, "5"),
            (COLS_VAR, "8"),
            (MINES_VAR, "6"),
        ]);
        assert_eq!(settings.board, BoardConfig::new(5, 8, 6));
    }

    #[test]
    fn bad_values_fall_back() {
        let fallback = settings(&[
            (DIFFICULTY_VAR, "impossible"),
            (ROWS_VAR, "3"),
            (COLS_VAR, "3"),
            (MINES_VAR, "9"),
            (SEED_VAR, "soon"),
        ]);
        assert_eq!(fallback.board, BoardConfig::BEGINNER);
        assert_eq!(fallback.seed, None);

        let partial = settings(&[(DIFFICULTY_VAR, "advanced"), (ROWS_VAR, "4")]);
        assert_eq!(partial.board, BoardConfig::ADVANCED);
    }
}
