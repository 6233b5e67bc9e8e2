use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, instrument, warn};

use crate::{
    error::Result,
    logic::Board,
    model::{
        BoardConfig, PRESETS, Preset,
        client::ClientMessage,
        server::ServerMessage,
    },
};

/// One play session: the current board, how it was chosen and the generator
/// that seeds every new board.
#[derive(Debug)]
pub struct Session {
    board: Board,
    preset: Option<&'static Preset>,
    rng: StdRng,
}

fn matching_preset(config: BoardConfig) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.config == config)
}

impl Session {
    /// With a `seed` every board of the session is reproducible.
    pub fn new(config: BoardConfig, seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let board = Board::generate(config, &mut rng)?;
        Ok(Self {
            board,
            preset: matching_preset(config),
            rng,
        })
    }

    pub fn from_preset(name: &str, seed: Option<u64>) -> Result<Self> {
        let preset = Preset::find(name)?;
        Self::new(preset.config, seed)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn preset(&self) -> Option<&'static Preset> {
        self.preset
    }

    pub fn init_message(&self) -> ServerMessage {
        ServerMessage::Init {
            rows: self.board.rows(),
            cols: self.board.cols(),
            mines: self.board.mine_count(),
            difficulty: self.preset.map(|preset| preset.name.to_string()),
            field: self.board.views(),
        }
    }

    /// Applies one client action. Ignored actions produce no message.
    #[instrument(level = "trace", skip(self))]
    pub fn handle(&mut self, message: ClientMessage) -> Option<ServerMessage> {
        match message {
            ClientMessage::Reveal { pos } => {
                let outcome = self.board.reveal(pos);
                (!outcome.is_noop()).then(|| ServerMessage::Update {
                    updates: outcome.updates,
                    status: outcome.status,
                    mines_remaining: self.board.mines_remaining(),
                })
            }
            ClientMessage::Flag { pos } => {
                let outcome = self.board.toggle_flag(pos);
                outcome.cell.map(|cell| ServerMessage::Update {
                    updates: vec![cell],
                    status: self.board.status(),
                    mines_remaining: self.board.mines_remaining(),
                })
            }
            ClientMessage::Restart { params } => {
                let config = params.unwrap_or_else(|| self.board.config());
                Some(self.restart(config))
            }
            ClientMessage::Difficulty { name } => Some(match Preset::find(&name) {
                Ok(preset) => self.restart(preset.config),
                Err(err) => {
                    warn!("Rejected difficulty change: {}", err);
                    ServerMessage::Error {
                        message: err.to_string(),
                    }
                }
            }),
            ClientMessage::NextDifficulty => {
                let next = self.preset.map_or(&PRESETS[0], |preset| preset.next());
                Some(self.restart(next.config))
            }
        }
    }

    fn restart(&mut self, config: BoardConfig) -> ServerMessage {
        info!(
            "Restarting game: {}x{} with {} mines",
            config.rows, config.cols, config.mines
        );
        match self.board.reset_with_rng(config, &mut self.rng) {
            Ok(()) => {
                self.preset = matching_preset(config);
                self.init_message()
            }
            Err(err) => {
                warn!("Rejected restart: {}", err);
                ServerMessage::Error {
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellView, GameStatus, Pos, Tile};

    #[test]
    fn new_session_tracks_preset() {
        let session = Session::new(BoardConfig::INTERMEDIATE, Some(1)).unwrap();
        assert_eq!(session.preset().map(|preset| preset.name), Some("intermediate"));

        let custom = Session::new(BoardConfig::new(5, 5, 3), Some(1)).unwrap();
        assert!(custom.preset().is_none());
    }

    #[test]
    fn init_message_lists_hidden_field() {
        let session = Session::from_preset("beginner", Some(9)).unwrap();
        let ServerMessage::Init {
            rows,
            cols,
            mines,
            difficulty,
            field,
        } = session.init_message()
        else {
            panic!("expected init message");
        };
        assert_eq!((rows, cols, mines), (9, 9, 10));
        assert_eq!(difficulty.as_deref(), Some("beginner"));
        assert_eq!(field.len(), 9);
        assert!(field.iter().flatten().all(|tile| *tile == Tile::Hidden));
    }

    #[test]
    fn flag_reports_mines_remaining() {
        let mut session = Session::from_preset("beginner", Some(9)).unwrap();
        let message = session.handle(ClientMessage::Flag { pos: Pos::new(0, 0) });
        assert_eq!(
            message,
            Some(ServerMessage::Update {
                updates: vec![CellView {
                    pos: Pos::new(0, 0),
                    tile: Tile::Flagged,
                }],
                status: GameStatus::InProgress,
                mines_remaining: 9,
            })
        );
        assert_eq!(session.handle(ClientMessage::Reveal { pos: Pos::new(0, 0) }), None);
        assert_eq!(session.handle(ClientMessage::Flag { pos: Pos::new(20, 0) }), None);
    }

    #[test]
    fn next_difficulty_cycles() {
        let mut session = Session::from_preset("advanced", Some(2)).unwrap();
        let message = session.handle(ClientMessage::NextDifficulty);
        assert!(matches!(
            message,
            Some(ServerMessage::Init { rows: 9, cols: 9, mines: 10, .. })
        ));
        assert_eq!(session.preset().map(|preset| preset.name), Some("beginner"));

        session.handle(ClientMessage::NextDifficulty);
        assert_eq!(session.board().config(), BoardConfig::INTERMEDIATE);
    }

    #[test]
    fn next_difficulty_from_custom_starts_over() {
        let mut session = Session::new(BoardConfig::new(4, 4, 2), Some(2)).unwrap();
        session.handle(ClientMessage::NextDifficulty);
        assert_eq!(session.board().config(), BoardConfig::BEGINNER);
    }

    #[test]
    fn invalid_restart_keeps_board() {
        let mut session = Session::from_preset("beginner", Some(4)).unwrap();
        session.handle(ClientMessage::Flag { pos: Pos::new(1, 1) });

        let message = session.handle(ClientMessage::Restart {
            params: Some(BoardConfig::new(2, 2, 4)),
        });
        assert!(matches!(message, Some(ServerMessage::Error { .. })));
        assert_eq!(session.board().flag_count(), 1);
        assert_eq!(session.board().config(), BoardConfig::BEGINNER);

        let message = session.handle(ClientMessage::Difficulty {
            name: "nightmare".to_string(),
        });
        assert_eq!(
            message,
            Some(ServerMessage::Error {
                message: "unknown difficulty preset: nightmare".to_string()
            })
        );
    }

    #[test]
    fn restart_without_params_keeps_dimensions() {
        let mut session = Session::new(BoardConfig::new(6, 7, 5), Some(8)).unwrap();
        session.handle(ClientMessage::Flag { pos: Pos::new(0, 0) });
        let message = session.handle(ClientMessage::Restart { params: None });
        assert!(matches!(
            message,
            Some(ServerMessage::Init { rows: 6, cols: 7, mines: 5, difficulty: None, .. })
        ));
        assert_eq!(session.board().flag_count(), 0);
    }
}
