use std::io::{self, BufRead, Write};

use minesweeper_engine::{
    Session,
    config::Settings,
    model::{client::ClientMessage, server::ServerMessage},
};
use tracing::{debug, info, warn};

fn send(out: &mut impl Write, message: &ServerMessage) -> io::Result<()> {
    serde_json::to_writer(&mut *out, message)?;
    out.write_all(b"\n")?;
    out.flush()
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let settings = Settings::from_env();
    info!(
        "Starting minesweeper session: {}x{} with {} mines",
        settings.board.rows, settings.board.cols, settings.board.mines
    );

    let mut session = Session::new(settings.board, settings.seed)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    send(&mut out, &session.init_message())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ClientMessage>(&line) {
            Ok(message) => {
                if let Some(reply) = session.handle(message) {
                    send(&mut out, &reply)?;
                } else {
                    debug!("Action produced no change");
                }
            }
            Err(err) => {
                warn!("Malformed command {:?}: {}", line, err);
                send(
                    &mut out,
                    &ServerMessage::Error {
                        message: err.to_string(),
                    },
                )?;
            }
        }
    }

    info!("Input closed, ending session");
    Ok(())
}
