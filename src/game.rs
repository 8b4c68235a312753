use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, warn};

use crate::controller::BotController;
use crate::error::BotError;
use crate::infra::{Move, ReplayFile, TurnDecoder, encode_move};

/// Lockstep turn loop: one input line in, one move line out.
pub struct Game {
    controller: BotController,
    decoder: TurnDecoder,
    replay_file: Option<ReplayFile>,
}

impl Game {
    pub fn new(controller: BotController, decoder: TurnDecoder, replay_file: Option<ReplayFile>) -> Self {
        Self {
            controller,
            decoder,
            replay_file,
        }
    }

    pub fn controller(&self) -> &BotController {
        &self.controller
    }

    /// Plays until the input closes. A line that cannot be decoded, including
    /// one that is not valid UTF-8, is answered with `WAIT` so the game keeps going.
    pub async fn run<R, W>(&mut self, mut input: R, mut output: W) -> Result<(), BotError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }

            let (mv, line) = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => (self.play_turn(line), line.to_string()),
                Err(err) => {
                    error!("Turn aborted: input is not valid UTF-8: {}", err);
                    self.controller.abort_turn();
                    (Move::Stay, String::from_utf8_lossy(&buf).into_owned())
                }
            };
            output.write_all(encode_move(mv).as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;

            if let Some(replay_file) = &mut self.replay_file
                && let Err(err) = replay_file.append(&line, mv)
            {
                warn!("Replay file disabled: {}", err);
                self.replay_file = None;
            }
        }

        self.controller.finish();
        Ok(())
    }

    pub fn play_turn(&mut self, line: &str) -> Move {
        match self.decoder.decode(line) {
            Ok(state) => self.controller.decide(&state),
            Err(err) => {
                error!("Turn aborted: {}", err);
                self.controller.abort_turn();
                Move::Stay
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::infra::DefaultObserver;
    use crate::planners::StrategyRegistry;

    fn game(config: &BotConfig) -> Game {
        let controller =
            BotController::new(config, &StrategyRegistry::builtin(), DefaultObserver).unwrap();
        Game::new(controller, TurnDecoder::new(config.arena), None)
    }

    #[tokio::test]
    async fn test_run_answers_every_turn() {
        let input = concat!(
            r#"{"config": {"width": 5, "height": 5}, "tick": 1, "bot": [0, 0], "floor": [[0, 0], [1, 0], [0, 1]], "visible_gems": [{"position": [4, 4], "ttl": 50}]}"#,
            "\n",
            "\n",
            r#"{"tick": 2, "bot": [0, 1], "visible_gems": [{"position": [4, 4], "ttl": 49}]}"#,
            "\n",
        );
        let config = BotConfig {
            strategy: "greedy".to_string(),
            ..BotConfig::default()
        };
        let mut game = game(&config);
        let mut output = Vec::new();
        game.run(input.as_bytes(), &mut output).await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "S\nS\n");
        assert_eq!(game.controller().turns(), 2);
    }

    #[tokio::test]
    async fn test_bad_lines_answered_with_wait() {
        let input = concat!(
            "garbage\n",
            r#"{"tick": 1, "bot": [0, 0]}"#,
            "\n",
            r#"{"config": {"width": 3, "height": 1}, "tick": 2, "bot": [0, 0], "visible_gems": [{"position": [2, 0]}]}"#,
            "\n",
        );
        let mut game = game(&BotConfig::default());
        let mut output = Vec::new();
        game.run(input.as_bytes(), &mut output).await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "WAIT\nWAIT\nE\n");
        assert_eq!(game.controller().turns(), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_answered_with_wait() {
        let mut input = Vec::new();
        input.extend_from_slice(
            br#"{"config": {"width": 3, "height": 1}, "tick": 1, "bot": [0, 0], "visible_gems": [{"position": [2, 0]}]}"#,
        );
        input.extend_from_slice(b"\n\xff\xfe\n");
        input.extend_from_slice(br#"{"tick": 2, "bot": [0, 0], "visible_gems": [{"position": [2, 0]}]}"#);
        input.extend_from_slice(b"\r\n");

        let mut game = game(&BotConfig::default());
        let mut output = Vec::new();
        game.run(input.as_slice(), &mut output).await.unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "E\nWAIT\nE\n");
        assert_eq!(game.controller().turns(), 2);
    }

    #[tokio::test]
    async fn test_replay_file_records_turns() {
        let dir = std::env::temp_dir().join(format!("gembot-game-replay-{}", std::process::id()));
        let replay = ReplayFile::create(dir.join("game.replay")).unwrap();
        let path = replay.path().to_path_buf();
        let config = BotConfig::default();
        let controller =
            BotController::new(&config, &StrategyRegistry::builtin(), DefaultObserver).unwrap();
        let mut game = Game::new(controller, TurnDecoder::new(None), Some(replay));

        let line = r#"{"config": {"width": 2, "height": 1}, "bot": [0, 0], "visible_gems": [{"position": [1, 0]}]}"#;
        let mut output = Vec::new();
        game.run(format!("{}\n", line).as_bytes(), &mut output).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, format!("> {}\n< E\n", line));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
