// Newtonian interactive console
// Typed commands drive the same pipeline as speech; the mount animates between prompts.

use crate::app::Telescope;
use anyhow::Result;
use newtonian_mount::{AnimationDriver, ApplyOutcome, LogSink, OrientationSink};
use std::collections::VecDeque;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

const MAX_HISTORY: usize = 100;

/// What the console does after a line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    Continue,
    Exit,
    Output(String),
}

pub struct InteractiveConsole {
    telescope: Telescope,
    sink: Box<dyn OrientationSink>,
    history: VecDeque<String>,
}

impl InteractiveConsole {
    pub fn new(telescope: Telescope) -> Self {
        Self {
            telescope,
            sink: Box::new(LogSink),
            history: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    pub fn into_telescope(self) -> Telescope {
        self.telescope
    }

    /// Read lines until `quit` or end of input, ticking the mount in between
    pub async fn run(&mut self) -> Result<()> {
        println!("Newtonian telescope console. Type 'help' for commands.");
        prompt()?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = self.telescope.driver().ticker();

        loop {
            let animating = self.telescope.controller().is_animating();
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match self.handle_line(&line).await? {
                        ConsoleAction::Exit => break,
                        ConsoleAction::Output(text) => println!("{}", text),
                        ConsoleAction::Continue => {}
                    }
                    prompt()?;
                }
                _ = ticker.tick(), if animating => {
                    AnimationDriver::step(self.telescope.controller_mut(), self.sink.as_ref());
                }
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<ConsoleAction> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(ConsoleAction::Continue);
        }
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(line.to_string());

        match line.to_lowercase().as_str() {
            "quit" | "exit" => Ok(ConsoleAction::Exit),
            "help" => Ok(ConsoleAction::Output(help_text())),
            "where" => Ok(ConsoleAction::Output(self.where_text())),
            "axes" => {
                let show = !self.telescope.controller().show_axes();
                self.telescope.controller_mut().set_show_axes(show);
                Ok(ConsoleAction::Output(format!(
                    "Axes {}",
                    if show { "shown" } else { "hidden" }
                )))
            }
            "history" => Ok(ConsoleAction::Output(
                self.history.iter().cloned().collect::<Vec<_>>().join("\n"),
            )),
            _ => {
                let Some((command, outcome)) = self.telescope.handle_text(line).await? else {
                    return Ok(ConsoleAction::Output("Mount is still moving".to_string()));
                };
                Ok(ConsoleAction::Output(match outcome {
                    ApplyOutcome::Started(target) => format!(
                        "{} -> Az {:.2}°, El {:.2}°",
                        command.label().unwrap_or("manual"),
                        target.azimuth,
                        target.elevation
                    ),
                    ApplyOutcome::Rejected => "Mount is still moving".to_string(),
                    ApplyOutcome::Ignored => format!("Not understood ({})", command.kind()),
                }))
            }
        }
    }

    fn where_text(&self) -> String {
        let controller = self.telescope.controller();
        let current = controller.current();
        let (az, el) = current.to_degrees_minutes();
        let mut text = format!(
            "Az {:.2}° ({}), El {:.2}° ({})",
            current.azimuth, az, current.elevation, el
        );
        if controller.is_animating() {
            let target = controller.animator().target();
            text.push_str(&format!(
                ", moving to Az {:.2}°, El {:.2}°",
                target.azimuth, target.elevation
            ));
        }
        text
    }
}

fn prompt() -> io::Result<()> {
    print!("telescope> ");
    io::stdout().flush()
}

fn help_text() -> String {
    [
        "Commands:",
        "  <text>    point the telescope, e.g. 'show me mars' or 'azimuth 90 elevation 30'",
        "  where     current orientation",
        "  axes      toggle reference axes",
        "  history   lines entered so far",
        "  help      this text",
        "  quit      leave the console",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use newtonian_spk::VoiceBackend;

    fn console() -> InteractiveConsole {
        let mut settings = Settings::default();
        settings.speech.engine = VoiceBackend::Log;
        settings.telescope.ai.api_key = None;
        InteractiveConsole::new(Telescope::new(settings).unwrap())
    }

    #[tokio::test]
    async fn test_builtin_commands() {
        let mut console = console();
        assert_eq!(console.handle_line("  ").await.unwrap(), ConsoleAction::Continue);
        assert_eq!(console.handle_line("QUIT").await.unwrap(), ConsoleAction::Exit);
        assert_eq!(
            console.handle_line("axes").await.unwrap(),
            ConsoleAction::Output("Axes hidden".to_string())
        );
        assert!(matches!(
            console.handle_line("help").await.unwrap(),
            ConsoleAction::Output(text) if text.contains("where")
        ));
    }

    #[tokio::test]
    async fn test_text_starts_animation() {
        let mut console = console();
        let action = console.handle_line("go to the zenith").await.unwrap();
        assert_eq!(
            action,
            ConsoleAction::Output("the zenith -> Az 0.00°, El 90.00°".to_string())
        );
        assert!(console.telescope.controller().is_animating());

        let action = console.handle_line("azimuth 90").await.unwrap();
        assert_eq!(action, ConsoleAction::Output("Mount is still moving".to_string()));

        let telescope = console.into_telescope();
        telescope.shutdown().await;
    }

    #[tokio::test]
    async fn test_unmatched_text_without_ai() {
        let mut console = console();
        let action = console.handle_line("make me a sandwich").await.unwrap();
        assert_eq!(action, ConsoleAction::Output("Not understood (unresolved)".to_string()));
        assert!(!console.telescope.controller().is_animating());
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let mut console = console();
        for i in 0..MAX_HISTORY + 5 {
            console.handle_line(&format!("where {}", i)).await.unwrap();
        }
        assert_eq!(console.history.len(), MAX_HISTORY);
        assert_eq!(console.history.front().map(String::as_str), Some("where 5"));
    }
}
