//! Session command - work through a folder interactively.
//!
//! Reads one command per line. Selecting an invoice previews it; the
//! workflow commands act on the selection.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use image::ImageFormat;
use tracing::{debug, warn};

use invdesk_core::preview::{renderer_for, PageRenderer, PreviewPane};
use invdesk_core::WorkflowError;

use super::common::{build_controller, column_index, load_config, render_table, DeskController};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Working folder with PDF invoices
    #[arg(required = true)]
    folder: PathBuf,
}

const HELP: &str = "\
Commands:
  list                  show the invoices
  search [text]         filter by the leading columns (empty clears)
  sort <column>         sort by column name or index, again to reverse
  select <row|file>     select a visible row and preview it
  register | f8         type the selected invoice into the other window
  error | f3            move the selected invoice to the error folder
  missing | f4          move the selected invoice to the work order folder
  upload | f5           upload the selected invoice
  refresh               re-read the folder
  preview               render the selected invoice again
  resize <width>        change the preview width
  help                  show this text
  quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Search(String),
    Sort(String),
    Select(String),
    Register,
    MarkError,
    MarkMissing,
    Upload,
    Refresh,
    Preview,
    Resize(u32),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let need_arg = |name: &str| {
            if rest.is_empty() {
                Err(format!("{} needs an argument", name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "search" | "/" => Ok(Command::Search(rest.to_string())),
            "sort" => need_arg("sort").map(Command::Sort),
            "select" | "s" => need_arg("select").map(Command::Select),
            "register" | "f8" => Ok(Command::Register),
            "error" | "f3" => Ok(Command::MarkError),
            "missing" | "f4" => Ok(Command::MarkMissing),
            "upload" | "f5" => Ok(Command::Upload),
            "refresh" => Ok(Command::Refresh),
            "preview" => Ok(Command::Preview),
            "resize" => need_arg("resize")?
                .parse()
                .map(Command::Resize)
                .map_err(|_| format!("not a width: {}", rest)),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

pub fn run(args: SessionArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let controller = build_controller(&config)?;
    let pane = PreviewPane::new(
        renderer_for(&config.preview.renderer)?,
        config.preview.width,
        Duration::from_millis(config.preview.resize_delay_ms),
    );

    let mut session = Session::new(controller, pane, config.preview.output.clone());
    let count = session.controller.open_folder(&args.folder)?;
    println!(
        "{} Opened {} with {} invoices. Type 'help' for commands.",
        style("✓").green(),
        args.folder.display(),
        count
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())
}

struct Session<R> {
    controller: DeskController,
    pane: PreviewPane<R>,
    output: Option<PathBuf>,
}

impl<R: PageRenderer> Session<R> {
    fn new(controller: DeskController, pane: PreviewPane<R>, output: Option<PathBuf>) -> Self {
        Self {
            controller,
            pane,
            output,
        }
    }

    fn run<I: BufRead, W: Write>(&mut self, input: I, mut out: W) -> anyhow::Result<()> {
        write!(out, "{}", render_table(self.controller.invoices()))?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            // pending resizes are due by the time the next line arrives
            if self.pane.poll(Instant::now()).unwrap_or(false) {
                self.save_preview(&mut out)?;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command, &mut out)?,
                Err(message) => writeln!(out, "{} {}", style("?").yellow(), message)?,
            }
            out.flush()?;
        }

        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<()> {
        debug!("Session command: {:?}", command);
        let key = self.controller.invoices().selected_key().map(str::to_string);

        let result: Result<(), WorkflowError> = match command {
            Command::List => Ok(()),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(());
            }
            Command::Search(query) => {
                self.controller.invoices_mut().search(&query);
                Ok(())
            }
            Command::Sort(column) => {
                match column_index(&column) {
                    Ok(index) => {
                        let direction = self.controller.invoices_mut().sort_by_column(index);
                        writeln!(out, "Sorted {:?}", direction)?;
                    }
                    Err(e) => writeln!(out, "{} {}", style("?").yellow(), e)?,
                }
                Ok(())
            }
            Command::Select(target) => {
                self.select(&target, out)?;
                return Ok(());
            }
            Command::Refresh => self.controller.refresh().map(|count| {
                debug!("Reloaded {} invoices", count);
            }),
            Command::Preview => {
                self.show_preview(out)?;
                return Ok(());
            }
            Command::Resize(width) => {
                self.pane.resize(width, Instant::now());
                writeln!(out, "Preview width {}", width)?;
                return Ok(());
            }
            Command::Register | Command::MarkError | Command::MarkMissing | Command::Upload => {
                let Some(key) = key else {
                    writeln!(out, "{} nothing selected", style("?").yellow())?;
                    return Ok(());
                };
                match command {
                    Command::Register => self.controller.register(&key),
                    Command::MarkError => self.controller.mark_error(&key),
                    Command::MarkMissing => self.controller.mark_missing(&key),
                    _ => self.controller.upload(&key),
                }
            }
            Command::Quit => return Ok(()),
        };

        if let Err(e) = result {
            writeln!(out, "{} {}", style("✗").red(), e)?;
        }
        write!(out, "{}", render_table(self.controller.invoices()))?;
        Ok(())
    }

    fn select<W: Write>(&mut self, target: &str, out: &mut W) -> anyhow::Result<()> {
        let list = self.controller.invoices_mut();
        let found = match target.parse::<usize>() {
            Ok(position) => list.select_position(position).is_some(),
            Err(_) => list.select(target),
        };
        if !found {
            writeln!(out, "{} no such invoice: {}", style("?").yellow(), target)?;
            return Ok(());
        }

        write!(out, "{}", render_table(self.controller.invoices()))?;
        self.show_preview(out)
    }

    fn show_preview<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let Some(link) = self.controller.invoices().selected().map(|i| i.link.clone()) else {
            return Ok(());
        };

        match self.pane.display(&link) {
            Ok(true) => self.save_preview(out),
            Ok(false) => Ok(()),
            Err(e) => {
                warn!("Preview of {} failed: {}", link.display(), e);
                writeln!(out, "{} no preview: {}", style("!").yellow(), e)?;
                Ok(())
            }
        }
    }

    fn save_preview<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let Some(image) = self.pane.image() else {
            return Ok(());
        };
        match &self.output {
            Some(path) => {
                image.save_with_format(path, ImageFormat::Png)?;
                writeln!(
                    out,
                    "Preview {}x{} written to {}",
                    image.width(),
                    image.height(),
                    path.display()
                )?;
            }
            None => writeln!(out, "Preview {}x{}", image.width(), image.height())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invdesk_core::models::config::InvdeskConfig;
    use invdesk_core::preview::EmbeddedImageRenderer;
    use invdesk_core::Status;
    use std::fs;
    use std::path::Path;

    fn session(dir: &Path) -> Session<EmbeddedImageRenderer> {
        console::set_colors_enabled(false);
        let config = InvdeskConfig::default();
        let mut controller = build_controller(&config).unwrap();
        controller.open_folder(dir).unwrap();
        let pane = PreviewPane::new(EmbeddedImageRenderer::new(), 400, Duration::from_millis(5));
        Session::new(controller, pane, None)
    }

    fn run(session: &mut Session<EmbeddedImageRenderer>, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("ls".parse::<Command>(), Ok(Command::List));
        assert_eq!("F8".parse::<Command>(), Ok(Command::Register));
        assert_eq!(
            "search  Acme corp ".parse::<Command>(),
            Ok(Command::Search("Acme corp".to_string()))
        );
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("resize 640".parse::<Command>(), Ok(Command::Resize(640)));
        assert!("resize wide".parse::<Command>().is_err());
        assert!("sort".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_select_and_mark() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"not really").unwrap();
        fs::write(dir.path().join("b.pdf"), b"not really").unwrap();

        let mut session = session(dir.path());
        let output = run(&mut session, "select 1\nf3\nquit\nselect 0\n");

        assert!(output.contains(">  1 b.pdf"), "{}", output);
        assert!(output.contains("no preview"), "{}", output);
        assert!(dir.path().join("err").join("b.pdf").exists());
        assert!(dir.path().join("a.pdf").exists());
        assert_eq!(
            session.controller.invoices().get("b.pdf").unwrap().status,
            Status::Error
        );
        assert_eq!(session.pane.current(), Some(dir.path().join("b.pdf").as_path()));
    }

    #[test]
    fn test_actions_need_selection() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"x").unwrap();

        let mut session = session(dir.path());
        let output = run(&mut session, "upload\nregister\nbogus\n");

        assert_eq!(output.matches("nothing selected").count(), 2);
        assert!(output.contains("unknown command: bogus"));
        assert!(dir.path().join("a.pdf").exists());
    }

    #[test]
    fn test_search_and_sort() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["alpha.pdf", "beta.pdf", "gamma.pdf"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let mut session = session(dir.path());
        let output = run(&mut session, "sort file\nsort file\nsearch ta\n");

        assert!(output.contains("Sorted Ascending"));
        assert!(output.contains("Sorted Descending"));
        let last_table = output.rsplit("File").next().unwrap();
        assert!(last_table.contains("beta.pdf"));
        assert!(!last_table.contains("alpha.pdf"));
        assert!(!last_table.contains("gamma.pdf"));
    }
}
