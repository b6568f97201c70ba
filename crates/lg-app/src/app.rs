use std::io::{BufRead, Write};

use anyhow::Result;
use lg_ascii::engine::BrightnessEngine;
use lg_core::charset::{CharSelection, CharSet};
use lg_core::config::AppConfig;
use lg_core::frame::PixelSource;
use lg_core::traits::{GlyphRasterizer, GridSink};
use lg_render::console::ConsoleSink;
use lg_render::html::HtmlSink;
use lg_source::padded::PaddedImage;

const PROMPT: &str = ">>> ";
const RESIZE_FACTOR: u32 = 2;

const ERR_ADD_FORMAT: &str = "Did not add due to incorrect format";
const ERR_REMOVE_FORMAT: &str = "Did not remove due to incorrect format";
const ERR_COMMAND: &str = "Did not executed due to incorrect command";
const ERR_RES_LIMIT: &str = "Did not change due to exceeding boundaries";
const MSG_NO_CHARS: &str = "All characters were removed!";

/// Direction of a `res` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resize {
    Up,
    Down,
}

/// A parsed shell command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    Chars,
    Add(CharSelection),
    Remove(CharSelection),
    Res(Resize),
    Console,
    Render,
}

/// Parse one input line.
///
/// Returns `Ok(None)` for a blank line, `Err(message)` for anything the
/// shell rejects.
pub fn parse_command(line: &str) -> Result<Option<Command>, &'static str> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (name, arg) = match words.as_slice() {
        [] => return Ok(None),
        [name] => (*name, None),
        [name, arg] => (*name, Some(*arg)),
        _ => return Err(ERR_COMMAND),
    };

    let command = match (name, arg) {
        ("exit", _) => Command::Exit,
        ("chars", None) => Command::Chars,
        ("add", arg) => Command::Add(arg.and_then(CharSelection::parse).ok_or(ERR_ADD_FORMAT)?),
        ("remove", arg) => {
            Command::Remove(arg.and_then(CharSelection::parse).ok_or(ERR_REMOVE_FORMAT)?)
        }
        ("res", Some("up")) => Command::Res(Resize::Up),
        ("res", Some("down")) => Command::Res(Resize::Down),
        ("console", _) => Command::Console,
        ("render", _) => Command::Render,
        _ => return Err(ERR_COMMAND),
    };
    Ok(Some(command))
}

/// Application state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppState {
    /// Lecture des commandes.
    Running,
    /// `exit` reçu ou fin de l'entrée.
    Quitting,
}

/// Interactive shell around one padded image and one brightness engine.
pub struct App<R> {
    /// Current application state.
    pub state: AppState,
    image: PaddedImage,
    engine: BrightnessEngine<R>,
    charset: CharSet,
    chars_in_row: u32,
    min_chars_in_row: u32,
    max_chars_in_row: u32,
    /// La prochaine commande `render` va au terminal, puis retour au HTML.
    console_next: bool,
    html: HtmlSink,
}

impl<R: GlyphRasterizer> App<R> {
    /// Build the shell. Resolution bounds come from the padded dimensions:
    /// at least `width / height` columns so tiles fit vertically, at most
    /// `width / min_pixels_per_char`. All bounds are powers of two so every
    /// reachable column count divides the image.
    pub fn new(image: PaddedImage, engine: BrightnessEngine<R>, config: &AppConfig) -> Self {
        let (width, height) = (image.width(), image.height());
        let min_chars_in_row = (width / height).max(1);
        let max_chars_in_row =
            floor_pow2(width / config.min_pixels_per_char.max(1)).max(min_chars_in_row);
        let chars_in_row =
            floor_pow2(config.chars_in_row).clamp(min_chars_in_row, max_chars_in_row);
        log::info!(
            "Résolution initiale : {chars_in_row} colonnes \
             (bornes {min_chars_in_row}..={max_chars_in_row})"
        );

        Self {
            state: AppState::Running,
            html: HtmlSink::new(&config.html_output, engine.font()),
            image,
            engine,
            charset: CharSet::from_chars(&config.charset),
            chars_in_row,
            min_chars_in_row,
            max_chars_in_row,
            console_next: false,
        }
    }

    #[must_use]
    pub fn chars_in_row(&self) -> u32 {
        self.chars_in_row
    }

    #[must_use]
    pub fn charset(&self) -> &CharSet {
        &self.charset
    }

    #[must_use]
    pub fn engine(&self) -> &BrightnessEngine<R> {
        &self.engine
    }

    /// Boucle principale : prompt, lecture, exécution, jusqu'à `exit` ou EOF.
    ///
    /// # Errors
    /// Returns an error only if reading input or writing to `out` fails.
    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> Result<()> {
        let mut line = String::new();
        while self.state == AppState::Running {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                self.state = AppState::Quitting;
                break;
            }
            match parse_command(&line) {
                Ok(Some(command)) => self.execute(command, &mut out)?,
                Ok(None) => {}
                Err(message) => writeln!(out, "{message}")?,
            }
        }
        Ok(())
    }

    /// Apply one command, writing user-facing messages to `out`.
    ///
    /// # Errors
    /// Returns an error only if writing to `out` fails.
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Exit => self.state = AppState::Quitting,
            Command::Chars => self.print_chars(out)?,
            Command::Add(selection) => self.charset.apply(selection, true),
            Command::Remove(selection) => self.charset.apply(selection, false),
            Command::Res(direction) => self.change_resolution(direction, out)?,
            Command::Console => self.console_next = true,
            Command::Render => self.render(out)?,
        }
        Ok(())
    }

    fn print_chars(&self, out: &mut impl Write) -> Result<()> {
        if self.charset.is_empty() {
            writeln!(out, "{MSG_NO_CHARS}")?;
        } else {
            let listed: Vec<String> = self.charset.iter().map(String::from).collect();
            writeln!(out, "{}", listed.join(" "))?;
        }
        Ok(())
    }

    fn change_resolution(&mut self, direction: Resize, out: &mut impl Write) -> Result<()> {
        let next = match direction {
            Resize::Up => self
                .chars_in_row
                .checked_mul(RESIZE_FACTOR)
                .filter(|&n| n <= self.max_chars_in_row),
            Resize::Down => Some(self.chars_in_row / RESIZE_FACTOR)
                .filter(|&n| n >= self.min_chars_in_row && n > 0),
        };
        match next {
            Some(n) => {
                self.chars_in_row = n;
                writeln!(out, "Width set to {n}")?;
            }
            None => writeln!(out, "{ERR_RES_LIMIT}")?,
        }
        Ok(())
    }

    fn render(&mut self, out: &mut impl Write) -> Result<()> {
        let grid = match self
            .engine
            .render(&self.image, self.chars_in_row, &self.charset)
        {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("Rendu impossible : {e}");
                writeln!(out, "Did not render: {e}")?;
                return Ok(());
            }
        };

        let (sink, written) = if std::mem::take(&mut self.console_next) {
            let mut console = ConsoleSink::new(&mut *out);
            (console.name(), console.output(&grid))
        } else {
            (self.html.name(), self.html.output(&grid))
        };
        if let Err(e) = written {
            log::warn!("Sortie {sink} impossible : {e}");
            writeln!(out, "Did not write {sink} output: {e}")?;
        }
        Ok(())
    }
}

/// Largest power of two ≤ `n` (0 for 0).
fn floor_pow2(n: u32) -> u32 {
    if n == 0 { 0 } else { 1 << (31 - n.leading_zeros()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_core::error::CoreError;
    use lg_core::frame::{GlyphBitmap, PixelBuffer};
    use std::cell::Cell;
    use std::path::Path;

    /// Inks `code point % side²` cells; counts calls.
    #[derive(Default)]
    struct Modulo {
        calls: Cell<usize>,
    }

    impl GlyphRasterizer for Modulo {
        fn rasterize(&self, ch: char, res: u32, _: &str) -> Result<GlyphBitmap, CoreError> {
            self.calls.set(self.calls.get() + 1);
            let mut bm = GlyphBitmap::blank(res);
            for i in 0..(ch as u32 % (res * res)) {
                bm.set(i / res, i % res, true);
            }
            Ok(bm)
        }
    }

    fn app(width: u32, height: u32, html: &Path) -> App<Modulo> {
        let src = PixelBuffer::filled(width, height, (0, 0, 0)).unwrap();
        let config = AppConfig {
            html_output: html.to_path_buf(),
            ..AppConfig::default()
        };
        let engine = BrightnessEngine::new(Modulo::default(), &config.font);
        App::new(PaddedImage::new(&src).unwrap(), engine, &config)
    }

    fn session(app: &mut App<Modulo>, input: &str) -> String {
        let mut out = Vec::new();
        app.run(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_add_and_remove_forms() {
        assert_eq!(
            parse_command("add a"),
            Ok(Some(Command::Add(CharSelection::Single('a'))))
        );
        assert_eq!(
            parse_command("remove  a-f\n"),
            Ok(Some(Command::Remove(CharSelection::Range('a', 'f'))))
        );
        assert_eq!(parse_command("add"), Err(ERR_ADD_FORMAT));
        assert_eq!(parse_command("add abc"), Err(ERR_ADD_FORMAT));
        assert_eq!(parse_command("remove xyz"), Err(ERR_REMOVE_FORMAT));
    }

    #[test]
    fn rejects_unknown_and_overlong_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("paint"), Err(ERR_COMMAND));
        assert_eq!(parse_command("add a b"), Err(ERR_COMMAND));
        assert_eq!(parse_command("chars now"), Err(ERR_COMMAND));
        assert_eq!(parse_command("res sideways"), Err(ERR_COMMAND));
        assert_eq!(parse_command("res"), Err(ERR_COMMAND));
        assert_eq!(parse_command("res up"), Ok(Some(Command::Res(Resize::Up))));
    }

    #[test]
    fn resolution_bounds_follow_padded_image() {
        let dir = tempfile::tempdir().unwrap();
        // 200×50 → 256×64: min 4 columns, max 128, initial 64.
        let mut a = app(200, 50, &dir.path().join("o.html"));
        assert_eq!(a.chars_in_row(), 64);

        let out = session(&mut a, "res up\nres up\nexit\n");
        assert!(out.contains("Width set to 128"));
        assert!(out.contains(ERR_RES_LIMIT));
        assert_eq!(a.chars_in_row(), 128);

        a.state = AppState::Running;
        let out = session(&mut a, &"res down\n".repeat(6));
        assert!(out.contains("Width set to 4"));
        assert!(out.ends_with(&format!("{ERR_RES_LIMIT}\n>>> \n")));
        assert_eq!(a.chars_in_row(), 4);
    }

    #[test]
    fn small_image_clamps_initial_resolution() {
        let dir = tempfile::tempdir().unwrap();
        // 3×3 → 4×4: max 4 / 2 = 2 columns.
        let a = app(3, 3, &dir.path().join("o.html"));
        assert_eq!(a.chars_in_row(), 2);
    }

    #[test]
    fn chars_lists_and_edits_the_active_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = app(8, 8, &dir.path().join("o.html"));
        let out = session(&mut a, "chars\nremove 0-9\nchars\nadd space\nadd z-x\nchars\nexit\n");
        assert!(out.contains("0 1 2 3 4 5 6 7 8 9\n"));
        assert!(out.contains(MSG_NO_CHARS));
        assert!(out.contains("  x y z\n"));
        assert_eq!(a.charset().len(), 4);
    }

    #[test]
    fn console_render_is_one_shot() {
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("o.html");
        let mut a = app(8, 8, &html);

        let out = session(&mut a, "console\nrender\nexit\n");
        // 8×8 image, initial columns clamped to 4: four rows of four.
        let art: Vec<&str> = out
            .lines()
            .map(|l| l.trim_start_matches(PROMPT))
            .filter(|l| l.chars().count() == 4)
            .collect();
        assert_eq!(art.len(), 4);
        assert!(!html.exists());

        a.state = AppState::Running;
        session(&mut a, "render\nexit\n");
        assert!(html.exists());
    }

    #[test]
    fn empty_charset_reports_and_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = app(8, 8, &dir.path().join("o.html"));
        let out = session(&mut a, "remove all\nrender\nchars\nexit\n");
        assert!(out.contains("Did not render: Character set is empty"));
        assert!(out.contains(MSG_NO_CHARS));
        assert!(a.engine().all_time().is_empty());
    }

    #[test]
    fn sink_failure_names_the_sink_and_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = app(8, 8, &dir.path().join("missing/o.html"));
        let out = session(&mut a, "render\nchars\nexit\n");
        assert!(out.contains("Did not write html output: "));
        assert!(out.contains("0 1 2 3 4 5 6 7 8 9\n"));
        assert_eq!(a.state, AppState::Quitting);
    }

    #[test]
    fn repeated_renders_hit_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = app(8, 8, &dir.path().join("o.html"));
        session(&mut a, "render\nrender\nremove 5\nrender\nadd 5\nrender\nexit\n");
        assert_eq!(a.engine().rasterizer().calls.get(), 10);
    }

    #[test]
    fn eof_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = app(8, 8, &dir.path().join("o.html"));
        session(&mut a, "chars\n");
        assert_eq!(a.state, AppState::Quitting);
    }

    #[test]
    fn floor_pow2_rounds_down() {
        assert_eq!(floor_pow2(0), 0);
        assert_eq!(floor_pow2(1), 1);
        assert_eq!(floor_pow2(21), 16);
        assert_eq!(floor_pow2(64), 64);
    }
}
