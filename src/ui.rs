// UI layer: provides a simple interactive menu. On a terminal the prompts
// use `dialoguer`; when stdin is piped the same menu reads plain lines, so
// scripted input works and end of input ends the session.

use crate::book::{parse_read_status, parse_year, Book};
use crate::catalog::{Library, SearchField, Statistics};
use anyhow::{Context, Result};
use console::Term;
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, ErrorKind, IsTerminal, Write};
use std::time::Duration;

const BANNER: &str = "
Welcome to your Personal Library Manager!
1. Add a book
2. Remove a book
3. Search for a book
4. Display all books
5. Display statistics
6. Exit
";

const FAREWELL: &str = "Library saved to file. Goodbye!";

/// Source of user answers. `Ok(None)` means input has ended.
pub trait Prompt {
    fn text(&mut self, prompt: &str) -> Result<Option<String>>;
    fn choose(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>>;
}

/// Keyboard-driven prompts on the controlling terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn text(&mut self, prompt: &str) -> Result<Option<String>> {
        ended_on_disconnect(
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text(),
        )
    }

    fn choose(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>> {
        // `Select` shows a keyboard-navigable list in the terminal.
        ended_on_disconnect(
            Select::new()
                .with_prompt(prompt)
                .items(items)
                .default(0)
                .interact(),
        )
    }
}

/// dialoguer reports a vanished terminal as an I/O error.
fn ended_on_disconnect<T>(res: io::Result<T>) -> Result<Option<T>> {
    match res {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.kind(), ErrorKind::NotConnected | ErrorKind::UnexpectedEof) => {
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to read from terminal"),
    }
}

/// Line-at-a-time prompts over any reader, echoing prompts to `echo`.
pub struct LinePrompt<R, E> {
    reader: R,
    echo: E,
}

impl<R: BufRead, E: Write> LinePrompt<R, E> {
    pub fn new(reader: R, echo: E) -> Self {
        LinePrompt { reader, echo }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).context("Failed to read input")? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead, E: Write> Prompt for LinePrompt<R, E> {
    fn text(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.echo, "{}: ", prompt)?;
        self.echo.flush()?;
        self.read_line()
    }

    /// Accepts the 1-based item number or the item name.
    fn choose(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>> {
        writeln!(self.echo, "{}:", prompt)?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.echo, "{}. {}", i + 1, item)?;
        }
        loop {
            let Some(answer) = self.text("Enter your choice")? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=items.len()).contains(&n) {
                    return Ok(Some(n - 1));
                }
            }
            if let Some(i) = items.iter().position(|item| item.eq_ignore_ascii_case(answer)) {
                return Ok(Some(i));
            }
        }
    }
}

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Search,
    List,
    Stats,
    Exit,
}

impl MenuChoice {
    /// Accepts the menu number or the command word, ignoring case and
    /// surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "1" | "add" => Some(MenuChoice::Add),
            "2" | "remove" => Some(MenuChoice::Remove),
            "3" | "search" => Some(MenuChoice::Search),
            "4" | "list" => Some(MenuChoice::List),
            "5" | "stats" => Some(MenuChoice::Stats),
            "6" | "exit" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Whether a command leaves the menu running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    End,
}

/// Entry point used by the binary: dialoguer prompts when stdin and
/// stderr are both terminals, plain line reads otherwise.
pub fn main_menu(library: Library) -> Result<()> {
    if io::stdin().is_terminal() && Term::stderr().is_term() {
        Menu::new(library, TerminalPrompt, io::stdout())
            .with_progress(true)
            .run()?;
    } else {
        let prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
        Menu::new(library, prompt, io::stdout()).run()?;
    }
    Ok(())
}

/// The menu loop over an owned library, a prompt source and an output.
pub struct Menu<P, W> {
    library: Library,
    prompt: P,
    out: W,
    progress: bool,
}

impl<P: Prompt, W: Write> Menu<P, W> {
    pub fn new(library: Library, prompt: P, out: W) -> Self {
        Menu {
            library,
            prompt,
            out,
            progress: false,
        }
    }

    /// Show an indicatif spinner while the catalog is written.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Loop until "Exit" or end of input, then save once more. Returns
    /// the library as it was saved.
    ///
    /// A failed save on add/remove is reported and the loop continues; a
    /// failed final save is returned.
    pub fn run(mut self) -> Result<Library> {
        loop {
            writeln!(self.out, "{}", BANNER)?;
            let Some(choice) = self.prompt.text("Enter your choice")? else {
                break;
            };

            let flow = match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => self.add_book()?,
                Some(MenuChoice::Remove) => self.remove_book()?,
                Some(MenuChoice::Search) => self.search_books()?,
                Some(MenuChoice::List) => self.print_library()?,
                Some(MenuChoice::Stats) => self.print_statistics()?,
                Some(MenuChoice::Exit) => Flow::End,
                None => {
                    writeln!(self.out, "{}", "Invalid choice, please try again.".yellow())?;
                    Flow::Continue
                }
            };
            if flow == Flow::End {
                break;
            }
        }

        let spinner = self.spinner();
        let finished = finish(&self.library, &mut self.out);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        finished?;
        Ok(self.library)
    }

    /// Collect the fields of a new book and append it to the library.
    fn add_book(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt_title()? else {
            return Ok(Flow::End);
        };
        let Some(author) = self.prompt.text("Enter the author")? else {
            return Ok(Flow::End);
        };
        let Some(year) = self.prompt_year()? else {
            return Ok(Flow::End);
        };
        let Some(genre) = self.prompt.text("Enter the genre")? else {
            return Ok(Flow::End);
        };
        let Some(read_answer) = self.prompt.text("Have you read this book? (yes/no)")? else {
            return Ok(Flow::End);
        };

        let book = Book::new(title, author, year, genre, parse_read_status(&read_answer));

        let spinner = self.spinner();
        let saved = self.library.add(book);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        match saved {
            Ok(()) => writeln!(self.out, "{}", "Book added successfully!".green())?,
            Err(e) => self.report_save_failure(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn prompt_title(&mut self) -> Result<Option<String>> {
        loop {
            let Some(title) = self.prompt.text("Enter the book title")? else {
                return Ok(None);
            };
            if !title.trim().is_empty() {
                return Ok(Some(title));
            }
            writeln!(self.out, "{}", "Please enter a title.".red())?;
        }
    }

    /// Keep asking until the answer parses as a whole number.
    fn prompt_year(&mut self) -> Result<Option<i32>> {
        loop {
            let Some(raw) = self.prompt.text("Enter the publication year")? else {
                return Ok(None);
            };
            match parse_year(&raw) {
                Ok(year) => return Ok(Some(year)),
                Err(e) => writeln!(self.out, "{}", e.to_string().red())?,
            }
        }
    }

    fn remove_book(&mut self) -> Result<Flow> {
        let Some(title) = self.prompt.text("Enter the title of the book to remove")? else {
            return Ok(Flow::End);
        };

        if !self.library.contains_title(&title) {
            writeln!(self.out, "{}", "Book not found!".yellow())?;
            return Ok(Flow::Continue);
        }

        let spinner = self.spinner();
        let removed = self.library.remove(&title);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        match removed {
            Ok(true) => writeln!(self.out, "{}", "Book removed successfully!".green())?,
            Ok(false) => writeln!(self.out, "{}", "Book not found!".yellow())?,
            Err(e) => self.report_save_failure(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn search_books(&mut self) -> Result<Flow> {
        let labels: Vec<&str> = SearchField::ALL.iter().map(|f| f.label()).collect();
        let Some(index) = self.prompt.choose("Search by", &labels)? else {
            return Ok(Flow::End);
        };
        let Some(query) = self.prompt.text("Enter the search term")? else {
            return Ok(Flow::End);
        };

        let results = self.library.search(SearchField::ALL[index], &query);
        if results.is_empty() {
            writeln!(self.out, "No matching books found.")?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "Matching Books:")?;
        for line in numbered_lines(&results) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(Flow::Continue)
    }

    fn print_library(&mut self) -> Result<Flow> {
        if self.library.is_empty() {
            writeln!(self.out, "Your library is empty.")?;
            return Ok(Flow::Continue);
        }
        writeln!(self.out, "Your Library:")?;
        let books: Vec<&Book> = self.library.list().iter().collect();
        for line in numbered_lines(&books) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(Flow::Continue)
    }

    fn print_statistics(&mut self) -> Result<Flow> {
        match self.library.statistics() {
            Some(stats) => writeln!(self.out, "{}", format_statistics(&stats))?,
            None => writeln!(self.out, "Your library is empty.")?,
        }
        Ok(Flow::Continue)
    }

    fn report_save_failure(&mut self, err: &crate::LibraryError) -> Result<()> {
        writeln!(self.out, "{} {}", "Failed to save library:".red(), err)?;
        Ok(())
    }

    fn spinner(&self) -> Option<ProgressBar> {
        self.progress.then(saving_spinner)
    }
}

/// Final save at the end of a session, followed by the farewell message.
/// The error names the catalog path.
pub fn finish<W: Write>(library: &Library, out: &mut W) -> Result<()> {
    library.save().with_context(|| {
        format!(
            "Failed to save library to {}",
            library.store().path().display()
        )
    })?;
    writeln!(out, "{}", FAREWELL.green())?;
    Ok(())
}

/// `"{index}. {book}"` lines, numbered from 1.
pub fn numbered_lines(books: &[&Book]) -> Vec<String> {
    books
        .iter()
        .enumerate()
        .map(|(i, book)| format!("{}. {}", i + 1, book))
        .collect()
}

pub fn format_statistics(stats: &Statistics) -> String {
    format!(
        "Total books: {}\nPercentage read: {:.2}%",
        stats.total, stats.percent_read
    )
}

/// indicatif spinner shown while the catalog file is written.
fn saving_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Saving library...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CatalogStore;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn menu<'a>(
        path: &Path,
        script: &str,
        out: &'a mut Vec<u8>,
    ) -> Menu<LinePrompt<Cursor<Vec<u8>>, io::Sink>, &'a mut Vec<u8>> {
        let prompt = LinePrompt::new(Cursor::new(script.as_bytes().to_vec()), io::sink());
        Menu::new(Library::open(CatalogStore::new(path)), prompt, out)
    }

    #[test]
    fn menu_accepts_numbers_and_words() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Add));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("Search"), Some(MenuChoice::Search));
        assert_eq!(MenuChoice::parse("LIST"), Some(MenuChoice::List));
        assert_eq!(MenuChoice::parse("stats"), Some(MenuChoice::Stats));
        assert_eq!(MenuChoice::parse("remove"), Some(MenuChoice::Remove));
    }

    #[test]
    fn menu_rejects_anything_else() {
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("quit"), None);
    }

    #[test]
    fn numbered_lines_start_at_one() {
        let dune = Book::new("Dune", "Herbert", 1965, "SciFi", true);
        let emma = Book::new("Emma", "Austen", 1815, "Classic", false);
        let lines = numbered_lines(&[&dune, &emma]);
        assert_eq!(
            lines,
            vec![
                "1. Dune by Herbert (1965) - SciFi - Read".to_string(),
                "2. Emma by Austen (1815) - Classic - Unread".to_string(),
            ]
        );
    }

    #[test]
    fn statistics_use_two_decimals() {
        let stats = Statistics {
            total: 3,
            read: 1,
            percent_read: 100.0 / 3.0,
        };
        assert_eq!(
            format_statistics(&stats),
            "Total books: 3\nPercentage read: 33.33%"
        );
    }

    #[test]
    fn line_prompt_returns_none_at_end_of_input() {
        let mut prompt = LinePrompt::new(Cursor::new(b"first\r\n".to_vec()), io::sink());
        assert_eq!(prompt.text("q").unwrap(), Some("first".to_string()));
        assert_eq!(prompt.text("q").unwrap(), None);
        assert_eq!(prompt.choose("q", &["Title", "Author"]).unwrap(), None);
    }

    #[test]
    fn line_prompt_choose_by_number_or_name() {
        let mut prompt =
            LinePrompt::new(Cursor::new(b"9\nauthor\n1\n".to_vec()), io::sink());
        assert_eq!(prompt.choose("Search by", &["Title", "Author"]).unwrap(), Some(1));
        assert_eq!(prompt.choose("Search by", &["Title", "Author"]).unwrap(), Some(0));
    }

    #[test]
    fn bad_year_is_reported_then_reprompted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_data.json");
        let mut out = Vec::new();
        let mut menu = menu(&path, "Dune\nHerbert\nsoon\n1965\nSciFi\nyes\n", &mut out);

        assert_eq!(menu.add_book().unwrap(), Flow::Continue);
        assert_eq!(
            menu.library.list(),
            &[Book::new("Dune", "Herbert", 1965, "SciFi", true)][..]
        );
        drop(menu);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Invalid year 'soon'").count(), 1);
        assert!(text.contains("Book added successfully!"));
    }

    #[test]
    fn empty_author_is_allowed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_data.json");
        let mut out = Vec::new();
        let mut menu = menu(&path, "Anonymous Tales\n\n1700\n\nno\n", &mut out);

        menu.add_book().unwrap();
        assert_eq!(
            menu.library.list(),
            &[Book::new("Anonymous Tales", "", 1700, "", false)][..]
        );
    }

    #[test]
    fn add_reports_save_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("book_data.json");
        let mut out = Vec::new();
        let mut menu = menu(&path, "Dune\nHerbert\n1965\nSciFi\nyes\n", &mut out);

        assert_eq!(menu.add_book().unwrap(), Flow::Continue);
        assert_eq!(menu.library.len(), 1);
        drop(menu);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Failed to save library:"));
        assert!(!text.contains("Book added successfully!"));
    }

    #[test]
    fn remove_absent_title_reports_not_found_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_data.json");
        fs::write(
            &path,
            r#"[{"title":"Dune","author":"Herbert","year":1965,"genre":"SciFi","read":true}]"#,
        )
        .unwrap();
        let before = fs::read(&path).unwrap();
        let mut out = Vec::new();
        let mut menu = menu(&path, "Emma\n", &mut out);

        assert_eq!(menu.remove_book().unwrap(), Flow::Continue);
        assert_eq!(menu.library.len(), 1);
        drop(menu);

        assert_eq!(fs::read(&path).unwrap(), before);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Book not found!"));
    }

    #[test]
    fn remove_match_reports_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_data.json");
        CatalogStore::new(&path)
            .save(&[Book::new("Dune", "Herbert", 1965, "SciFi", true)])
            .unwrap();
        let mut out = Vec::new();
        let mut menu = menu(&path, "DUNE\n", &mut out);

        menu.remove_book().unwrap();
        assert!(menu.library.is_empty());
        drop(menu);

        assert!(CatalogStore::new(&path).load().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("Book removed successfully!"));
    }

    #[test]
    fn end_of_input_mid_command_ends_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_data.json");
        let mut out = Vec::new();
        let mut menu = menu(&path, "Dune\nHerbert\n", &mut out);

        assert_eq!(menu.add_book().unwrap(), Flow::End);
        assert!(menu.library.is_empty());
    }
}
