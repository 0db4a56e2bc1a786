// Line-oriented formula editor
//
// One command per line; edits print the formula with `|` at the cursor.
// The session is handed back to the caller on exit for persisting.

use std::io::{self, BufRead, Write};

use tagcalc_engine::formula::functions;
use tagcalc_engine::suggest::{Suggestion, SuggestionKind};
use tagcalc_engine::{Catalog, FormulaSession, SuggestionTracker, TokenKind};

use crate::resolve;

const HELP: &str = "\
Commands:
  tag <name>        insert a variable tag at the cursor
  type <text>       type characters at the cursor
  back              delete backward
  del <token>       delete a token (position or id prefix)
  left | right      move the cursor
  select <token>    select a tag (or `select none`)
  clear             clear the formula and result
  eval              evaluate the formula
  save <name>       save the formula
  load <id>         load a saved formula (id prefix)
  saved             list saved formulas
  suggest <query>   look up suggestions (empty query clears)
  pick <n>          insert suggestion n from the last lookup
  show              print tokens, cursor, selection and result
  quit              save changes and exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub struct Repl {
    session: FormulaSession,
    catalog: Catalog,
    tracker: SuggestionTracker,
    limit: usize,
    evaluate_on_load: bool,
}

impl Repl {
    pub fn new(session: FormulaSession, limit: usize, evaluate_on_load: bool) -> Self {
        Self {
            session,
            catalog: Catalog::new(),
            tracker: SuggestionTracker::new(),
            limit,
            evaluate_on_load,
        }
    }

    pub fn into_session(self) -> FormulaSession {
        self.session
    }

    /// Read commands until `quit` or end of input
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write, prompt: bool) -> io::Result<()> {
        if prompt {
            writeln!(out, "tagcalc editor - `help` lists commands")?;
        }
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            if self.execute(&line?, out)? == Outcome::Quit {
                break;
            }
        }
        Ok(())
    }

    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<Outcome> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (cmd, arg) = match line.trim_start().split_once(' ') {
            Some((cmd, arg)) => (cmd, arg),
            None => (line.trim(), ""),
        };

        match cmd {
            "" => return Ok(Outcome::Continue),
            "quit" | "exit" => return Ok(Outcome::Quit),
            "help" => writeln!(out, "{}", HELP)?,

            "tag" => {
                let name = arg.trim();
                if name.is_empty() {
                    writeln!(out, "usage: tag <name>")?;
                    return Ok(Outcome::Continue);
                }
                if !self.session.registry().contains(name) {
                    writeln!(out, "note: '{}' is not a known variable", name)?;
                }
                self.session.insert_tag(name);
                self.print_formula(out)?;
            }
            "type" => {
                for ch in arg.chars() {
                    self.session.insert_char(ch);
                }
                self.print_formula(out)?;
            }
            "back" => {
                self.session.delete_backward();
                self.print_formula(out)?;
            }
            "del" => match resolve::token(self.session.sequence(), arg) {
                Some(id) => {
                    self.session.delete_token(id);
                    self.print_formula(out)?;
                }
                None => writeln!(out, "no token '{}'", arg.trim())?,
            },
            "left" => {
                self.session.move_backward();
                self.print_formula(out)?;
            }
            "right" => {
                self.session.move_forward();
                self.print_formula(out)?;
            }
            "select" => {
                if arg.trim() == "none" {
                    self.session.select_tag(None);
                    writeln!(out, "selection cleared")?;
                } else {
                    let selected = resolve::token(self.session.sequence(), arg)
                        .is_some_and(|id| self.session.select_tag(Some(id)));
                    if selected {
                        self.print_selection(out)?;
                    } else {
                        writeln!(out, "no tag '{}'", arg.trim())?;
                    }
                }
            }
            "clear" => {
                self.session.clear();
                self.print_formula(out)?;
            }
            "eval" => {
                let result = self.session.evaluate();
                writeln!(out, "= {}", result)?;
            }
            "save" => match self.session.save(arg) {
                Some(id) => writeln!(
                    out,
                    "saved {} ({}) = {}",
                    arg.trim(),
                    resolve::short_id(&id),
                    self.session.result().unwrap_or("")
                )?,
                None => writeln!(out, "a name is required")?,
            },
            "load" => match resolve::saved(self.session.archive(), arg) {
                Some(id) => {
                    self.session.load(id);
                    if self.evaluate_on_load {
                        self.session.evaluate();
                    }
                    self.print_formula(out)?;
                    writeln!(out, "= {}", self.session.result().unwrap_or(""))?;
                }
                None => writeln!(out, "no saved formula '{}'", arg.trim())?,
            },
            "saved" => {
                if self.session.archive().is_empty() {
                    writeln!(out, "no saved formulas")?;
                }
                for f in self.session.archive().list() {
                    writeln!(
                        out,
                        "{}  {}  = {}",
                        resolve::short_id(&f.id),
                        f.name,
                        f.result.as_deref().unwrap_or("-")
                    )?;
                }
            }
            "suggest" => self.suggest(arg.trim(), out)?,
            "pick" => self.pick(arg.trim(), out)?,
            "show" => self.show(out)?,
            other => writeln!(out, "unknown command '{}' (try `help`)", other)?,
        }
        Ok(Outcome::Continue)
    }

    fn suggest(&mut self, query: &str, out: &mut impl Write) -> io::Result<()> {
        let Some(ticket) = self.tracker.begin(query) else {
            writeln!(out, "suggestions cleared")?;
            return Ok(());
        };
        let results = self.catalog.match_query(query, self.limit);
        self.tracker.complete(ticket, results);

        if self.tracker.suggestions().is_empty() {
            writeln!(out, "no suggestions for '{}'", query)?;
        }
        for (i, s) in self.tracker.suggestions().iter().enumerate() {
            writeln!(out, "{:>2}. {:<9} {} {}", i + 1, s.kind.name(), s.style.icon, s.display)?;
        }
        Ok(())
    }

    /// Insert a suggestion: variables become tags, functions are typed with
    /// an opening parenthesis, operators are typed.
    fn pick(&mut self, arg: &str, out: &mut impl Write) -> io::Result<()> {
        let picked: Option<Suggestion> = arg
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.tracker.suggestions().get(i).cloned());
        let Some(suggestion) = picked else {
            writeln!(out, "no suggestion '{}'", arg)?;
            return Ok(());
        };

        match suggestion.kind {
            SuggestionKind::Variable => self.session.insert_tag(suggestion.value),
            SuggestionKind::Function => {
                if !functions::is_known_function(suggestion.value) {
                    writeln!(out, "note: {} cannot be evaluated yet", suggestion.value)?;
                }
                self.session.insert_text(suggestion.value);
                self.session.insert_char('(');
            }
            SuggestionKind::Operator => self.session.insert_text(suggestion.value),
        }
        self.tracker.begin("");
        self.print_formula(out)
    }

    fn show(&self, out: &mut impl Write) -> io::Result<()> {
        let seq = self.session.sequence();
        self.print_formula(out)?;
        for token in seq.tokens() {
            let kind = match token.kind() {
                TokenKind::Tag => "tag",
                TokenKind::Text => "text",
            };
            let marker = if seq.selected_tag() == Some(token.id()) { "*" } else { " " };
            writeln!(
                out,
                "{}{:>3}  {:<4}  {:<8}  {:?}",
                marker,
                token.position(),
                kind,
                resolve::short_id(&token.id()),
                token.value()
            )?;
        }
        writeln!(out, "cursor: {}", seq.cursor())?;
        writeln!(out, "result: {}", self.session.result().unwrap_or("-"))?;
        Ok(())
    }

    fn print_formula(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.session.sequence().render())
    }

    fn print_selection(&self, out: &mut impl Write) -> io::Result<()> {
        let seq = self.session.sequence();
        if let Some(token) = seq.selected_tag().and_then(|id| seq.get(id)) {
            let style = self.catalog.style_for(token.value());
            writeln!(out, "selected [{}] {} {}", token.value(), style.icon, style.color)?;
        }
        Ok(())
    }
}
