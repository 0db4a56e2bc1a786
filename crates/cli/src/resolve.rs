// Resolve user-typed references (positions, id prefixes) to engine ids

use tagcalc_engine::{FormulaArchive, SavedFormulaId, TokenId, TokenSequence};

/// Characters of an id shown in listings
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &impl ToString) -> String {
    let mut s = id.to_string();
    s.truncate(SHORT_ID_LEN);
    s
}

/// A token by position (`3`) or by id / unique id prefix
pub fn token(seq: &TokenSequence, arg: &str) -> Option<TokenId> {
    let arg = arg.trim();
    if let Ok(index) = arg.parse::<usize>() {
        return seq.tokens().get(index).map(|t| t.id());
    }
    unique_prefix(seq.tokens().iter().map(|t| t.id()), arg)
}

/// A saved formula by id or unique id prefix
pub fn saved(archive: &FormulaArchive, arg: &str) -> Option<SavedFormulaId> {
    unique_prefix(archive.list().iter().map(|f| f.id), arg.trim())
}

fn unique_prefix<T: ToString + Copy>(ids: impl Iterator<Item = T>, prefix: &str) -> Option<T> {
    if prefix.is_empty() {
        return None;
    }
    let prefix = prefix.to_lowercase();
    let mut matches = ids.filter(|id| id.to_string().starts_with(&prefix));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}
