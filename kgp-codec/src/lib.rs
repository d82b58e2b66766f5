//! Line framing, the argument tokeniser, the command grammar, and
//! outbound command serialisation (§4.2 of the protocol).
//!
//! Grounded on the reference Python implementation's hand-rolled
//! regexes in `connect()` (`kgp.py`): a leading `id[@ref]` segment, a
//! command word, and a greedy-but-ordered argument tokeniser. We parse
//! by hand rather than pulling in a regex engine, matching this
//! workspace's preference for small hand-written parsers over pattern
//! libraries for bespoke wire formats.

use kgp_board::Board;
use std::fmt;

/// A single parsed (or to-be-serialised) command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Board(Board),
    /// A bare, unquoted word — used only when *constructing* outbound
    /// commands whose wire form the protocol writes unquoted (`mode
    /// freeplay`, the `info:name` key in `set info:name "..."`). The
    /// tokeniser never produces this variant: inbound args are always
    /// one of the other four kinds (§4.2).
    Raw(String),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Board(b) => write!(f, "{}", b),
            Value::Raw(w) => write!(f, "{}", w),
        }
    }
}

/// A parsed protocol frame: optional id, optional ref, a command word,
/// and an ordered argument list (§3 Command).
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub id: Option<u64>,
    pub reference: Option<u64>,
    pub name: String,
    pub args: Vec<Value>,
}

impl Command {
    /// Build an outbound command. `id` is always present on the wire for
    /// messages this client sends; `reference` is omitted when `None` or
    /// `Some(0)` (§9 open question 3 — `ref == 0` is treated as absent,
    /// preserved from the source even though live refs never reach 0).
    pub fn outbound(id: u64, reference: Option<u64>, name: impl Into<String>, args: Vec<Value>) -> Self {
        Command {
            id: Some(id),
            reference,
            name: name.into(),
            args,
        }
    }

    /// Parse one inbound line per the command grammar (§4.2). Returns
    /// `None` if the line doesn't match — the caller drops it and
    /// continues, per §7's "malformed line" policy.
    pub fn parse(line: &str) -> Option<Command> {
        let s = skip_ws(line);

        let mut id = None;
        let mut reference = None;
        let mut rest = s;

        if let Some((num, after_id)) = take_digits(s) {
            let mut after = after_id;
            let mut refv = None;
            if let Some(after_at) = after.strip_prefix('@') {
                if let Some((rnum, after_ref)) = take_digits(after_at) {
                    refv = Some(rnum);
                    after = after_ref;
                }
                // '@' present but not followed by digits: the whole
                // id-segment fails to match at this position, same as
                // the source regex backtracking past the optional group.
            }
            if let Some(after_ws) = take_required_ws(after) {
                id = Some(num);
                reference = refv;
                rest = after_ws;
            }
        }

        let (name, after_name) = take_word(rest)?;
        if name.is_empty() {
            return None;
        }

        let args_text = match take_required_ws(after_name) {
            Some(after_ws) => after_ws.trim_end(),
            None => "",
        };

        Some(Command {
            id,
            reference,
            name: name.to_string(),
            args: tokenize_args(args_text),
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = self.id {
            write!(f, "{}", id)?;
            if let Some(r) = self.reference {
                if r != 0 {
                    write!(f, "@{}", r)?;
                }
            }
            write!(f, " ")?;
        }
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn skip_ws(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace())
}

fn take_required_ws(s: &str) -> Option<&str> {
    let trimmed = skip_ws(s);
    if trimmed.len() == s.len() { None } else { Some(trimmed) }
}

fn take_digits(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    s[..end].parse::<u64>().ok().map(|n| (n, &s[end..]))
}

fn take_word(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

/// Consume `args` greedily, trying each token kind in priority order
/// (string, integer, float, board) and stopping at the first position
/// where none match — any residual suffix is silently dropped (§4.2).
///
/// Note the documented quirk this preserves: a digit-leading token
/// always matches the integer pattern first, so a dotted numeral like
/// `3.14` tokenises as `Int(3)` and strands `.14`, which matches
/// nothing and ends tokenisation there. This is not a bug we're
/// introducing — it's what the priority order in the spec describes.
fn tokenize_args(args: &str) -> Vec<Value> {
    let mut out = Vec::new();
    let mut rest = args;
    loop {
        if rest.is_empty() {
            break;
        }
        if let Some((v, next)) = take_string(rest) {
            out.push(Value::Str(v));
            rest = next;
            continue;
        }
        if let Some((v, next)) = take_integer(rest) {
            out.push(Value::Int(v));
            rest = next;
            continue;
        }
        if let Some((v, next)) = take_float(rest) {
            out.push(Value::Float(v));
            rest = next;
            continue;
        }
        if let Some((v, next)) = take_board(rest) {
            out.push(Value::Board(v));
            rest = next;
            continue;
        }
        break;
    }
    out
}

fn take_string(s: &str) -> Option<(String, &str)> {
    let mut chars = s.char_indices();
    let (_, first) = chars.next()?;
    if first != '"' {
        return None;
    }
    let mut out = String::new();
    let mut iter = s[1..].char_indices();
    while let Some((i, c)) = iter.next() {
        if c == '\\' {
            // any char after backslash is the literal char
            if let Some((_, esc)) = iter.next() {
                out.push(esc);
            } else {
                return None;
            }
        } else if c == '"' {
            let consumed = 1 + i + 1;
            return Some((out, skip_ws(&s[consumed..])));
        } else {
            out.push(c);
        }
    }
    None
}

fn take_integer(s: &str) -> Option<(i64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let v = s[..end].parse::<i64>().ok()?;
    Some((v, skip_ws(&s[end..])))
}

fn take_float(s: &str) -> Option<(f64, &str)> {
    let int_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if int_end == 0 {
        return None;
    }
    let mut end = int_end;
    if s[end..].starts_with('.') {
        let frac_start = end + 1;
        let frac_end = s[frac_start..]
            .find(|c: char| !c.is_ascii_digit())
            .map(|i| frac_start + i)
            .unwrap_or(s.len());
        if frac_end > frac_start {
            end = frac_end;
        }
    }
    let v = s[..end].parse::<f64>().ok()?;
    Some((v, skip_ws(&s[end..])))
}

fn take_board(s: &str) -> Option<(Board, &str)> {
    if !s.starts_with('<') {
        return None;
    }
    let close = s.find('>')?;
    let literal = &s[..=close];
    let board = Board::parse(literal)?;
    Some((board, skip_ws(&s[close + 1..])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_handshake() {
        let c = Command::parse("kgp 1 0 0").unwrap();
        assert_eq!(c.id, None);
        assert_eq!(c.name, "kgp");
        assert_eq!(c.args, vec![Value::Int(1), Value::Int(0), Value::Int(0)]);
    }

    #[test]
    fn parses_state_with_id_and_board() {
        let c = Command::parse("7 state <3,4,5,1,2,3,6,7,8>").unwrap();
        assert_eq!(c.id, Some(7));
        assert_eq!(c.reference, None);
        assert_eq!(c.name, "state");
        match &c.args[0] {
            Value::Board(b) => assert_eq!(b.to_string(), "<3,4,5,1,2,3,6,7,8>"),
            other => panic!("expected board, got {:?}", other),
        }
    }

    #[test]
    fn parses_stop_with_reference() {
        let c = Command::parse("11@7 stop").unwrap();
        assert_eq!(c.id, Some(11));
        assert_eq!(c.reference, Some(7));
        assert_eq!(c.name, "stop");
        assert!(c.args.is_empty());
    }

    #[test]
    fn parses_ping_with_quoted_arg() {
        let c = Command::parse("3 ping \"hello\"").unwrap();
        assert_eq!(c.name, "ping");
        assert_eq!(c.args, vec![Value::Str("hello".into())]);
    }

    #[test]
    fn unescapes_quoted_strings() {
        let c = Command::parse("1 set \"a\\\"b\\\\c\"").unwrap();
        assert_eq!(c.args, vec![Value::Str("a\"b\\c".into())]);
    }

    #[test]
    fn malformed_line_returns_none() {
        assert!(Command::parse("   ").is_none());
        assert!(Command::parse("@5 stop").is_none());
    }

    #[test]
    fn integer_wins_over_float_and_strands_fraction() {
        let c = Command::parse("1 set 3.14").unwrap();
        assert_eq!(c.args, vec![Value::Int(3)]);
    }

    #[test]
    fn unmatched_suffix_is_dropped() {
        let c = Command::parse("1 cmd 5 ]]] 6").unwrap();
        assert_eq!(c.args, vec![Value::Int(5)]);
    }

    #[test]
    fn serialises_outbound_with_ref() {
        let c = Command::outbound(5, Some(7), "move", vec![Value::Int(3)]);
        assert_eq!(c.to_string(), "5@7 move 3");
    }

    #[test]
    fn serialises_outbound_without_ref() {
        let c = Command::outbound(1, None, "set", vec![Value::Str("info:name".into())]);
        assert_eq!(c.to_string(), "1 set \"info:name\"");
    }

    #[test]
    fn ref_zero_is_omitted() {
        let c = Command::outbound(1, Some(0), "mode", vec!["freeplay".into()]);
        assert_eq!(c.to_string(), "1 mode \"freeplay\"");
    }

    #[test]
    fn raw_values_serialise_unquoted() {
        let c = Command::outbound(1, None, "mode", vec![Value::Raw("freeplay".into())]);
        assert_eq!(c.to_string(), "1 mode freeplay");
    }

    #[test]
    fn escapes_embedded_quotes_on_serialise() {
        let c = Command::outbound(1, None, "set", vec![Value::Str("a\"b".into())]);
        assert_eq!(c.to_string(), "1 set \"a\\\"b\"");
    }
}
