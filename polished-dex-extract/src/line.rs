//! Line classification.
//!
//! Every variant stream is classified once into [`Line`] events. A line is
//! blank, a full-line comment, a label (`Name:` optionally followed by a
//! directive on the same line) or a directive (`macro arg, arg ; comment`).
//! Quoted strings are opaque: commas and semicolons inside them never split.

/// One classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment(&'a str),
    Label {
        name: &'a str,
        /// Anything after the colon (`rawchar "Stench"` in
        /// `Stench: rawchar "Stench"`).
        rest: &'a str,
    },
    Directive(Directive<'a>),
}

impl<'a> Line<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        if let Some(comment) = line.strip_prefix(';') {
            return Self::Comment(comment.trim());
        }
        if let Some((name, rest)) = split_label(line) {
            return Self::Label { name, rest };
        }
        Self::Directive(Directive::parse(line))
    }

    pub fn directive(&self) -> Option<&Directive<'a>> {
        match self {
            Self::Directive(d) => Some(d),
            _ => None,
        }
    }

    /// The directive if it is named `name`.
    pub fn directive_named(&self, name: &str) -> Option<&Directive<'a>> {
        self.directive().filter(|d| d.name == name)
    }

    pub fn is_directive(&self, name: &str) -> bool {
        self.directive_named(name).is_some()
    }

    pub fn label(&self) -> Option<&'a str> {
        match self {
            Self::Label { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn comment(&self) -> Option<&'a str> {
        match self {
            Self::Comment(c) => Some(c),
            Self::Directive(d) => d.comment,
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    /// Directive carried by this line, including one that follows a label.
    pub fn inline_directive(&self) -> Option<Directive<'a>> {
        match self {
            Self::Directive(d) => Some(*d),
            Self::Label { rest, .. } if !rest.is_empty() => Some(Directive::parse(rest)),
            _ => None,
        }
    }
}

/// Classify every line of a variant stream.
pub fn classify_all(lines: &[String]) -> Vec<Line<'_>> {
    lines.iter().map(|l| Line::classify(l)).collect()
}

/// A macro invocation or assembler directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub name: &'a str,
    /// Argument text after the name, comment removed.
    pub body: &'a str,
    pub comment: Option<&'a str>,
}

impl<'a> Directive<'a> {
    pub fn parse(line: &'a str) -> Self {
        let (code, comment) = split_comment(line.trim());
        let (name, body) = match code.find(char::is_whitespace) {
            Some(i) => (&code[..i], code[i..].trim()),
            None => (code, ""),
        };
        Self { name, body, comment }
    }

    /// Comma-separated arguments, trimmed.
    pub fn args(&self) -> Vec<&'a str> {
        if self.body.is_empty() {
            return Vec::new();
        }
        split_outside_quotes(self.body, ',').map(str::trim).collect()
    }

    pub fn arg(&self, n: usize) -> Option<&'a str> {
        self.args().get(n).copied()
    }

    /// Contents of the first quoted string.
    pub fn quoted(&self) -> Option<&'a str> {
        let start = self.body.find('"')? + 1;
        let len = self.body[start..].find('"')?;
        Some(&self.body[start..start + len])
    }

    /// A quoted text fragment (`text "..."`, `next "..."`, `db "..."`).
    pub fn text_fragment(&self) -> Option<TextFragment<'a>> {
        if !matches!(self.name, "text" | "next" | "line" | "cont" | "para" | "db") {
            return None;
        }
        let quoted = self.quoted()?;
        Some(TextFragment {
            body: quoted.trim_end_matches('@').trim_end(),
            terminated: self.body.contains('@'),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFragment<'a> {
    pub body: &'a str,
    /// The fragment ends its text block.
    pub terminated: bool,
}

fn split_label(line: &str) -> Option<(&str, &str)> {
    let end = line.find(':')?;
    let name = &line[..end];
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    {
        return None;
    }
    let rest = line[end..].trim_start_matches(':').trim();
    Some((name, rest))
}

fn split_comment(s: &str) -> (&str, Option<&str>) {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return (s[..i].trim_end(), Some(s[i + 1..].trim())),
            _ => {}
        }
    }
    (s, None)
}

fn split_outside_quotes(s: &str, sep: char) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_basic_shapes() {
        assert_eq!(Line::classify("   "), Line::Blank);
        assert_eq!(Line::classify("; Bulbasaur"), Line::Comment("Bulbasaur"));
        assert_eq!(
            Line::classify("BulbasaurEggSpeciesMoves:"),
            Line::Label {
                name: "BulbasaurEggSpeciesMoves",
                rest: ""
            }
        );
        let line = Line::classify("learnset 7, LEECH_SEED ; tm");
        let d = line.directive_named("learnset").unwrap();
        assert_eq!(d.args(), vec!["7", "LEECH_SEED"]);
        assert_eq!(d.comment, Some("tm"));
    }

    #[test]
    fn label_with_inline_directive() {
        let line = Line::classify("Stench: rawchar \"Stench\"");
        assert_eq!(line.label(), Some("Stench"));
        let d = line.inline_directive().unwrap();
        assert_eq!(d.name, "rawchar");
        assert_eq!(d.quoted(), Some("Stench"));
    }

    #[test]
    fn quoted_commas_do_not_split() {
        let d = Directive::parse("def_trainer 1, \"Lt.Surge, Jr\" ; note");
        assert_eq!(d.args(), vec!["1", "\"Lt.Surge, Jr\""]);
        assert_eq!(d.comment, Some("note"));
    }

    #[test]
    fn text_fragment_terminator() {
        let d = Directive::parse("next \"sleep.@\"");
        let frag = d.text_fragment().unwrap();
        assert_eq!(frag.body, "sleep.");
        assert!(frag.terminated);

        let open = Directive::parse("text \"Puts the foe to\"");
        assert!(!open.text_fragment().unwrap().terminated);
        assert!(Directive::parse("done").text_fragment().is_none());
    }

    #[test]
    fn quoted_text_is_not_a_label() {
        assert!(Line::classify("text \"Note: hi\"").label().is_none());
    }
}
