//! A pragmatic markup tokenizer.
//!
//! Converts a character stream into the token kinds of [`Token`]: tags
//! with attributes (double-quoted, single-quoted, and unquoted values),
//! comments, bogus comments, doctypes, character runs, and end-of-input.
//! Tokens are produced lazily, one per [`TokenSource::next_token`] call;
//! the sequence is finite and not restartable.
//!
//! The tokenizer is deliberately lenient: nothing in the input can make
//! it fail. Malformed constructs degrade to character data or to bogus
//! comments and are recorded as recoverable issues.
//!
//! # Not Yet Implemented
//!
//! - Character reference (entity) decoding
//! - RCDATA / RAWTEXT / script-data states (`<script>` content is
//!   tokenized like any other markup)
//! - CDATA sections (tokenized as bogus comments)

use wallaby_dom::Attributes;

use crate::dialect::Dialect;
use crate::errors::{IssueKind, ParseIssue};
use crate::token::Token;

/// The pull source the tree builder consumes tokens from.
///
/// The builder never reaches into a producer beyond these calls: it pulls
/// tokens one at a time, and it signals back when it has honored a
/// self-closing flag so the producer can report flags that were never
/// honored.
pub trait TokenSource {
    /// Produce the next token. After the input is exhausted this keeps
    /// returning [`Token::EndOfFile`].
    fn next_token(&mut self) -> Token;

    /// Acknowledge the self-closing flag of the most recent start tag.
    fn acknowledge_self_closing(&mut self);

    /// Current character offset into the input, for diagnostics.
    fn position(&self) -> usize;

    /// Take the recoverable issues observed since the last call.
    fn drain_issues(&mut self) -> Vec<ParseIssue> {
        Vec::new()
    }
}

/// The built-in tokenizer.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    dialect: Dialect,
    /// Set when a self-closing start tag is emitted; cleared by
    /// acknowledgment. Still set at the next pull means the flag was
    /// never honored.
    pending_self_closing: bool,
    issues: Vec<ParseIssue>,
}

impl Tokenizer {
    /// Create a tokenizer over `input` with the given dialect's case
    /// rules.
    #[must_use]
    pub fn new(input: &str, dialect: Dialect) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            dialect,
            pending_self_closing: false,
            issues: Vec::new(),
        }
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Case-insensitive lookahead for an ASCII keyword.
    fn looking_at_ignore_case(&self, keyword: &str) -> bool {
        keyword.chars().enumerate().all(|(i, expected)| {
            self.peek_at(i)
                .is_some_and(|c| c.eq_ignore_ascii_case(&expected))
        })
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(Self::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume up to and including the next `>`.
    fn skip_past_gt(&mut self) {
        while let Some(c) = self.advance() {
            if c == '>' {
                return;
            }
        }
    }

    fn record(&mut self, kind: IssueKind, offset: usize, message: String) {
        self.issues.push(ParseIssue::new(kind, offset, message));
    }

    /// Read a tag or attribute name: everything up to whitespace, `/`,
    /// `=`, `>`, or end of input.
    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if Self::is_whitespace(c) || matches!(c, '/' | '=' | '>') {
                break;
            }
            name.push(c);
            self.pos += 1;
        }
        name
    }

    /// Read a character run: `initial` plus everything up to the next `<`.
    fn read_text(&mut self, initial: String) -> Token {
        let mut data = initial;
        while let Some(c) = self.peek() {
            if c == '<' {
                break;
            }
            data.push(c);
            self.pos += 1;
        }
        Token::Character { data }
    }

    /// Dispatch after seeing `<`. Returns `None` when the construct was
    /// consumed without producing a token (e.g. an end tag with no name).
    fn read_tag_open(&mut self) -> Option<Token> {
        match self.peek_at(1) {
            Some('/') => {
                self.pos += 2;
                self.read_end_tag()
            }
            Some('!') => {
                self.pos += 2;
                Some(self.read_markup_declaration())
            }
            Some('?') => {
                self.pos += 2;
                Some(self.read_bogus_comment('?'))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.pos += 1;
                Some(self.read_start_tag())
            }
            // Not a tag at all (`<3`, lone `<` at EOF): the `<` is
            // character data.
            _ => {
                self.pos += 1;
                Some(self.read_text(String::from('<')))
            }
        }
    }

    fn read_start_tag(&mut self) -> Token {
        let raw = self.read_name();
        let name = self.dialect.fold_name(&raw);
        let mut attributes = Attributes::new();
        // A tag the input ends inside of is dropped, not emitted.
        let Some(self_closing) = self.read_attributes(&mut attributes) else {
            return Token::EndOfFile;
        };
        if self_closing {
            self.pending_self_closing = true;
        }
        Token::StartTag {
            name,
            attributes,
            self_closing,
        }
    }

    fn read_end_tag(&mut self) -> Option<Token> {
        let offset = self.pos;
        let raw = self.read_name();
        if raw.is_empty() {
            self.record(
                IssueKind::MalformedMarkup,
                offset,
                "end tag with no name".to_string(),
            );
            self.skip_past_gt();
            return None;
        }
        let name = self.dialect.fold_name(&raw);
        // Anything between the name and `>` (including attributes, which
        // are not allowed on end tags) is discarded.
        self.skip_past_gt();
        Some(Token::EndTag { name })
    }

    /// Dispatch after `<!`: a comment, a doctype, or a bogus comment.
    fn read_markup_declaration(&mut self) -> Token {
        if self.peek() == Some('-') && self.peek_at(1) == Some('-') {
            self.pos += 2;
            return self.read_comment();
        }
        if self.looking_at_ignore_case("doctype") {
            self.pos += "doctype".len();
            return self.read_doctype();
        }
        self.read_bogus_comment('!')
    }

    /// Read a proper comment after `<!--`, through `-->`.
    fn read_comment(&mut self) -> Token {
        let offset = self.pos;
        let mut data = String::new();
        loop {
            if self.at_eof() {
                self.record(
                    IssueKind::UnexpectedEof,
                    offset,
                    "input ended inside a comment".to_string(),
                );
                break;
            }
            if self.peek() == Some('-') && self.peek_at(1) == Some('-') && self.peek_at(2) == Some('>')
            {
                self.pos += 3;
                break;
            }
            if let Some(c) = self.advance() {
                data.push(c);
            }
        }
        Token::Comment { data, bogus: false }
    }

    /// Recover malformed markup (`<!...>`, `<?...>`) as a bogus comment.
    /// The data keeps the leading marker so the tree builder can
    /// re-materialize a declaration in dialects that parse them.
    fn read_bogus_comment(&mut self, marker: char) -> Token {
        let offset = self.pos;
        let mut data = String::from(marker);
        while let Some(c) = self.peek() {
            if c == '>' {
                self.pos += 1;
                break;
            }
            data.push(c);
            self.pos += 1;
        }
        self.record(
            IssueKind::MalformedMarkup,
            offset,
            format!("markup starting `<{marker}` recovered as a bogus comment"),
        );
        Token::Comment { data, bogus: true }
    }

    fn read_doctype(&mut self) -> Token {
        self.skip_whitespace();
        let raw = self.read_name();
        let name = self.dialect.fold_name(&raw);
        let mut public_identifier = String::new();
        let mut system_identifier = String::new();

        self.skip_whitespace();
        if self.looking_at_ignore_case("public") {
            self.pos += "public".len();
            self.skip_whitespace();
            public_identifier = self.read_doctype_identifier();
            self.skip_whitespace();
            if self.peek() != Some('>') {
                system_identifier = self.read_doctype_identifier();
            }
        } else if self.looking_at_ignore_case("system") {
            self.pos += "system".len();
            self.skip_whitespace();
            system_identifier = self.read_doctype_identifier();
        }
        self.skip_past_gt();

        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
        }
    }

    /// A doctype identifier: a quoted string, or a bare word up to
    /// whitespace or `>`.
    fn read_doctype_identifier(&mut self) -> String {
        let mut out = String::new();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                while let Some(c) = self.advance() {
                    if c == quote {
                        return out;
                    }
                    out.push(c);
                }
                self.record(
                    IssueKind::UnexpectedEof,
                    self.pos,
                    "input ended inside a doctype identifier".to_string(),
                );
            }
            _ => {
                while let Some(c) = self.peek() {
                    if Self::is_whitespace(c) || c == '>' {
                        break;
                    }
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
        out
    }

    /// Attribute scanning after the tag name. Returns whether the tag
    /// carried a self-closing `/>`, or `None` when the input ended inside
    /// the tag.
    fn read_attributes(&mut self, attributes: &mut Attributes) -> Option<bool> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    self.record(
                        IssueKind::UnexpectedEof,
                        self.pos,
                        "input ended inside a tag".to_string(),
                    );
                    return None;
                }
                Some('>') => {
                    self.pos += 1;
                    return Some(false);
                }
                Some('/') => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        return Some(true);
                    }
                    // Stray slash inside a tag; ignored.
                }
                Some('=') => {
                    // Stray `=` before any attribute name; ignored.
                    self.pos += 1;
                }
                Some(_) => {
                    let raw = self.read_name();
                    let name = self.dialect.fold_name(&raw);
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.read_attribute_value()
                    } else {
                        String::new()
                    };
                    if !name.is_empty() {
                        // First occurrence wins on duplicates.
                        let _ = attributes.insert(name, value);
                    }
                }
            }
        }
    }

    fn read_attribute_value(&mut self) -> String {
        let mut out = String::new();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                while let Some(c) = self.advance() {
                    if c == quote {
                        return out;
                    }
                    out.push(c);
                }
                self.record(
                    IssueKind::UnexpectedEof,
                    self.pos,
                    "input ended inside an attribute value".to_string(),
                );
            }
            _ => {
                while let Some(c) = self.peek() {
                    if Self::is_whitespace(c) || c == '>' {
                        break;
                    }
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
        out
    }
}

impl TokenSource for Tokenizer {
    fn next_token(&mut self) -> Token {
        if self.pending_self_closing {
            self.pending_self_closing = false;
            self.record(
                IssueKind::UnacknowledgedSelfClosing,
                self.pos,
                "self-closing flag was not acknowledged".to_string(),
            );
        }
        loop {
            if self.at_eof() {
                return Token::EndOfFile;
            }
            if self.peek() == Some('<') {
                if let Some(token) = self.read_tag_open() {
                    return token;
                }
                // The construct was consumed without a token; keep going.
            } else {
                return self.read_text(String::new());
            }
        }
    }

    fn acknowledge_self_closing(&mut self) {
        self.pending_self_closing = false;
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn drain_issues(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.issues)
    }
}
