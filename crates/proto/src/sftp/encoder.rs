//! Reversible filename encoding for restrictive remote filesystems.
//!
//! Names are kept in a *standard* form on the local side. Characters that a
//! remote filesystem (or a remote shell) cannot store are swapped for visually
//! similar code points before a name is sent, and swapped back when a name is
//! read from a directory listing.
//!
//! ```text
//! standard          target (Encoding::WIN)
//! test:file.txt  -> test：file.txt
//! trailing.      -> trailing．
//! ```
//!
//! A literal occurrence of a replacement code point in a standard name is
//! prefixed with [`QUOTE_RUNE`] so that decoding stays unambiguous, and a
//! literal quote rune is doubled. With [`Encoding::NONE`] nothing is touched.
//!
//! # Example
//!
//! ```rust
//! use sftpkit_proto::sftp::encoder::Encoding;
//!
//! let enc: Encoding = "Win".parse().unwrap();
//! let encoded = enc.encode_path("dir:name/file?.txt");
//! assert_eq!(encoded, "dir：name/file？.txt");
//! assert_eq!(enc.decode_path(&encoded), "dir:name/file?.txt");
//! ```

use sftpkit_platform::{SftpkitError, SftpkitResult};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Escape marker placed in front of literal replacement code points.
pub const QUOTE_RUNE: char = '\u{201B}';

/// First code point of the Unicode "Control Pictures" block.
const CONTROL_PICTURES: u32 = 0x2400;

/// Set of character substitution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Encoding(u32);

impl Encoding {
    /// Identity encoding
    pub const NONE: Self = Self(0);
    /// `/` inside a name
    pub const SLASH: Self = Self(1 << 0);
    /// `<` and `>`
    pub const LT_GT: Self = Self(1 << 1);
    /// `"`
    pub const DOUBLE_QUOTE: Self = Self(1 << 2);
    /// `'`
    pub const SINGLE_QUOTE: Self = Self(1 << 3);
    /// `` ` ``
    pub const BACK_QUOTE: Self = Self(1 << 4);
    /// `$`
    pub const DOLLAR: Self = Self(1 << 5);
    /// `:`
    pub const COLON: Self = Self(1 << 6);
    /// `?`
    pub const QUESTION: Self = Self(1 << 7);
    /// `*`
    pub const ASTERISK: Self = Self(1 << 8);
    /// `|`
    pub const PIPE: Self = Self(1 << 9);
    /// `#`
    pub const HASH: Self = Self(1 << 10);
    /// `%`
    pub const PERCENT: Self = Self(1 << 11);
    /// `\`
    pub const BACK_SLASH: Self = Self(1 << 12);
    /// CR and LF anywhere in a name
    pub const CR_LF: Self = Self(1 << 13);
    /// DEL (0x7F)
    pub const DEL: Self = Self(1 << 14);
    /// Control characters 0x00-0x1F
    pub const CTL: Self = Self(1 << 15);
    /// Space as first character
    pub const LEFT_SPACE: Self = Self(1 << 16);
    /// Period as first character
    pub const LEFT_PERIOD: Self = Self(1 << 17);
    /// Tilde as first character
    pub const LEFT_TILDE: Self = Self(1 << 18);
    /// CR, LF, HT or VT as first character
    pub const LEFT_CR_LF_HT_VT: Self = Self(1 << 19);
    /// Space as last character
    pub const RIGHT_SPACE: Self = Self(1 << 20);
    /// Period as last character
    pub const RIGHT_PERIOD: Self = Self(1 << 21);
    /// CR, LF, HT or VT as last character
    pub const RIGHT_CR_LF_HT_VT: Self = Self(1 << 22);
    /// The names `.` and `..`
    pub const DOT: Self = Self(1 << 23);
    /// `[` and `]`
    pub const SQUARE_BRACKET: Self = Self(1 << 24);
    /// `;`
    pub const SEMICOLON: Self = Self(1 << 25);
    /// `!`
    pub const EXCLAMATION: Self = Self(1 << 26);

    /// Characters a Windows filesystem refuses: `:?"*<>|`, trailing space and
    /// trailing period.
    pub const WIN: Self = Self(
        Self::COLON.0
            | Self::QUESTION.0
            | Self::DOUBLE_QUOTE.0
            | Self::ASTERISK.0
            | Self::LT_GT.0
            | Self::PIPE.0
            | Self::RIGHT_SPACE.0
            | Self::RIGHT_PERIOD.0,
    );

    /// Raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every rule in `other` is enabled.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no rule is enabled.
    pub const fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// Converts a single standard name to its target form.
    ///
    /// `/` is only substituted when [`Encoding::SLASH`] is enabled.
    pub fn encode_name(&self, name: &str) -> String {
        if self.is_identity() || name.is_empty() {
            return name.to_string();
        }
        if self.contains(Self::DOT) {
            match name {
                "." => return DOT_NAME.to_string(),
                ".." => return DOT_DOT_NAME.to_string(),
                _ => {}
            }
        }

        let chars: Vec<char> = name.chars().collect();
        let last = chars.len() - 1;
        let mut out = String::with_capacity(name.len() + 8);

        for (i, &c) in chars.iter().enumerate() {
            if let Some(replacement) = self.substitute(c, i == 0, i == last) {
                out.push(replacement);
                continue;
            }
            if c == QUOTE_RUNE || self.is_replacement(c) {
                out.push(QUOTE_RUNE);
            }
            out.push(c);
        }
        out
    }

    /// Converts a single target name back to standard form.
    pub fn decode_name(&self, name: &str) -> String {
        if self.is_identity() || name.is_empty() {
            return name.to_string();
        }
        if self.contains(Self::DOT) {
            match name {
                DOT_NAME => return ".".to_string(),
                DOT_DOT_NAME => return "..".to_string(),
                _ => {}
            }
        }

        let chars: Vec<char> = name.chars().collect();
        let last = chars.len() - 1;
        let mut out = String::with_capacity(name.len());

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == QUOTE_RUNE {
                if let Some(&next) = chars.get(i + 1) {
                    if next == QUOTE_RUNE || self.is_replacement(next) {
                        out.push(next);
                        i += 2;
                        continue;
                    }
                }
                // Stray marker written by someone else
                out.push(c);
            } else {
                out.push(self.restore(c, i == 0, i == last).unwrap_or(c));
            }
            i += 1;
        }
        out
    }

    /// Converts a `/`-separated standard path segment by segment.
    pub fn encode_path(&self, path: &str) -> String {
        if self.is_identity() {
            return path.to_string();
        }
        path.split('/')
            .map(|segment| self.encode_name(segment))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Converts a `/`-separated target path back to standard form.
    pub fn decode_path(&self, path: &str) -> String {
        if self.is_identity() {
            return path.to_string();
        }
        path.split('/')
            .map(|segment| self.decode_name(segment))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn active_rules(&self) -> impl Iterator<Item = &'static Rule> + '_ {
        RULES.iter().filter(move |rule| self.contains(rule.flag))
    }

    fn substitute(&self, c: char, first: bool, last: bool) -> Option<char> {
        if self.contains(Self::CTL) && (c as u32) < 0x20 {
            return char::from_u32(CONTROL_PICTURES + c as u32);
        }
        self.active_rules()
            .filter(|rule| rule.position.applies(first, last))
            .find_map(|rule| {
                rule.pairs
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| *to)
            })
    }

    fn restore(&self, c: char, first: bool, last: bool) -> Option<char> {
        if self.contains(Self::CTL) {
            let code = c as u32;
            if (CONTROL_PICTURES..CONTROL_PICTURES + 0x20).contains(&code) {
                return char::from_u32(code - CONTROL_PICTURES);
            }
        }
        self.active_rules()
            .filter(|rule| rule.position.applies(first, last))
            .find_map(|rule| {
                rule.pairs
                    .iter()
                    .find(|(_, to)| *to == c)
                    .map(|(from, _)| *from)
            })
    }

    /// Whether `c` is produced by any enabled rule, at any position.
    fn is_replacement(&self, c: char) -> bool {
        if self.contains(Self::CTL)
            && (CONTROL_PICTURES..CONTROL_PICTURES + 0x20).contains(&(c as u32))
        {
            return true;
        }
        if self.contains(Self::DOT) && c == FULLWIDTH_PERIOD {
            return true;
        }
        self.active_rules()
            .any(|rule| rule.pairs.iter().any(|(_, to)| *to == c))
    }
}

impl BitOr for Encoding {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Encoding {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for Encoding {
    type Err = SftpkitError;

    /// Parses a comma-separated list of rule or preset names, e.g.
    /// `"Win"`, `"Slash,Colon,RightSpace"`. An empty string is the identity.
    fn from_str(s: &str) -> SftpkitResult<Self> {
        let mut encoding = Self::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (_, flag) = NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))
                .ok_or_else(|| {
                    SftpkitError::Config(format!("unknown encoding name {:?}", part))
                })?;
            encoding |= *flag;
        }
        Ok(encoding)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("None");
        }
        if *self == Self::WIN {
            return f.write_str("Win");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(_, flag)| flag.0.count_ones() == 1 && self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Encoding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Encoding {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

const FULLWIDTH_PERIOD: char = '\u{FF0E}';
const DOT_NAME: &str = "\u{FF0E}";
const DOT_DOT_NAME: &str = "\u{FF0E}\u{FF0E}";

#[derive(Debug, Clone, Copy)]
enum Position {
    Anywhere,
    First,
    Last,
}

impl Position {
    fn applies(self, first: bool, last: bool) -> bool {
        match self {
            Position::Anywhere => true,
            Position::First => first,
            Position::Last => last,
        }
    }
}

#[derive(Debug)]
struct Rule {
    flag: Encoding,
    position: Position,
    pairs: &'static [(char, char)],
}

const CR_LF_HT_VT: &[(char, char)] = &[
    ('\r', '\u{240D}'),
    ('\n', '\u{240A}'),
    ('\t', '\u{2409}'),
    ('\u{0B}', '\u{240B}'),
];

const RULES: &[Rule] = &[
    Rule { flag: Encoding::SLASH, position: Position::Anywhere, pairs: &[('/', '\u{FF0F}')] },
    Rule {
        flag: Encoding::LT_GT,
        position: Position::Anywhere,
        pairs: &[('<', '\u{FF1C}'), ('>', '\u{FF1E}')],
    },
    Rule { flag: Encoding::DOUBLE_QUOTE, position: Position::Anywhere, pairs: &[('"', '\u{FF02}')] },
    Rule { flag: Encoding::SINGLE_QUOTE, position: Position::Anywhere, pairs: &[('\'', '\u{FF07}')] },
    Rule { flag: Encoding::BACK_QUOTE, position: Position::Anywhere, pairs: &[('`', '\u{FF40}')] },
    Rule { flag: Encoding::DOLLAR, position: Position::Anywhere, pairs: &[('$', '\u{FF04}')] },
    Rule { flag: Encoding::COLON, position: Position::Anywhere, pairs: &[(':', '\u{FF1A}')] },
    Rule { flag: Encoding::QUESTION, position: Position::Anywhere, pairs: &[('?', '\u{FF1F}')] },
    Rule { flag: Encoding::ASTERISK, position: Position::Anywhere, pairs: &[('*', '\u{FF0A}')] },
    Rule { flag: Encoding::PIPE, position: Position::Anywhere, pairs: &[('|', '\u{FF5C}')] },
    Rule { flag: Encoding::HASH, position: Position::Anywhere, pairs: &[('#', '\u{FF03}')] },
    Rule { flag: Encoding::PERCENT, position: Position::Anywhere, pairs: &[('%', '\u{FF05}')] },
    Rule { flag: Encoding::BACK_SLASH, position: Position::Anywhere, pairs: &[('\\', '\u{FF3C}')] },
    Rule {
        flag: Encoding::SQUARE_BRACKET,
        position: Position::Anywhere,
        pairs: &[('[', '\u{FF3B}'), (']', '\u{FF3D}')],
    },
    Rule { flag: Encoding::SEMICOLON, position: Position::Anywhere, pairs: &[(';', '\u{FF1B}')] },
    Rule { flag: Encoding::EXCLAMATION, position: Position::Anywhere, pairs: &[('!', '\u{FF01}')] },
    Rule {
        flag: Encoding::CR_LF,
        position: Position::Anywhere,
        pairs: &[('\r', '\u{240D}'), ('\n', '\u{240A}')],
    },
    Rule { flag: Encoding::DEL, position: Position::Anywhere, pairs: &[('\u{7F}', '\u{2421}')] },
    Rule { flag: Encoding::LEFT_SPACE, position: Position::First, pairs: &[(' ', '\u{2420}')] },
    Rule { flag: Encoding::LEFT_PERIOD, position: Position::First, pairs: &[('.', FULLWIDTH_PERIOD)] },
    Rule { flag: Encoding::LEFT_TILDE, position: Position::First, pairs: &[('~', '\u{FF5E}')] },
    Rule { flag: Encoding::LEFT_CR_LF_HT_VT, position: Position::First, pairs: CR_LF_HT_VT },
    Rule { flag: Encoding::RIGHT_SPACE, position: Position::Last, pairs: &[(' ', '\u{2420}')] },
    Rule { flag: Encoding::RIGHT_PERIOD, position: Position::Last, pairs: &[('.', FULLWIDTH_PERIOD)] },
    Rule { flag: Encoding::RIGHT_CR_LF_HT_VT, position: Position::Last, pairs: CR_LF_HT_VT },
];

const NAMES: &[(&str, Encoding)] = &[
    ("None", Encoding::NONE),
    ("Win", Encoding::WIN),
    ("Slash", Encoding::SLASH),
    ("LtGt", Encoding::LT_GT),
    ("DoubleQuote", Encoding::DOUBLE_QUOTE),
    ("SingleQuote", Encoding::SINGLE_QUOTE),
    ("BackQuote", Encoding::BACK_QUOTE),
    ("Dollar", Encoding::DOLLAR),
    ("Colon", Encoding::COLON),
    ("Question", Encoding::QUESTION),
    ("Asterisk", Encoding::ASTERISK),
    ("Pipe", Encoding::PIPE),
    ("Hash", Encoding::HASH),
    ("Percent", Encoding::PERCENT),
    ("BackSlash", Encoding::BACK_SLASH),
    ("SquareBracket", Encoding::SQUARE_BRACKET),
    ("Semicolon", Encoding::SEMICOLON),
    ("Exclamation", Encoding::EXCLAMATION),
    ("CrLf", Encoding::CR_LF),
    ("Del", Encoding::DEL),
    ("Ctl", Encoding::CTL),
    ("LeftSpace", Encoding::LEFT_SPACE),
    ("LeftPeriod", Encoding::LEFT_PERIOD),
    ("LeftTilde", Encoding::LEFT_TILDE),
    ("LeftCrLfHtVt", Encoding::LEFT_CR_LF_HT_VT),
    ("RightSpace", Encoding::RIGHT_SPACE),
    ("RightPeriod", Encoding::RIGHT_PERIOD),
    ("RightCrLfHtVt", Encoding::RIGHT_CR_LF_HT_VT),
    ("Dot", Encoding::DOT),
];
