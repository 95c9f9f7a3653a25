//! Fixed-pattern input masks.
//!
//! A pattern is a string of placeholder symbols and literals. Each
//! placeholder is bound to a `CharClass`; every other character is copied
//! into the output as-is. `Mask::apply` turns raw keystrokes into the
//! longest prefix of the pattern they can fill.

/// Character class a placeholder position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `[A-Za-z]`
    Letter,
    /// `[0-9]`
    Digit,
    /// `[0-9A-Ja-j]`, the sixth plate position of the Mercosul format.
    DigitOrAToJ,
}

impl CharClass {
    pub fn accepts(self, c: char) -> bool {
        match self {
            CharClass::Letter => c.is_ascii_alphabetic(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::DigitOrAToJ => {
                c.is_ascii_digit() || matches!(c.to_ascii_uppercase(), 'A'..='J')
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Literal(char),
    Placeholder(CharClass),
}

impl Slot {
    fn accepts(self, c: char) -> bool {
        match self {
            Slot::Literal(l) => l == c,
            Slot::Placeholder(class) => class.accepts(c),
        }
    }
}

/// Placeholder bindings used when none are given: `A`, `0` and `#`.
pub const DEFAULT_BINDINGS: &[(char, CharClass)] = &[
    ('A', CharClass::Letter),
    ('0', CharClass::Digit),
    ('#', CharClass::DigitOrAToJ),
];

pub const PLATE_PATTERN: &str = "AAA-0#00";
pub const CPF_PATTERN: &str = "000.000.000-00";
pub const RG_PATTERN: &str = "00.000.000-#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    slots: Vec<Slot>,
    uppercase: bool,
}

impl Mask {
    /// Parse `pattern` with the default placeholder bindings.
    pub fn new(pattern: &str) -> Self {
        Self::with_bindings(pattern, DEFAULT_BINDINGS)
    }

    pub fn with_bindings(pattern: &str, bindings: &[(char, CharClass)]) -> Self {
        let slots = pattern
            .chars()
            .map(|c| {
                bindings
                    .iter()
                    .find(|(symbol, _)| *symbol == c)
                    .map(|(_, class)| Slot::Placeholder(*class))
                    .unwrap_or(Slot::Literal(c))
            })
            .collect();
        Self {
            slots,
            uppercase: false,
        }
    }

    /// Upper-case accepted letters in the output.
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn plate() -> Self {
        Self::new(PLATE_PATTERN).uppercase()
    }

    pub fn cpf() -> Self {
        Self::new(CPF_PATTERN)
    }

    pub fn rg() -> Self {
        Self::new(RG_PATTERN).uppercase()
    }

    /// Number of characters in a fully filled value.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Format `raw` against the pattern.
    ///
    /// Characters that do not fit the current placeholder are skipped. A raw
    /// character equal to the literal expected next is consumed, so already
    /// formatted input is stable. Literals are only emitted once a later
    /// placeholder gets filled, or when the pattern ends in them.
    pub fn apply(&self, raw: &str) -> String {
        let mut out = String::with_capacity(self.slots.len());
        let mut pending = String::new();
        let mut input = raw.chars().peekable();

        for slot in &self.slots {
            match *slot {
                Slot::Literal(literal) => {
                    pending.push(literal);
                    if input.peek() == Some(&literal) {
                        input.next();
                    }
                }
                Slot::Placeholder(class) => {
                    let accepted = loop {
                        match input.next() {
                            None => return out,
                            Some(c) if class.accepts(c) => break c,
                            Some(_) => continue,
                        }
                    };
                    out.push_str(&pending);
                    pending.clear();
                    out.push(if self.uppercase {
                        accepted.to_ascii_uppercase()
                    } else {
                        accepted
                    });
                }
            }
        }

        out.push_str(&pending);
        out
    }

    /// Whether `value` fills every position of the pattern.
    pub fn is_complete(&self, value: &str) -> bool {
        value.chars().count() == self.slots.len() && self.conforms(value)
    }

    /// Whether every character of `value` fits the position it occupies.
    pub fn conforms(&self, value: &str) -> bool {
        value.chars().count() <= self.slots.len()
            && value.chars().zip(&self.slots).all(|(c, slot)| slot.accepts(c))
    }
}
