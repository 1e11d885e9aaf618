use line_column::Location;

/// Position within the scanned text that can be returned to later.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScannerMark {
    index: usize,
    location: Location,
}

pub struct Cursor {
    characters: Vec<char>,
    index: usize,
    location: Location,
}

impl Cursor {
    pub fn new(text: &str) -> Self {
        Self {
            characters: text.chars().collect(),
            index: 0,
            location: Location::default(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_end(&self) -> bool {
        self.index >= self.characters.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.characters.get(self.index + n).copied()
    }

    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        self.location.advance(c);
        Some(c)
    }

    // Advances past a sequence of characters if all match.
    pub fn eat(&mut self, sequence: &str) -> bool {
        let matches = sequence
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek_nth(i) == Some(expected));

        if matches {
            for _ in sequence.chars() {
                self.next();
            }
        }

        matches
    }

    pub fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();

        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            taken.push(c);
            self.next();
        }

        taken
    }

    pub fn mark(&self) -> ScannerMark {
        ScannerMark {
            index: self.index,
            location: self.location,
        }
    }

    pub fn rollback(&mut self, mark: ScannerMark) {
        self.index = mark.index;
        self.location = mark.location;
    }
}
