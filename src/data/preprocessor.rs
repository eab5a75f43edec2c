// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises one line of corpus text before it is split into
// tokens. Corpora are expected to be pre-segmented (tokens
// separated by spaces), so tokenisation is a whitespace split.
//
// Cleaning steps:
//   1. Map Unicode whitespace variants to a plain space
//   2. Map remaining control characters to a space
//   3. Collapse runs of spaces and trim the edges

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a single line of text.
    pub fn clean(&self, text: &str) -> String {
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' | '\r' | '\n' => ' ',
                // Non-breaking, zero-width and ideographic spaces, BOM
                '\u{00A0}' | '\u{200B}' | '\u{3000}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        let mut out        = String::with_capacity(normalised.len());
        let mut last_space = true;
        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }
        out.trim_end().to_string()
    }

    /// Clean a line and split it into tokens.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.clean(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
