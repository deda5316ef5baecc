//! Rule-based English word tokenizer
//!
//! Deterministic and idempotent for identical input. Downstream code rejoins
//! tokens with single spaces to form span text, so these boundaries must stay
//! stable across calls.

use regex::Regex;

const CLITICS: &str = "'|:|-|'S|'D|'M|'LL|'RE|'VE|N'T|'s|'d|'m|'ll|'re|'ve|n't";

/// Words ending in a period that are kept whole rather than split.
const ABBREVIATIONS: &[&str] = &[
    "Co.", "Corp.", "vs.", "e.g.", "etc.", "ex.", "cf.", "eg.", "Jan.", "Feb.", "Mar.", "Apr.",
    "Jun.", "Jul.", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.", "jan.", "feb.", "mar.", "apr.",
    "jun.", "jul.", "aug.", "sept.", "oct.", "nov.", "dec.", "ed.", "eds.", "repr.", "trans.",
    "vol.", "vols.", "rev.", "est.", "b.", "m.", "bur.", "d.", "r.", "M.", "Dept.", "MM.", "U.",
    "Mr.", "Jr.", "Ms.", "Mme.", "Mrs.", "Dr.", "Ph.D.",
];

/// Splits English text into word tokens.
///
/// Separators, commas (outside numbers), clitics ('s, n't, ...) and trailing
/// periods become their own tokens; known abbreviations and initialisms keep
/// their periods.
#[derive(Debug, Clone)]
pub struct EnglishTokenizer {
    separators: Regex,
    comma_left: Regex,
    comma_right: Regex,
    quote_after_nonword: Regex,
    clitics_end: Regex,
    clitics_mid: Regex,
    word_period: Regex,
    initialism: Regex,
}

impl Default for EnglishTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl EnglishTokenizer {
    pub fn new() -> Self {
        Self {
            separators: Regex::new(r#"([?!()";/\|`])"#).expect("tokenizer pattern"),
            comma_left: Regex::new("([^0-9]),").expect("tokenizer pattern"),
            comma_right: Regex::new(",([^0-9])").expect("tokenizer pattern"),
            quote_after_nonword: Regex::new("([^a-zA-Z0-9])'").expect("tokenizer pattern"),
            clitics_end: Regex::new(&format!("({CLITICS})$")).expect("tokenizer pattern"),
            clitics_mid: Regex::new(&format!("({CLITICS})([^a-zA-Z0-9])"))
                .expect("tokenizer pattern"),
            word_period: Regex::new(r".*[a-zA-Z0-9]\.").expect("tokenizer pattern"),
            initialism: Regex::new(r"^([A-Za-z]\.([A-Za-z]\.)+|[A-Z][bcdfghj-nptvxz]+\.)$")
                .expect("tokenizer pattern"),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let s = text.replace('\t', " ");
        let s = self.separators.replace_all(&s, " ${1} ");
        let s = self.comma_left.replace_all(&s, "${1} , ");
        let s = self.comma_right.replace_all(&s, " , ${1}");
        // A quote stays attached to the word it opens, wherever it sits;
        // splitting it off only at string start would make token boundaries
        // depend on position and break stability under rejoin.
        let s = self.quote_after_nonword.replace_all(&s, "${1} '");
        let s = self.clitics_end.replace_all(&s, " ${1}");
        let s = self.clitics_mid.replace_all(&s, " ${1} ${2}");

        let mut tokens = Vec::new();
        for word in s.split_whitespace() {
            if self.word_period.is_match(word)
                && !ABBREVIATIONS.contains(&word)
                && !self.initialism.is_match(word)
            {
                // Detach the trailing-period suffix at the first dot. A dot
                // in first position would leave an empty head, so stay whole.
                match word.find('.') {
                    Some(dot) if dot > 0 => {
                        tokens.push(word[..dot].to_string());
                        tokens.push(word[dot..].to_string());
                        continue;
                    }
                    _ => {}
                }
            }
            tokens.push(word.to_string());
        }
        tokens
    }
}
