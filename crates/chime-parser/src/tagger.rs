//! Lexicon-based part-of-speech tagging.
//!
//! Closed word classes come from fixed lists, open-class words are split into
//! NOUN and VERB by position and a small verb lexicon. Good enough to pull
//! the content words out of a short imperative command.

use std::fmt;

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosTag {
    Noun,
    Verb,
    Adj,
    Adv,
    Det,
    Pron,
    Adp,
    Conj,
    Part,
    Aux,
    Num,
    Intj,
    Punct,
}

impl PosTag {
    /// Whether the tag marks a content word kept in task descriptions.
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Noun | Self::Verb)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Noun => "NOUN",
            Self::Verb => "VERB",
            Self::Adj => "ADJ",
            Self::Adv => "ADV",
            Self::Det => "DET",
            Self::Pron => "PRON",
            Self::Adp => "ADP",
            Self::Conj => "CONJ",
            Self::Part => "PART",
            Self::Aux => "AUX",
            Self::Num => "NUM",
            Self::Intj => "INTJ",
            Self::Punct => "PUNCT",
        };
        f.write_str(name)
    }
}

/// A tagged token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: PosTag,
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "every", "each", "some", "any", "no", "all", "another",
];

const PRONOUNS: &[&str] = &[
    "i", "me", "you", "he", "him", "she", "it", "we", "us", "they", "them", "myself",
    "yourself", "himself", "herself", "itself", "ourselves", "themselves", "mine", "yours",
    "something", "anything", "everything", "someone", "anyone", "everyone", "what", "who",
];

const ADPOSITIONS: &[&str] = &[
    "at", "on", "in", "for", "from", "with", "about", "by", "of", "into", "onto", "after",
    "before", "until", "till", "during", "around", "near", "over", "under", "up", "out", "off",
    "through", "via", "between", "without", "within",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "so", "because", "if", "while", "when", "whether", "than",
];

const PARTICLES: &[&str] = &["to", "not", "n't", "'s"];

const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "'ll", "'re", "'m", "'ve", "'d",
];

/// Verbs that act as auxiliaries before another verb or a negation.
const LIGHT_VERBS: &[&str] = &["do", "does", "did", "have", "has", "had"];

const ADVERBS: &[&str] = &[
    "now", "then", "later", "soon", "again", "also", "just", "very", "really", "here", "there",
    "always", "never", "often", "sometimes", "already", "still", "too", "asap", "right", "back",
];

const ADJECTIVES: &[&str] = &[
    "good", "new", "important", "big", "small", "quick", "short", "long", "daily", "weekly",
    "old", "little", "great", "next", "last", "first", "second", "other", "own", "same", "few",
    "many", "much", "more", "most", "urgent", "early", "late", "nice", "final",
];

const INTERJECTIONS: &[&str] = &[
    "please", "hey", "hi", "hello", "ok", "okay", "oh", "thanks", "yes", "yeah",
];

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "twenty", "thirty", "forty",
    "fifty", "half", "quarter",
];

/// Frequent verbs in reminder commands.
const VERBS: &[&str] = &[
    "set", "wake", "remind", "call", "buy", "take", "go", "get", "pick", "send", "pay", "book",
    "check", "feed", "walk", "water", "clean", "cook", "meet", "email", "text", "write", "read",
    "study", "finish", "start", "stop", "leave", "bring", "visit", "drink", "eat", "make",
    "submit", "review", "prepare", "schedule", "cancel", "renew", "order", "return", "wash",
    "charge", "stretch", "run", "exercise", "practice", "attend", "join", "watch", "listen",
    "pack", "load", "change", "fix", "ring", "phone", "tell", "ask", "need", "want", "remember",
    "forget", "give", "put", "turn", "open", "close", "print", "sign", "file",
];

const LY_NOUNS: &[&str] = &[
    "family", "supply", "reply", "apply", "fly", "ally", "rally", "belly", "jelly", "bully",
    "lily", "assembly", "july", "italy", "butterfly", "anomaly", "monopoly", "holly",
];

const CONTRACTION_SUFFIXES: &[&str] = &["n't", "'s", "'ll", "'re", "'m", "'ve", "'d"];

/// Split text into word and punctuation tokens.
///
/// Leading and trailing punctuation is peeled off each whitespace-separated
/// chunk and English contraction suffixes become their own tokens. Inner
/// punctuation (`7:30`, `e-mail`, `o'clock`) stays attached.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for chunk in text.split_whitespace() {
        let core_start = chunk
            .char_indices()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, _)| i);
        let Some(core_start) = core_start else {
            tokens.push(chunk.to_string());
            continue;
        };
        let core_end = chunk
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(chunk.len());

        if core_start > 0 {
            tokens.push(chunk[..core_start].to_string());
        }
        let core = &chunk[core_start..core_end];
        match split_contraction(core) {
            Some((stem, suffix)) => {
                tokens.push(stem.to_string());
                tokens.push(suffix.to_string());
            }
            None => tokens.push(core.to_string()),
        }
        if core_end < chunk.len() {
            tokens.push(chunk[core_end..].to_string());
        }
    }
    tokens
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_lowercase();
    CONTRACTION_SUFFIXES.iter().find_map(|suffix| {
        let at = word.len().checked_sub(suffix.len())?;
        if at > 0 && lower.ends_with(suffix) && word.is_char_boundary(at) {
            Some((&word[..at], &word[at..]))
        } else {
            None
        }
    })
}

/// Tag each token of `text`.
pub fn tag(text: &str) -> Vec<Token> {
    let words = tokenize(text);
    let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let mut tags: Vec<PosTag> = Vec::with_capacity(words.len());

    for (i, word) in lower.iter().enumerate() {
        let prev = tags.last().copied();
        let next = lower.get(i + 1).map(String::as_str);
        tags.push(tag_word(word, prev, next));
    }

    words
        .into_iter()
        .zip(tags)
        .map(|(text, tag)| Token { text, tag })
        .collect()
}

fn tag_word(word: &str, prev: Option<PosTag>, next: Option<&str>) -> PosTag {
    if !word.chars().any(char::is_alphanumeric) {
        return PosTag::Punct;
    }
    if word.chars().any(|c| c.is_ascii_digit()) || NUMBER_WORDS.contains(&word) {
        return PosTag::Num;
    }
    if PARTICLES.contains(&word) {
        return PosTag::Part;
    }
    if DETERMINERS.contains(&word) {
        return PosTag::Det;
    }
    if PRONOUNS.contains(&word) {
        return PosTag::Pron;
    }
    if ADPOSITIONS.contains(&word) {
        return PosTag::Adp;
    }
    if CONJUNCTIONS.contains(&word) {
        return PosTag::Conj;
    }
    if AUXILIARIES.contains(&word) {
        return PosTag::Aux;
    }
    if LIGHT_VERBS.contains(&word) {
        let auxiliary = next.is_some_and(|n| {
            n == "not" || n == "n't" || PRONOUNS.contains(&n) || VERBS.contains(&n)
        });
        return if auxiliary { PosTag::Aux } else { PosTag::Verb };
    }
    if INTERJECTIONS.contains(&word) {
        return PosTag::Intj;
    }
    if ADVERBS.contains(&word) {
        return PosTag::Adv;
    }
    if ADJECTIVES.contains(&word) {
        return PosTag::Adj;
    }
    if word.len() > 4 && word.ends_with("ly") && !LY_NOUNS.contains(&word) {
        return PosTag::Adv;
    }
    if word.len() > 6 && (word.ends_with("ous") || word.ends_with("ful")) {
        return PosTag::Adj;
    }

    // Open class: nouns follow determiners and adjectives; verbs follow "to",
    // auxiliaries and pronoun subjects, or open an imperative.
    match prev {
        Some(PosTag::Det | PosTag::Adj) => PosTag::Noun,
        Some(PosTag::Part | PosTag::Aux | PosTag::Pron) if VERBS.contains(&word) => PosTag::Verb,
        Some(PosTag::Part | PosTag::Aux) => PosTag::Verb,
        None | Some(PosTag::Intj | PosTag::Punct | PosTag::Conj | PosTag::Adv)
            if VERBS.contains(&word) =>
        {
            PosTag::Verb
        }
        None => PosTag::Verb,
        _ => PosTag::Noun,
    }
}
