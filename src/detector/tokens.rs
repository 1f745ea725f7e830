// WHY: tokens carry their true start offset so repeated identical tokens are each
// checked at their own position

/// A whitespace-delimited token with its byte offset in the normalized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

/// Left-to-right split on whitespace, yielding every occurrence with its own offset
pub fn tokens_with_offsets(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = token_start.take() {
                tokens.push(Token {
                    text: &text[start..idx],
                    start,
                });
            }
        } else if token_start.is_none() {
            token_start = Some(idx);
        }
    }
    if let Some(start) = token_start {
        tokens.push(Token {
            text: &text[start..],
            start,
        });
    }
    tokens
}

/// Characters that survive token cleaning: alphanumerics plus leet symbols
pub fn is_kept_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '$' | '!' | '|')
}

/// Strip punctuation except the symbols that take part in leet substitution
pub fn clean_token(token: &str) -> String {
    token.chars().filter(|&c| is_kept_char(c)).collect()
}

/// Byte offset of the first kept character inside `token`, relative to the text
pub fn first_kept_offset(token: &Token<'_>) -> Option<usize> {
    token
        .text
        .char_indices()
        .find(|&(_, c)| is_kept_char(c))
        .map(|(idx, _)| token.start + idx)
}
