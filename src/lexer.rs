//! Lexical analysis of one input line.
//!
//! A line is first cut into pipeline segments on `|`, then every segment is cut
//! into argument tokens on runs of whitespace. There is no quoting, escaping or
//! substitution: what the user typed between separators is what the program gets.
//! Both functions are total and borrow from the input.

/// Separator between two commands of a pipeline.
pub const PIPE: char = '|';

/// Splits a raw input line into its pipeline segments, in order.
///
/// Splitting is strict: a line with `k` pipe characters always yields `k + 1`
/// segments, and segments between doubled or trailing separators are kept as
/// empty strings so the caller can report them. Trailing line terminators are
/// ignored. A line with nothing but whitespace yields no segments at all.
pub fn split_pipeline(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.trim().is_empty() {
        return Vec::new();
    }
    line.split(PIPE).collect()
}

/// Splits one segment into argument tokens on runs of whitespace.
///
/// The first token, if any, is the program name.
pub fn split_arguments(segment: &str) -> Vec<&str> {
    segment.split_whitespace().collect()
}
