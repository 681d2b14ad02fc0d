//! Span arithmetic between pest parse-tree spans and AST positions.
//!
//! Lines are 1-based and columns 0-based. A fragment embedded in a larger
//! document is parsed with a line offset, applied to every line, and a column
//! offset, applied to the first physical line only.

use std::sync::Arc;

use crate::ast::{Point, Position, SourceRef};
use crate::syntax::{Pair, Rule};

const TRIVIA: &[char] = &[' ', '\t', '\r', '\n', '\u{feff}'];

#[derive(Debug, Clone, Default)]
pub struct PositionResolver {
    line_offset: usize,
    column_offset: usize,
    source: Option<Arc<SourceRef>>,
}

impl PositionResolver {
    pub fn new(line_offset: usize, column_offset: usize, source: Option<Arc<SourceRef>>) -> Self {
        Self {
            line_offset,
            column_offset,
            source,
        }
    }

    pub fn source(&self) -> Option<&Arc<SourceRef>> {
        self.source.as_ref()
    }

    /// Converts a pest position to an offset-corrected AST point.
    pub fn point(&self, pos: pest::Position<'_>) -> Point {
        let (line, column) = pos.line_col();
        let column = column.saturating_sub(1);
        let column = if line == 1 {
            column + self.column_offset
        } else {
            column
        };
        Point::new(line + self.line_offset, column)
    }

    pub fn span_of_pest(&self, span: pest::Span<'_>) -> Position {
        Position::new(
            self.point(span.start_pos()),
            self.point(span.end_pos()),
            self.source.clone(),
        )
    }

    /// The position covering exactly one parse-tree node, without trailing
    /// trivia.
    pub fn span_of(&self, pair: &Pair<'_>) -> Position {
        self.span_between(pair, pair)
    }

    /// The position from the start of `first` to the end of `last`.
    pub fn span_between(&self, first: &Pair<'_>, last: &Pair<'_>) -> Position {
        let end = content_end(last);
        let end_pos = pest::Position::new(last.get_input(), end)
            .unwrap_or_else(|| last.as_span().end_pos());
        Position::new(
            self.point(first.as_span().start_pos()),
            self.point(end_pos),
            self.source.clone(),
        )
    }

    /// The position of the byte range `start..end` of `input`.
    pub fn span_of_offsets(&self, input: &str, start: usize, end: usize) -> Option<Position> {
        let start = pest::Position::new(input, start)?;
        let end = pest::Position::new(input, end)?;
        Some(Position::new(
            self.point(start),
            self.point(end),
            self.source.clone(),
        ))
    }
}

/// Non-atomic rules ending in an optional part carry the trivia skipped
/// before it; nodes never do. Raw text runs keep theirs, and leaves keep
/// everything but trailing whitespace.
fn content_end(pair: &Pair<'_>) -> usize {
    let span = pair.as_span();
    if matches!(pair.as_rule(), Rule::dq_text | Rule::sq_text | Rule::island_body) {
        return span.end();
    }
    let last = pair
        .clone()
        .into_inner()
        .filter(|child| child.as_rule() != Rule::EOI)
        .last();
    match last {
        Some(last) => significant_end(pair.get_input(), content_end(&last), span.end()),
        None => span.start() + span.as_str().trim_end_matches(TRIVIA).len(),
    }
}

/// End of the last token in `input[from..to]` that is neither whitespace nor
/// a comment, or `from` when there is none.
fn significant_end(input: &str, from: usize, to: usize) -> usize {
    let tail = input.get(from..to).unwrap_or_default();
    let mut end = from;
    let mut i = 0;
    while let Some(rest) = tail.get(i..).filter(|rest| !rest.is_empty()) {
        if rest.starts_with("//") {
            i += rest.find('\n').unwrap_or(rest.len());
        } else if rest.starts_with("/*") {
            i += rest[2..].find("*/").map_or(rest.len(), |close| close + 4);
        } else if let Some(c) = rest.chars().next() {
            i += c.len_utf8();
            if !TRIVIA.contains(&c) {
                end = from + i;
            }
        }
    }
    end
}

/// Source text of one node, without trailing trivia.
pub fn text_of<'i>(pair: &Pair<'i>) -> &'i str {
    text_between(pair, pair)
}

/// Source text from the start of `first` to the end of `last`.
pub fn text_between<'i>(first: &Pair<'i>, last: &Pair<'i>) -> &'i str {
    let input = first.get_input();
    let start = first.as_span().start();
    let end = content_end(last).max(start);
    input.get(start..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{BoxGrammar, Rule};
    use pest::Parser;

    fn first_identifier(input: &str) -> Pair<'_> {
        let pairs = BoxGrammar::parse(Rule::standalone_expression, input).unwrap();
        pairs
            .flatten()
            .find(|p| p.as_rule() == Rule::identifier)
            .unwrap()
    }

    #[test]
    fn column_offset_applies_to_first_line_only() {
        let resolver = PositionResolver::new(4, 10, None);
        let pair = first_identifier("foo");
        let pos = resolver.span_of(&pair);
        assert_eq!(pos.start, Point::new(5, 10));
        assert_eq!(pos.end, Point::new(5, 13));

        let pair = first_identifier("\n  bar");
        let pos = resolver.span_of(&pair);
        assert_eq!(pos.start, Point::new(6, 2));
    }

    #[test]
    fn trailing_whitespace_is_not_part_of_a_node() {
        let pairs = BoxGrammar::parse(Rule::standalone_expression, "a + b  ").unwrap();
        let additive = pairs
            .flatten()
            .find(|p| p.as_rule() == Rule::additive)
            .unwrap();
        assert_eq!(text_of(&additive), "a + b");
        let pos = PositionResolver::default().span_of(&additive);
        assert_eq!(pos.end, Point::new(1, 5));
    }

    #[test]
    fn trailing_comments_are_not_part_of_a_node() {
        for input in ["a + b // note", "a + b /* note */  ", "a + b /* 1 */ // 2"] {
            let pairs = BoxGrammar::parse(Rule::standalone_expression, input).unwrap();
            let root = pairs.peek().unwrap();
            assert_eq!(text_of(&root), "a + b", "{input:?}");
        }
    }

    #[test]
    fn comment_markers_in_the_tail_stop_at_their_close() {
        assert_eq!(significant_end("x /*/ y */ )", 1, 12), 12);
        assert_eq!(significant_end("x // )\n", 1, 7), 1);
        assert_eq!(significant_end("x / )", 1, 5), 5);
    }
}
