/// Forward-only cursor over a slice of classified lines.
///
/// Extractors walk a variant stream once, peeking ahead to decide what a
/// block is and consuming whole blocks with [`LineCursor::until_marker`].
#[derive(Debug, Clone)]
pub struct LineCursor<'a, T> {
    items: &'a [T],
    pos: usize,
}

impl<'a, T> LineCursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.items.len()
    }

    pub fn peek(&self) -> Option<&'a T> {
        self.items.get(self.pos)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a T> {
        self.items.get(self.pos + n)
    }

    /// The item consumed most recently.
    pub fn previous(&self) -> Option<&'a T> {
        self.pos.checked_sub(1).and_then(|i| self.items.get(i))
    }

    /// Item `n` places before the one consumed most recently.
    pub fn look_behind(&self, n: usize) -> Option<&'a T> {
        self.pos.checked_sub(n + 1).and_then(|i| self.items.get(i))
    }

    pub fn advance(&mut self) -> Option<&'a T> {
        let item = self.items.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    /// Consume items up to (not including) the first one matching `marker`.
    /// Returns the consumed run; the cursor is left on the marker, or at the
    /// end if none matched.
    pub fn until_marker(&mut self, marker: impl Fn(&T) -> bool) -> &'a [T] {
        let start = self.pos;
        while let Some(item) = self.items.get(self.pos) {
            if marker(item) {
                break;
            }
            self.pos += 1;
        }
        &self.items[start..self.pos]
    }

    /// Consume items while `pred` holds.
    pub fn advance_while(&mut self, pred: impl Fn(&T) -> bool) -> &'a [T] {
        self.until_marker(|item| !pred(item))
    }

    /// Skip ahead to the first item matching `pred` and consume it.
    pub fn seek(&mut self, pred: impl Fn(&T) -> bool) -> Option<&'a T> {
        self.until_marker(&pred);
        self.advance()
    }

    pub fn remaining(&self) -> &'a [T] {
        &self.items[self.pos.min(self.items.len())..]
    }
}

impl<'a, T> Iterator for LineCursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn until_marker_stops_on_marker() {
        let items = [1, 2, 3, 10, 4];
        let mut cursor = LineCursor::new(&items);
        let run = cursor.until_marker(|&n| n >= 10);
        assert_eq!(run, &[1, 2, 3]);
        assert_eq!(cursor.peek(), Some(&10));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn until_marker_without_match_consumes_all() {
        let items = [1, 2];
        let mut cursor = LineCursor::new(&items);
        assert_eq!(cursor.until_marker(|_| false), &[1, 2]);
        assert!(cursor.is_done());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn look_behind_and_previous() {
        let items = ["a", "b", "c"];
        let mut cursor = LineCursor::new(&items);
        assert_eq!(cursor.previous(), None);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.previous(), Some(&"b"));
        assert_eq!(cursor.look_behind(1), Some(&"a"));
        assert_eq!(cursor.look_behind(2), None);
    }

    #[test]
    fn seek_consumes_match() {
        let items = [1, 5, 2, 5];
        let mut cursor = LineCursor::new(&items);
        assert_eq!(cursor.seek(|&n| n == 5), Some(&5));
        assert_eq!(cursor.remaining(), &[2, 5]);
        assert_eq!(cursor.by_ref().count(), 2);
    }
}
