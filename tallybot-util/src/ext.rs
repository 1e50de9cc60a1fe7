pub trait StrExt {
    /// Cut the string down to at most `max` chars, marking the cut with `" ..."`.
    fn ellipsis(&self, max: usize) -> String;

    fn char_len(&self) -> usize;
}

impl StrExt for str {
    fn ellipsis(&self, max: usize) -> String {
        const MARKER: &str = " ...";

        if self.chars().count() <= max {
            return self.to_owned();
        } else if max < MARKER.len() {
            return self.chars().take(max).collect();
        }

        let keep = max.saturating_sub(MARKER.len());
        let mut cut: String = self.chars().take(keep).collect();
        cut.push_str(MARKER);

        cut
    }

    fn char_len(&self) -> usize {
        self.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::StrExt;

    #[test]
    fn ellipsis_short_is_untouched() {
        assert_eq!("hello".ellipsis(10), "hello");
        assert_eq!("hello".ellipsis(5), "hello");
    }

    #[test]
    fn ellipsis_marks_cut() {
        let cut = "abcdefghij".ellipsis(8);

        assert_eq!(cut, "abcd ...");
        assert_eq!(cut.char_len(), 8);
    }

    #[test]
    fn ellipsis_never_exceeds_max() {
        assert_eq!("abcdef".ellipsis(3), "abc");
        assert_eq!("abcdef".ellipsis(0), "");
        assert_eq!("abcdef".ellipsis(4), " ...");

        for max in 0..8 {
            assert!("abcdefghij".ellipsis(max).char_len() <= max);
        }
    }

    #[test]
    fn ellipsis_counts_chars_not_bytes() {
        let cut = "äöüäöüäöü".ellipsis(6);

        assert_eq!(cut, "äö ...");
    }
}
