use rustc_hash::FxHashSet;

/// Matches exactly the rune `r`.
pub fn is_rune(r: char) -> impl Fn(char) -> bool + Clone + 'static {
    move |c| c == r
}

/// Matches any rune contained in `runes`.
pub fn one_of(runes: &str) -> impl Fn(char) -> bool + Clone + 'static {
    let set: FxHashSet<char> = runes.chars().collect();
    move |c| set.contains(&c)
}

/// Inverts a predicate.
pub fn not<P>(p: P) -> impl Fn(char) -> bool + Clone + 'static
where
    P: Fn(char) -> bool + Clone + 'static,
{
    move |c| !p(c)
}

/// Matches if either predicate matches.
pub fn or<A, B>(a: A, b: B) -> impl Fn(char) -> bool + Clone + 'static
where
    A: Fn(char) -> bool + Clone + 'static,
    B: Fn(char) -> bool + Clone + 'static,
{
    move |c| a(c) || b(c)
}

/// Matches if both predicates match.
pub fn and<A, B>(a: A, b: B) -> impl Fn(char) -> bool + Clone + 'static
where
    A: Fn(char) -> bool + Clone + 'static,
    B: Fn(char) -> bool + Clone + 'static,
{
    move |c| a(c) && b(c)
}

/// Matches every rune.
pub fn any() -> impl Fn(char) -> bool + Clone + 'static {
    |_| true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinators() {
        let sign = one_of("+-");
        assert!(sign('+'));
        assert!(!sign('*'));

        let digit = |c: char| c.is_ascii_digit();
        let number_start = or(digit, is_rune('.'));
        assert!(number_start('7'));
        assert!(number_start('.'));
        assert!(!number_start('e'));

        let lower_not_x = and(|c: char| c.is_ascii_lowercase(), not(is_rune('x')));
        assert!(lower_not_x('a'));
        assert!(!lower_not_x('x'));
        assert!(!lower_not_x('A'));
        assert!(any()('\u{1F600}'));
    }
}
