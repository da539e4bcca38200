use super::fn_rune::MatchFn;
use crate::{Context, Node, Outcome, Result, Tx};

/// Consumes runes until the stop predicate matches or the stream ends.
///
/// The rune that satisfies the stop predicate is not consumed.
pub(crate) struct Until {
    stop: MatchFn,
}

impl Until {
    pub(crate) fn new<F>(stop: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        Until {
            stop: MatchFn::new(stop),
        }
    }
}

impl<T> Node<T> for Until {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let mut count = 0;
        while let Some((c, _)) = tx.next_rune()? {
            if self.stop.call(c) {
                tx.unread();
                break;
            }
            count += 1;
        }
        if count == 0 {
            Ok(Outcome::Rollback)
        } else {
            Ok(Outcome::Next)
        }
    }
}

/// Consumes bytes until the stop predicate matches or the stream ends.
pub(crate) struct UntilByte {
    stop: Box<dyn Fn(u8) -> bool + 'static>,
}

impl UntilByte {
    pub(crate) fn new<F>(stop: F) -> Self
    where
        F: Fn(u8) -> bool + 'static,
    {
        UntilByte {
            stop: Box::new(stop),
        }
    }
}

impl<T> Node<T> for UntilByte {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let mut count = 0;
        while let Some(b) = tx.next_byte()? {
            if (self.stop)(b) {
                tx.unread();
                break;
            }
            count += 1;
        }
        if count == 0 {
            Ok(Outcome::Rollback)
        } else {
            Ok(Outcome::Next)
        }
    }
}

/// Consumes runes until an unescaped stop rune.
///
/// A rune directly after an escape rune never stops the scan, this includes a second escape rune.
pub(crate) struct UntilUnescaped {
    escape: char,
    stop: char,
}

impl UntilUnescaped {
    pub(crate) fn new(escape: char, stop: char) -> Self {
        UntilUnescaped { escape, stop }
    }
}

impl<T> Node<T> for UntilUnescaped {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let mut count = 0;
        let mut escaped = false;
        while let Some((c, _)) = tx.next_rune()? {
            if escaped {
                escaped = false;
            } else if c == self.escape {
                escaped = true;
            } else if c == self.stop {
                tx.unread();
                break;
            }
            count += 1;
        }
        if count == 0 {
            Ok(Outcome::Rollback)
        } else {
            Ok(Outcome::Next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferedStream, History, Source};

    fn scan<N: Node<()>>(node: &N, input: &str) -> (Outcome, usize) {
        let history = History::new(0);
        let mut pending = Vec::new();
        let mut ctx = Context::new(&history, &mut pending, 1);
        let mut stream = BufferedStream::new(input.as_bytes());
        let mut tx = stream.begin();
        let outcome = node.update(&mut ctx, &mut tx).unwrap();
        (outcome, tx.offset())
    }

    #[test]
    fn test_until() {
        let until_space = Until::new(|c| c == ' ');
        assert_eq!(scan(&until_space, "abc def"), (Outcome::Next, 3));
        assert_eq!(scan(&until_space, "abc"), (Outcome::Next, 3));
        assert_eq!(scan(&until_space, " abc"), (Outcome::Rollback, 0));
        assert_eq!(scan(&until_space, ""), (Outcome::Rollback, 0));
    }

    #[test]
    fn test_until_byte() {
        let until_nul = UntilByte::new(|b| b == 0);
        let input: &[u8] = b"ab\0cd";
        let history = History::new(0);
        let mut pending: Vec<crate::Message<()>> = Vec::new();
        let mut ctx = Context::new(&history, &mut pending, 1);
        let mut stream = BufferedStream::new(input);
        let mut tx = stream.begin();
        assert_eq!(until_nul.update(&mut ctx, &mut tx).unwrap(), Outcome::Next);
        assert_eq!(tx.offset(), 2);
        assert_eq!(until_nul.update(&mut ctx, &mut tx).unwrap(), Outcome::Rollback);
        assert_eq!(tx.next_byte().unwrap(), Some(0));
        assert_eq!(until_nul.update(&mut ctx, &mut tx).unwrap(), Outcome::Next);
        assert_eq!(tx.offset(), 5);
    }

    #[test]
    fn test_until_unescaped() {
        let node = UntilUnescaped::new('\\', '"');
        assert_eq!(scan(&node, r#"ab\"c" rest"#), (Outcome::Next, 5));
        assert_eq!(scan(&node, r#"ab\\" rest"#), (Outcome::Next, 4));
        assert_eq!(scan(&node, r#"" rest"#), (Outcome::Rollback, 0));
    }
}
