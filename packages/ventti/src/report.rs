use serde::{Deserialize, Serialize};

/// How a settled round ended, from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Loss => "loss",
            Outcome::Draw => "draw",
        }
    }
}

/// Hands a settled outcome to the caller exactly once, so a round cannot be
/// recorded twice no matter how often the caller polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultReporter {
    delivered: bool,
}

impl ResultReporter {
    pub fn deliver(&mut self, outcome: Option<Outcome>) -> Option<Outcome> {
        match outcome {
            Some(outcome) if !self.delivered => {
                self.delivered = true;
                Some(outcome)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_deliver_before_settlement() {
        let mut reporter = ResultReporter::default();
        assert_eq!(reporter.deliver(None), None);
        assert_eq!(reporter.deliver(None), None);
    }

    #[test]
    fn test_delivers_exactly_once() {
        let mut reporter = ResultReporter::default();
        assert_eq!(reporter.deliver(Some(Outcome::Win)), Some(Outcome::Win));
        assert_eq!(reporter.deliver(Some(Outcome::Win)), None);
        assert_eq!(reporter.deliver(Some(Outcome::Win)), None);
    }

    #[test]
    fn test_early_polls_do_not_consume_the_report() {
        let mut reporter = ResultReporter::default();
        assert_eq!(reporter.deliver(None), None);
        assert_eq!(reporter.deliver(Some(Outcome::Draw)), Some(Outcome::Draw));
    }
}
