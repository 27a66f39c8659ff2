use colored::*;
use subprobe_common::network::{Classification, Outcome};

use crate::terminal::colors;

pub fn classification_color(classification: Classification) -> Color {
    match classification {
        Classification::StatusCode(code) => match code {
            100..=199 => colors::STATUS_INFORMATIONAL,
            200..=299 => colors::STATUS_SUCCESS,
            300..=399 => colors::STATUS_REDIRECT,
            400..=499 => colors::STATUS_CLIENT_ERROR,
            _ => colors::STATUS_SERVER_ERROR,
        },
        Classification::ConnectionError => colors::CONNECTION_ERROR,
        Classification::Timeout => colors::TIMEOUT,
    }
}

pub fn classification_to_colored(classification: Classification) -> ColoredString {
    let text = classification.to_string().color(classification_color(classification));
    match classification {
        Classification::StatusCode(_) => text.bold(),
        _ => text,
    }
}

/// Tally used by the summary line.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub responsive: usize,
    pub timeouts: usize,
    pub connection_errors: usize,
}

impl Tally {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut tally, outcome| {
                match outcome.classification() {
                    Classification::StatusCode(_) => tally.responsive += 1,
                    Classification::Timeout => tally.timeouts += 1,
                    Classification::ConnectionError => tally.connection_errors += 1,
                }
                tally
            })
    }
}
