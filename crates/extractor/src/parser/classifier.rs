use super::trim_layout;
use crate::template::RecordTemplate;

/// What to do with the lines that follow an end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndMarkerPolicy {
    /// Skip the marker and keep classifying the following lines
    #[default]
    Skip,
    /// Ignore every line after the first marker
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Title,
    /// One of the header lines consumed after a title, whatever its content
    TitleContinuation,
    EndMarker,
    /// Seen after an end marker under [`EndMarkerPolicy::Stop`]
    AfterEnd,
    Data,
}

impl LineKind {
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Skipping(usize),
    Done,
}

/// Classifies raw lines one at a time.
///
/// The only state carried between lines is the number of header lines still
/// to be skipped after a title, and whether an end marker stopped processing.
#[derive(Debug)]
pub struct LineClassifier<'a> {
    template: &'a RecordTemplate,
    policy: EndMarkerPolicy,
    state: State,
}

impl<'a> LineClassifier<'a> {
    pub fn new(template: &'a RecordTemplate, policy: EndMarkerPolicy) -> Self {
        Self {
            template,
            policy,
            state: State::Normal,
        }
    }

    pub fn classify(&mut self, raw: &str) -> LineKind {
        match self.state {
            State::Skipping(remaining) => {
                self.state = if remaining > 1 {
                    State::Skipping(remaining - 1)
                } else {
                    State::Normal
                };
                return LineKind::TitleContinuation;
            }
            State::Done => return LineKind::AfterEnd,
            State::Normal => {}
        }

        let line = trim_layout(raw);
        if line.is_empty() {
            LineKind::Blank
        } else if line.starts_with(self.template.title_prefix.as_str()) {
            if self.template.title_subrows > 0 {
                self.state = State::Skipping(self.template.title_subrows);
            }
            LineKind::Title
        } else if line.starts_with(self.template.end_prefix.as_str()) {
            if self.policy == EndMarkerPolicy::Stop {
                self.state = State::Done;
            }
            LineKind::EndMarker
        } else {
            LineKind::Data
        }
    }

    /// Header lines still owed to the last title, if any.
    pub fn pending_skip(&self) -> usize {
        match self.state {
            State::Skipping(remaining) => remaining,
            _ => 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }
}
