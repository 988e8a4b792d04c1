//! Per-turn scratchpad of reasoning steps.
//!
//! The scratchpad accumulates everything that happened within the current
//! turn (actions taken, observations received, corrections issued) and
//! renders it back into protocol text for the next model request. It also
//! doubles as the turn's inspectable trace.

/// One recorded step within a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScratchpadEntry {
    /// A completed action: the model asked for a tool, the dispatcher
    /// produced an observation.
    Action {
        thought: Option<String>,
        action: String,
        input: String,
        observation: String,
    },

    /// A malformed completion and the corrective observation sent back.
    Correction { raw: String, correction: String },
}

/// The turn's scratchpad. Renders in protocol form, oldest entry first.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    entries: Vec<ScratchpadEntry>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScratchpadEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ScratchpadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ScratchpadEntry> {
        self.entries
    }

    /// Render the scratchpad as protocol text for the next request.
    /// Empty scratchpad renders as the empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            if !out.is_empty() {
                out.push('\n');
            }
            match entry {
                ScratchpadEntry::Action {
                    thought,
                    action,
                    input,
                    observation,
                } => {
                    if let Some(thought) = thought {
                        out.push_str("Thought: ");
                        out.push_str(thought);
                        out.push('\n');
                    }
                    out.push_str("Action: ");
                    out.push_str(action);
                    out.push_str("\nAction Input: ");
                    out.push_str(input);
                    out.push_str("\nObservation: ");
                    out.push_str(observation);
                    out.push('\n');
                }
                ScratchpadEntry::Correction { raw, correction } => {
                    out.push_str(raw);
                    out.push_str("\nObservation: ");
                    out.push_str(correction);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scratchpad_renders_empty() {
        assert_eq!(Scratchpad::new().render(), "");
    }

    #[test]
    fn action_entry_renders_protocol_block() {
        let mut pad = Scratchpad::new();
        pad.push(ScratchpadEntry::Action {
            thought: Some("Check the weather.".into()),
            action: "lookup_weather".into(),
            input: "Paris".into(),
            observation: "Sunny, 22°C".into(),
        });

        assert_eq!(
            pad.render(),
            "Thought: Check the weather.\n\
             Action: lookup_weather\n\
             Action Input: Paris\n\
             Observation: Sunny, 22°C\n"
        );
    }

    #[test]
    fn thoughtless_entry_omits_the_thought_line() {
        let mut pad = Scratchpad::new();
        pad.push(ScratchpadEntry::Action {
            thought: None,
            action: "calculator".into(),
            input: "1 + 1".into(),
            observation: "2".into(),
        });
        assert!(!pad.render().contains("Thought:"));
    }

    #[test]
    fn correction_entry_echoes_raw_text() {
        let mut pad = Scratchpad::new();
        pad.push(ScratchpadEntry::Correction {
            raw: "some rambling".into(),
            correction: "use the format".into(),
        });
        assert_eq!(pad.render(), "some rambling\nObservation: use the format\n");
    }

    #[test]
    fn entries_render_in_order() {
        let mut pad = Scratchpad::new();
        pad.push(ScratchpadEntry::Action {
            thought: None,
            action: "calculator".into(),
            input: "1 + 1".into(),
            observation: "2".into(),
        });
        pad.push(ScratchpadEntry::Action {
            thought: None,
            action: "calculator".into(),
            input: "2 + 2".into(),
            observation: "4".into(),
        });

        let rendered = pad.render();
        let first = rendered.find("1 + 1").unwrap();
        let second = rendered.find("2 + 2").unwrap();
        assert!(first < second);
        assert_eq!(pad.len(), 2);
    }
}
