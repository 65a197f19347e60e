//! State diagram parser
//!
//! Regex-driven extraction of transitions with implicit state discovery:
//!
//! ```text
//! stateDiagram-v2
//!     [*] --> Draft
//!     Draft --> Review : submit
//!     Review --> Published : approve [reviewer assigned] / notify author
//!     Published --> [*]
//! ```
//!
//! When a scan finds no transitions at all, a fixed two-state default
//! machine is substituted and flagged with a warning diagnostic.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use tracing::{debug, span, trace, warn, Level};

use super::database::{StateMachine, StateTransition};
use crate::core::{Diagnostics, MetadataFilter, Parser};

static INITIAL_RE: OnceLock<Regex> = OnceLock::new();
static FINAL_RE: OnceLock<Regex> = OnceLock::new();
static TRANSITION_RE: OnceLock<Regex> = OnceLock::new();

fn initial_re() -> &'static Regex {
    INITIAL_RE.get_or_init(|| {
        Regex::new(r"^\[\*\]\s*-->\s*(\w+)\s*(?::.*)?$").expect("initial-state regex must compile")
    })
}

fn final_re() -> &'static Regex {
    FINAL_RE.get_or_init(|| {
        Regex::new(r"^(\w+)\s*-->\s*\[\*\]\s*(?::.*)?$").expect("final-state regex must compile")
    })
}

fn transition_re() -> &'static Regex {
    TRANSITION_RE.get_or_init(|| {
        Regex::new(r"^(\w+)\s*-->\s*(\w+)\s*(?::\s*(.+))?$").expect("transition regex must compile")
    })
}

/// Decompose a transition label into trigger, guard condition, and action.
///
/// The full form is `trigger [condition] / action`; every part is optional.
fn decompose_label(label: &str) -> (String, Option<String>, Option<String>) {
    let (head, action) = match label.split_once('/') {
        Some((head, action)) => {
            let action = action.trim();
            (
                head.trim().to_string(),
                (!action.is_empty()).then(|| action.to_string()),
            )
        }
        None => (label.trim().to_string(), None),
    };

    let (trigger, condition) = match (head.find('['), head.rfind(']')) {
        (Some(open), Some(close)) if close > open => {
            let condition = head[open + 1..close].trim().to_string();
            let trigger = format!("{} {}", &head[..open], &head[close + 1..])
                .trim()
                .to_string();
            (trigger, (!condition.is_empty()).then_some(condition))
        }
        _ => (head, None),
    };

    (trigger, condition, action)
}

/// State diagram parser
pub struct StateParser;

impl StateParser {
    pub fn new() -> Self {
        Self
    }

    fn is_header(line: &str) -> bool {
        line.to_lowercase().starts_with("statediagram")
    }
}

impl Default for StateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser<StateMachine> for StateParser {
    fn parse(
        &self,
        input: &str,
        database: &mut StateMachine,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_state_diagram", input_len = input.len());
        let _enter = parse_span.enter();

        let mut filter = MetadataFilter::new();

        for (idx, raw) in input.lines().enumerate() {
            let line_no = idx + 1;
            if filter.should_skip(raw) {
                continue;
            }
            let line = raw.trim();
            if line.is_empty() || Self::is_header(line) {
                continue;
            }

            if let Some(caps) = initial_re().captures(line) {
                database.set_initial(&caps[1]);
                trace!(line = line_no, state = &caps[1], "Initial state");
                continue;
            }

            if let Some(caps) = final_re().captures(line) {
                // The end marker flags the state; the pseudo-state itself
                // is never registered.
                database.mark_final(&caps[1]);
                trace!(line = line_no, state = &caps[1], "Final state");
                continue;
            }

            if let Some(caps) = transition_re().captures(line) {
                let label = caps.get(3).map(|m| m.as_str()).unwrap_or("");
                let (trigger, condition, action) = decompose_label(label);

                let mut transition = StateTransition::new(&caps[1], &caps[2], trigger);
                transition.condition = condition;
                transition.action = action;
                database.add_transition(transition);
                continue;
            }

            if line.contains("-->") {
                diagnostics.warning(
                    format!("skipping unparseable transition line: {line}"),
                    line_no,
                    1,
                );
            } else {
                trace!(line = line_no, "Ignoring non-transition line");
            }
        }

        if database.transition_count() == 0 {
            warn!("No transitions found, substituting default state machine");
            diagnostics.warning(
                "no transitions found in state diagram; substituted default ACTIVE/SUSPENDED machine",
                0,
                0,
            );
            database.inject_fallback();
        }

        debug!(
            state_count = database.state_count(),
            transition_count = database.transition_count(),
            "State diagram parsing completed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "state"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let lower = input.trim().to_lowercase();
        lower.starts_with("statediagram") || input.contains("[*]")
    }
}
