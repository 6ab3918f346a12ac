//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions back in recorded order, with an
/// independent queue per port/method pair.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    last_seq: HashMap<(String, String), u64>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, last_seq: HashMap::new() }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination. The message names what was requested and
    /// which pairs the cassette does contain.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if let Some(queue) = self.queues.get_mut(&key) {
            return match queue.pop_front() {
                Some(interaction) => {
                    self.last_seq.insert(key, interaction.seq);
                    interaction
                }
                None => panic!(
                    "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                     have been consumed. Last interaction was seq={}.",
                    self.last_seq.get(&key).copied().unwrap_or_default()
                ),
            };
        }

        let mut available: Vec<String> =
            self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
        available.sort();
        panic!(
            "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
             Available port::method pairs: [{}]",
            available.join(", ")
        );
    }
}
