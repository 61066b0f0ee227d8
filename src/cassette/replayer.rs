//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

type StreamKey = (String, String);

/// Replays interactions from a loaded cassette.
///
/// Every `port::method` pair is an independent FIFO stream, so ports may be
/// replayed in a different interleaving than they were recorded in.
pub struct CassetteReplayer {
    streams: HashMap<StreamKey, VecDeque<Interaction>>,
    /// Last sequence number served per stream, for diagnostics.
    served: HashMap<StreamKey, u64>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: HashMap<StreamKey, VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            streams
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { streams, served: HashMap::new() }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination. The message lists what the cassette does
    /// contain so a diverging replay is easy to diagnose.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());

        let Some(stream) = self.streams.get_mut(&key) else {
            let mut available: Vec<String> =
                self.streams.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let Some(interaction) = stream.pop_front() else {
            let last_seq = self.served.get(&key).copied().unwrap_or_default();
            panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed. Last interaction was seq={last_seq}."
            );
        };

        self.served.insert(key, interaction.seq);
        interaction
    }
}
