//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// Why a replayed call could not be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    /// The cassette holds no calls at all for the requested pair.
    #[error("cassette has no recorded {call} calls (recorded: [{recorded}])")]
    NotRecorded {
        /// Requested `port::method`.
        call: String,
        /// Pairs the cassette does contain, sorted.
        recorded: String,
    },
    /// Every recorded call for the pair has already been served.
    #[error("cassette ran out of {call} calls after {served}; last served was seq {last_seq}")]
    Exhausted {
        /// Requested `port::method`.
        call: String,
        /// Calls served for this pair so far.
        served: usize,
        /// `seq` of the last call served for this pair.
        last_seq: u64,
    },
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct Call {
    port: String,
    method: String,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.port, self.method)
    }
}

/// Recorded calls for one `port::method` pair, oldest first.
#[derive(Debug, Default)]
struct Stream {
    pending: VecDeque<Interaction>,
    served: usize,
    last_seq: u64,
}

/// Serves a cassette's interactions back in order, independently per
/// port/method pair.
pub struct CassetteReplayer {
    streams: HashMap<Call, Stream>,
}

impl CassetteReplayer {
    /// Indexes `cassette` for replay.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut streams: HashMap<Call, Stream> = HashMap::new();
        for interaction in &cassette.interactions {
            let call = Call { port: interaction.port.clone(), method: interaction.method.clone() };
            streams.entry(call).or_default().pending.push_back(interaction.clone());
        }
        Self { streams }
    }

    /// Returns how many interactions are still unserved.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.streams.values().map(|s| s.pending.len()).sum()
    }

    /// Takes the next interaction recorded for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NotRecorded`] if the pair never occurs in the
    /// cassette, or [`ReplayError::Exhausted`] once its calls are used up.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<Interaction, ReplayError> {
        let call = Call { port: port.to_string(), method: method.to_string() };

        let Some(stream) = self.streams.get_mut(&call) else {
            let mut recorded: Vec<String> = self.streams.keys().map(ToString::to_string).collect();
            recorded.sort();
            return Err(ReplayError::NotRecorded {
                call: call.to_string(),
                recorded: recorded.join(", "),
            });
        };

        let Some(interaction) = stream.pending.pop_front() else {
            return Err(ReplayError::Exhausted {
                call: call.to_string(),
                served: stream.served,
                last_seq: stream.last_seq,
            });
        };
        stream.served += 1;
        stream.last_seq = interaction.seq;
        Ok(interaction)
    }
}
