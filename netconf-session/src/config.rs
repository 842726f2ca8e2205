// Copyright 2026 NETCONF session core contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ambient tunables for the session core: small, `Default`-able, and
//! orthogonal to the wire protocol itself. Unlike a user-facing
//! application config this has no TOML-file surface — the session core
//! has no persisted state — it is purely a constructor/builder knob bag.

use std::time::Duration;

/// Sleep inserted between retries of a transient "would-block" signal
/// from the transport. The reference value from the source is 100µs.
pub const DEFAULT_READ_RETRY_SLEEP: Duration = Duration::from_micros(100);

/// Initial capacity of the per-session `read_until` scratch buffer,
/// matching the source's `buflen = 1024` starting point. Doubles on
/// demand.
pub const DEFAULT_READ_UNTIL_CAPACITY: usize = 1024;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// How long to sleep before retrying a transient would-block read.
    pub read_retry_sleep: Duration,
    /// Starting capacity for the growable decode buffer.
    pub read_until_initial_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> SessionConfig {
        SessionConfig {
            read_retry_sleep: DEFAULT_READ_RETRY_SLEEP,
            read_until_initial_capacity: DEFAULT_READ_UNTIL_CAPACITY,
        }
    }
}
