// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostic output switch
//!
//! Everything goes through the `log` facade; the switch only decides the
//! level. Swallowed errors are never silent, they drop to `debug`.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    enabled: bool,
}

impl Diagnostics {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Progress message, shown only when enabled
    pub fn progress(&self, message: impl Display) {
        if self.enabled {
            log::info!("{}", message);
        }
    }

    /// An error that was absorbed instead of returned
    pub fn swallowed(&self, context: impl Display, err: impl Display) {
        if self.enabled {
            log::warn!("{}: {}", context, err);
        } else {
            log::debug!("{}: {}", context, err);
        }
    }
}
