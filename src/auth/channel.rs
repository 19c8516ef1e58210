//! Per-channel passcode lifecycle state.
//!
//! Each delivery channel (email, phone) carries its own [`ChannelState`]:
//! whether a passcode has been issued, how long until it may be reissued,
//! and bookkeeping for the asynchronous identity check that gates issuance.
//!
//! The legal transitions per channel:
//!
//! ```text
//! Idle(requested=false, remaining=0)
//!   -> ActiveCooldown(requested=true, remaining=60)   on issue
//!   ActiveCooldown -> ResendReady(requested=true, remaining=0)  via ticks
//!   ResendReady -> Idle | ActiveCooldown               on next toggle
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cooldown armed when a passcode is issued, in seconds.
pub const OTP_COOLDOWN_SECS: u32 = 60;

/// A delivery path for a one-time passcode.
///
/// The authenticator code is not a channel: it is generated on the user's
/// own device and never issued by this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Email,
    Phone,
}

impl OtpChannel {
    /// Both channels, in display order.
    pub const ALL: [OtpChannel; 2] = [OtpChannel::Email, OtpChannel::Phone];

    pub fn as_str(&self) -> &'static str {
        match self {
            OtpChannel::Email => "email",
            OtpChannel::Phone => "phone",
        }
    }
}

impl fmt::Display for OtpChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passcode lifecycle state for one delivery channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelState {
    /// Whether a passcode has been issued and the entry row is shown.
    pub requested: bool,
    /// Remaining resend cooldown. Zero whenever the channel is not in
    /// active cooldown; set only on issue, decremented only by the tick.
    pub seconds_remaining: u32,
    /// An identity check is currently in flight for this channel.
    pub in_flight: bool,
    /// Sequence number of the most recent request. Completions that do not
    /// carry the current number are stale and must be discarded.
    pub request_seq: u64,
}

impl ChannelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// One scheduler tick. Never increases the cooldown; a channel at zero
    /// stays at zero until explicitly re-armed. Returns whether the value
    /// changed.
    pub fn tick(&mut self) -> bool {
        if self.seconds_remaining > 0 {
            self.seconds_remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Whether the resend cooldown is still running.
    pub fn cooling_down(&self) -> bool {
        self.seconds_remaining > 0
    }

    /// Clear flow-scoped state. The sequence counter survives so that a
    /// completion spawned before the reset can never match a request made
    /// after it.
    pub fn reset(&mut self) {
        self.requested = false;
        self.seconds_remaining = 0;
        self.in_flight = false;
    }
}

/// Channel states for both delivery paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelSet {
    pub email: ChannelState,
    pub phone: ChannelState,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: OtpChannel) -> &ChannelState {
        match channel {
            OtpChannel::Email => &self.email,
            OtpChannel::Phone => &self.phone,
        }
    }

    pub fn get_mut(&mut self, channel: OtpChannel) -> &mut ChannelState {
        match channel {
            OtpChannel::Email => &mut self.email,
            OtpChannel::Phone => &mut self.phone,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChannelState> + '_ {
        [&mut self.email, &mut self.phone].into_iter()
    }
}
