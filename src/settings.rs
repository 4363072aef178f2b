//! SETTINGS negotiation state (RFC 9113 §6.5): the local and remote
//! parameter sets a connection tracks, plus pending-ACK bookkeeping.

use crate::error::FrameError;
use crate::frame::settings_id;

/// One side's negotiated HTTP/2 settings, with RFC 9113 §6.5.2 server
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub header_table_size: u32,
    pub enable_push: bool,
    pub max_concurrent_streams: Option<u32>,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            header_table_size: 4096,
            enable_push: true,
            max_concurrent_streams: None,
            initial_window_size: 65_535,
            max_frame_size: 16_384,
            max_header_list_size: None,
        }
    }
}

impl Settings {
    /// Apply one `(identifier, value)` pair from a SETTINGS frame,
    /// validating it per RFC 9113 §6.5.2. Unknown identifiers are ignored
    /// (forward compatibility), not an error.
    pub fn apply(&mut self, id: u16, value: u32) -> Result<(), FrameError> {
        match id {
            settings_id::HEADER_TABLE_SIZE => self.header_table_size = value,
            settings_id::ENABLE_PUSH => {
                if value > 1 {
                    return Err(FrameError::InvalidSetting { id, value });
                }
                self.enable_push = value == 1;
            }
            settings_id::MAX_CONCURRENT_STREAMS => self.max_concurrent_streams = Some(value),
            settings_id::INITIAL_WINDOW_SIZE => {
                if value > 0x7fff_ffff {
                    return Err(FrameError::InvalidSetting { id, value });
                }
                self.initial_window_size = value;
            }
            settings_id::MAX_FRAME_SIZE => {
                if !(16_384..=((1 << 24) - 1)).contains(&value) {
                    return Err(FrameError::InvalidSetting { id, value });
                }
                self.max_frame_size = value;
            }
            settings_id::MAX_HEADER_LIST_SIZE => self.max_header_list_size = Some(value),
            _ => {}
        }
        Ok(())
    }

    pub fn to_params(self) -> Vec<(u16, u32)> {
        let mut params = vec![
            (settings_id::HEADER_TABLE_SIZE, self.header_table_size),
            (settings_id::ENABLE_PUSH, self.enable_push as u32),
            (settings_id::INITIAL_WINDOW_SIZE, self.initial_window_size),
            (settings_id::MAX_FRAME_SIZE, self.max_frame_size),
        ];
        if let Some(max) = self.max_concurrent_streams {
            params.push((settings_id::MAX_CONCURRENT_STREAMS, max));
        }
        if let Some(max) = self.max_header_list_size {
            params.push((settings_id::MAX_HEADER_LIST_SIZE, max));
        }
        params
    }
}

/// Tracks both sides' `Settings` plus whether a locally-sent SETTINGS frame
/// is still awaiting the peer's ACK (RFC 9113 §6.5.3).
#[derive(Debug, Clone)]
pub struct SettingsContext {
    pub local: Settings,
    pub remote: Settings,
    local_ack_pending: bool,
}

impl SettingsContext {
    pub fn new(local: Settings) -> Self {
        SettingsContext {
            local,
            remote: Settings::default(),
            local_ack_pending: false,
        }
    }

    pub fn mark_local_sent(&mut self) {
        self.local_ack_pending = true;
    }

    pub fn mark_local_acked(&mut self) {
        self.local_ack_pending = false;
    }

    pub fn local_ack_pending(&self) -> bool {
        self.local_ack_pending
    }

    /// Apply a batch of remote SETTINGS parameters in order, per RFC 9113
    /// §6.5.3 ("the values in a SETTINGS frame are processed in the order
    /// they appear").
    pub fn apply_remote(&mut self, params: &[(u16, u32)]) -> Result<(), FrameError> {
        for &(id, value) in params {
            self.remote.apply(id, value)?;
        }
        Ok(())
    }
}
