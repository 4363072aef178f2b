//! Embedder-facing tunables for a `Connection` (RFC 9113 §6.5.2 defaults
//! made explicit, plus this crate's own CONTINUATION accumulator bound).

/// Local-side settings an embedder sets before constructing a `Connection`.
/// `Config::default()` matches the RFC 9113 §6.5.2 server defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_concurrent_streams: u32,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: Option<u32>,
    pub header_table_size: u32,
    /// Multiplier applied to `max_header_list_size` to bound the
    /// CONTINUATION reassembly accumulator; used only when
    /// `max_header_list_size` is set. Without a configured list-size limit,
    /// the accumulator falls back to `MAX_HEADER_BLOCK_SIZE`.
    pub continuation_expansion_factor: u32,
}

/// Hard ceiling on the CONTINUATION reassembly buffer when no
/// `max_header_list_size` is configured.
pub const MAX_HEADER_BLOCK_SIZE: usize = 256 * 1024;

impl Default for Config {
    fn default() -> Self {
        Config {
            max_concurrent_streams: 100,
            initial_window_size: 65_535,
            max_frame_size: 16_384,
            max_header_list_size: None,
            header_table_size: 4096,
            continuation_expansion_factor: 8,
        }
    }
}

impl Config {
    /// The bound a connection should enforce on its CONTINUATION
    /// accumulator, per SPEC_FULL.md §4.10.
    pub fn max_header_block_size(&self) -> usize {
        match self.max_header_list_size {
            Some(limit) => limit as usize * self.continuation_expansion_factor as usize,
            None => MAX_HEADER_BLOCK_SIZE,
        }
    }
}
