//! HPACK encoder (RFC 7541 §6, §7).

use super::dynamic_table::DynamicTable;
use super::int_codec::encode_integer;
use super::{huffman, static_table, Header};

/// Encodes header lists into HPACK header block fragments, maintaining an
/// encoder-side dynamic table in lockstep with the remote decoder.
pub struct HpackEncoder {
    table: DynamicTable,
    /// Whether to Huffman-encode string literals when it is shorter than the
    /// raw bytes. Disabling this is mainly useful for interop testing against
    /// decoders that don't support Huffman (open question (a), see
    /// DESIGN.md): default is enabled, matching every real HPACK encoder in
    /// the corpus.
    pub use_huffman: bool,
    /// Table size update queued by `set_max_dynamic_table_size` but not yet
    /// flushed into the next `encode` call.
    pending_size_update: Option<usize>,
}

impl HpackEncoder {
    pub fn new(max_dynamic_table_size: usize) -> Self {
        HpackEncoder {
            table: DynamicTable::new(max_dynamic_table_size),
            use_huffman: true,
            pending_size_update: None,
        }
    }

    /// Queue a dynamic table size change (e.g. after the peer's SETTINGS
    /// acknowledges a new `header_table_size`). Takes effect at the start of
    /// the next `encode` call, per RFC 7541 §6.3.
    pub fn set_max_dynamic_table_size(&mut self, max_size: usize) {
        self.pending_size_update = Some(max_size);
    }

    /// Encode a full header list into one HPACK header block fragment. The
    /// caller (frame/connection layer) is responsible for splitting this into
    /// HEADERS + CONTINUATION frames if it exceeds `max_frame_size`.
    pub fn encode(&mut self, headers: &[Header]) -> Vec<u8> {
        let mut out = Vec::new();

        if let Some(max_size) = self.pending_size_update.take() {
            self.table.set_max_size(max_size);
            out.extend(encode_integer(max_size as u64, 5, 0b0010_0000));
        }

        for header in headers {
            self.encode_one(header, &mut out);
        }
        out
    }

    fn encode_one(&mut self, header: &Header, out: &mut Vec<u8>) {
        if header.sensitive {
            self.encode_never_indexed(header, out);
            return;
        }

        if let Some(index) = static_table::find_exact(&header.name, &header.value) {
            out.extend(encode_integer(index as u64, 7, 0b1000_0000));
            return;
        }
        if let Some(index) = self.table.find_exact(&header.name, &header.value) {
            let full_index = index + 61;
            out.extend(encode_integer(full_index as u64, 7, 0b1000_0000));
            return;
        }

        let name_index = static_table::find_name(&header.name)
            .or_else(|| self.table.find_name(&header.name).map(|i| i + 61));

        match name_index {
            Some(index) => out.extend(encode_integer(index as u64, 6, 0b0100_0000)),
            None => {
                out.push(0b0100_0000);
                self.encode_string(&header.name, out);
            }
        }
        self.encode_string(&header.value, out);
        self.table.add(header.name.clone(), header.value.clone());
    }

    fn encode_never_indexed(&self, header: &Header, out: &mut Vec<u8>) {
        let name_index = static_table::find_name(&header.name)
            .or_else(|| self.table.find_name(&header.name).map(|i| i + 61));
        match name_index {
            Some(index) => out.extend(encode_integer(index as u64, 4, 0b0001_0000)),
            None => {
                out.push(0b0001_0000);
                self.encode_string(&header.name, out);
            }
        }
        self.encode_string(&header.value, out);
    }

    fn encode_string(&self, s: &str, out: &mut Vec<u8>) {
        let raw = s.as_bytes();
        let huffman_len = huffman::encoded_len(raw);
        if self.use_huffman && huffman_len < raw.len() {
            out.extend(encode_integer(huffman_len as u64, 7, 0b1000_0000));
            out.extend(huffman::encode(raw));
        } else {
            out.extend(encode_integer(raw.len() as u64, 7, 0));
            out.extend_from_slice(raw);
        }
    }
}
