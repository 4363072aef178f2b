//! HPACK decoder (RFC 7541 §6, §7).

use super::dynamic_table::DynamicTable;
use super::int_codec::decode_integer;
use super::{huffman, static_table, Header};
use crate::error::HpackError;

/// Decodes HPACK header block fragments, maintaining a decoder-side dynamic
/// table that mirrors the remote encoder's.
pub struct HpackDecoder {
    table: DynamicTable,
    /// Ceiling a dynamic table size update may not exceed: the
    /// `header_table_size` this side advertised via SETTINGS.
    negotiated_max_size: usize,
    /// `max_header_list_size` from `Config`, if the embedder set one.
    max_header_list_size: Option<usize>,
}

impl HpackDecoder {
    pub fn new(initial_max_dynamic_table_size: usize, max_header_list_size: Option<usize>) -> Self {
        HpackDecoder {
            table: DynamicTable::new(initial_max_dynamic_table_size),
            negotiated_max_size: initial_max_dynamic_table_size,
            max_header_list_size,
        }
    }

    /// Lower the ceiling a future dynamic table size update may request,
    /// e.g. when the local `header_table_size` SETTINGS value changes.
    pub fn set_negotiated_max_size(&mut self, max_size: usize) {
        self.negotiated_max_size = max_size;
        if self.table.max_size() > max_size {
            self.table.set_max_size(max_size);
        }
    }

    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<Header>, HpackError> {
        let mut headers = Vec::new();
        let mut pos = 0;
        let mut list_size = 0usize;
        let mut seen_header_field = false;

        while pos < data.len() {
            let first = data[pos];

            if first & 0b1000_0000 != 0 {
                let (index, len) = decode_integer(&data[pos..], 7)?;
                pos += len;
                let header = self.lookup_indexed(index as usize)?;
                Self::account_for_list_size(&header, &mut list_size, self.max_header_list_size)?;
                headers.push(header);
                seen_header_field = true;
            } else if first & 0b1100_0000 == 0b0100_0000 {
                let (header, len) = self.decode_literal(&data[pos..], 6, true)?;
                pos += len;
                Self::account_for_list_size(&header, &mut list_size, self.max_header_list_size)?;
                headers.push(header);
                seen_header_field = true;
            } else if first & 0b1110_0000 == 0b0010_0000 {
                if seen_header_field {
                    return Err(HpackError::SizeUpdateNotAtStart);
                }
                let (requested, len) = decode_integer(&data[pos..], 5)?;
                pos += len;
                let requested = requested as usize;
                if requested > self.negotiated_max_size {
                    return Err(HpackError::SizeUpdateExceedsLimit {
                        requested,
                        limit: self.negotiated_max_size,
                    });
                }
                self.table.set_max_size(requested);
            } else if first & 0b1111_0000 == 0b0001_0000 {
                let (header, len) = self.decode_literal(&data[pos..], 4, false)?;
                pos += len;
                Self::account_for_list_size(&header, &mut list_size, self.max_header_list_size)?;
                headers.push(header);
                seen_header_field = true;
            } else {
                // 0b0000_xxxx: literal header field without indexing.
                let (header, len) = self.decode_literal(&data[pos..], 4, false)?;
                pos += len;
                Self::account_for_list_size(&header, &mut list_size, self.max_header_list_size)?;
                headers.push(header);
                seen_header_field = true;
            }
        }

        Ok(headers)
    }

    fn lookup_indexed(&self, index: usize) -> Result<Header, HpackError> {
        if index == 0 {
            return Err(HpackError::InvalidIndex(index));
        }
        if index <= 61 {
            let (name, value) = static_table::get(index).ok_or(HpackError::InvalidIndex(index))?;
            return Ok(Header::new(name, value));
        }
        let entry = self
            .table
            .get(index - 61)
            .ok_or(HpackError::InvalidIndex(index))?;
        Ok(Header::new(entry.name.clone(), entry.value.clone()))
    }

    /// Decode a literal representation (with or without incremental
    /// indexing). `prefix_bits` is 6 for incremental indexing, 4 for the
    /// without-indexing/never-indexed forms. Returns the header and total
    /// bytes consumed.
    fn decode_literal(
        &mut self,
        data: &[u8],
        prefix_bits: u8,
        index_result: bool,
    ) -> Result<(Header, usize), HpackError> {
        let (name_index, mut pos) = decode_integer(data, prefix_bits)?;
        let name = if name_index == 0 {
            let (s, len) = self.decode_string(&data[pos..])?;
            pos += len;
            s
        } else {
            let (n, _) = self.lookup_name(name_index as usize)?;
            n
        };
        let (value, len) = self.decode_string(&data[pos..])?;
        pos += len;

        if index_result {
            self.table.add(name.clone(), value.clone());
        }
        Ok((Header::new(name, value), pos))
    }

    fn lookup_name(&self, index: usize) -> Result<(String, Option<String>), HpackError> {
        if index == 0 {
            return Err(HpackError::InvalidIndex(index));
        }
        if index <= 61 {
            let (name, value) = static_table::get(index).ok_or(HpackError::InvalidIndex(index))?;
            return Ok((name.to_string(), Some(value.to_string())));
        }
        let entry = self
            .table
            .get(index - 61)
            .ok_or(HpackError::InvalidIndex(index))?;
        Ok((entry.name.clone(), None))
    }

    fn decode_string(&self, data: &[u8]) -> Result<(String, usize), HpackError> {
        let Some(&first) = data.first() else {
            return Err(HpackError::IncompleteData);
        };
        let huffman_encoded = first & 0b1000_0000 != 0;
        let (len, prefix_len) = decode_integer(data, 7)?;
        let len = len as usize;
        let body = data
            .get(prefix_len..prefix_len + len)
            .ok_or(HpackError::IncompleteData)?;

        let bytes = if huffman_encoded {
            huffman::decode(body)?
        } else {
            body.to_vec()
        };
        let s = String::from_utf8(bytes).map_err(|_| HpackError::InvalidString)?;
        Ok((s, prefix_len + len))
    }

    fn account_for_list_size(
        header: &Header,
        list_size: &mut usize,
        limit: Option<usize>,
    ) -> Result<(), HpackError> {
        // RFC 7541 §4.1 defines a header field's size identically for the
        // list-size accounting used here (name + value octets + 32).
        *list_size += header.name.len() + header.value.len() + super::ENTRY_OVERHEAD;
        if let Some(limit) = limit {
            if *list_size > limit {
                return Err(HpackError::HeaderTooLarge { limit });
            }
        }
        Ok(())
    }
}
