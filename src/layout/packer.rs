//! Layout packing: active channels to declaration table.
//!
//! The packer walks the resolved channels in their canonical order and
//! assigns byte offsets from a running cursor: half-float components advance
//! the cursor by 2 bytes, byte components by 1. The half-float block is laid
//! out first, then the byte block continues from where it ended. Each block
//! is padded so its entry count is a multiple of 4 (one property group),
//! which is the alignment the engine's fixed attribute tables require.

use crate::error::{Result, SrtError};
use crate::layout::{LayoutEntry, VertexDecl, DECL_CAPACITY};
use crate::registry;
use crate::resolver::ActiveChannel;
use crate::types::{VertexComponent, VertexFormat, VertexProperty};

/// Pack the resolved channel list into a vertex declaration.
///
/// Deterministic: the same channel list always yields an identical table.
pub fn pack_layout(channels: &[ActiveChannel]) -> Result<VertexDecl> {
    let mut entries: Vec<LayoutEntry> = Vec::with_capacity(DECL_CAPACITY);
    let mut cursor: u16 = 0;

    place_class(&mut entries, &mut cursor, channels, VertexFormat::HalfFloat)?;
    let half_raw = entries.len();
    pad_class(&mut entries, half_raw, &mut cursor, VertexFormat::HalfFloat);
    let half_padded = entries.len();

    place_class(&mut entries, &mut cursor, channels, VertexFormat::Byte)?;
    let byte_raw = entries.len() - half_padded;
    pad_class(&mut entries, byte_raw, &mut cursor, VertexFormat::Byte);

    if entries.len() > DECL_CAPACITY {
        return Err(SrtError::LayoutOverflow {
            entries: entries.len(),
            capacity: DECL_CAPACITY,
        });
    }

    let mut table = [LayoutEntry::UNASSIGNED; DECL_CAPACITY];
    table[..entries.len()].copy_from_slice(&entries);
    Ok(VertexDecl::new(table, cursor))
}

/// Lay out every channel of one format class.
fn place_class(
    entries: &mut Vec<LayoutEntry>,
    cursor: &mut u16,
    channels: &[ActiveChannel],
    class: VertexFormat,
) -> Result<()> {
    for channel in channels {
        if registry::format(channel.property) != class {
            continue;
        }
        place_channel(entries, cursor, channel.property, class);
        if entries.len() > DECL_CAPACITY {
            return Err(SrtError::LayoutOverflow {
                entries: entries.len(),
                capacity: DECL_CAPACITY,
            });
        }
    }
    Ok(())
}

/// Append one channel's component entries at the running cursor.
///
/// Diffuse texcoords are inserted two positions before the end of the
/// accumulated list instead of appended: the engine's fixed attribute-1
/// binding expects them adjacent to the components written after them. The
/// offsets still come from the running cursor at the time the channel is
/// walked.
fn place_channel(
    entries: &mut Vec<LayoutEntry>,
    cursor: &mut u16,
    property: VertexProperty,
    format: VertexFormat,
) {
    let count = registry::component_count(property) as usize;
    let unit = format.unit_size();

    let placed = (0..count).map(|k| LayoutEntry {
        property,
        component: VertexComponent::ALL[k],
        offset: *cursor + k as u16 * unit,
        format,
    });

    if property == VertexProperty::DiffuseTexcoords {
        let at = entries.len().saturating_sub(2);
        entries.splice(at..at, placed);
    } else {
        entries.extend(placed);
    }

    *cursor += count as u16 * unit;
}

/// Pad a format class to a multiple of 4 entries.
///
/// The placeholder count and cursor advance depend on the remainder:
/// remainder 1 takes 3 placeholders and one cursor unit, remainder 2 takes
/// 2 placeholders and no cursor movement, remainder 3 takes 1 placeholder
/// and one cursor unit. This matches the engine's observed stride
/// accounting and keeps the half-float block size a multiple of 4 bytes.
fn pad_class(entries: &mut Vec<LayoutEntry>, class_len: usize, cursor: &mut u16, class: VertexFormat) {
    let (placeholders, advance) = match class_len % 4 {
        1 => (3, 1),
        2 => (2, 0),
        3 => (1, 1),
        _ => (0, 0),
    };
    entries.extend(std::iter::repeat(LayoutEntry::UNASSIGNED).take(placeholders));
    *cursor += advance * class.unit_size();
}
