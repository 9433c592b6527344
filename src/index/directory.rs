//! Entry names in central-directory order, duplicates included.
//!
//! The `zip` reader merges entries that share a name, so the raw directory
//! is walked here to see every occurrence.

use std::collections::HashMap;

const END_OF_CENTRAL_DIR_SIG: u32 = 0x06054b50;
const CENTRAL_DIR_HEADER_SIG: u32 = 0x02014b50;
const EOCD_SIZE: usize = 22;
const CENTRAL_DIR_HEADER_SIZE: usize = 46;
const MAX_COMMENT_LEN: usize = 65535;

fn le_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn le_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

/// 从文件末尾向前查找 EOCD，注释长度必须正好延伸到末尾
fn find_eocd(data: &[u8]) -> Option<usize> {
    let last = data.len().checked_sub(EOCD_SIZE)?;
    let first = last.saturating_sub(MAX_COMMENT_LEN);
    (first..=last).rev().find(|&at| {
        le_u32(data, at) == Some(END_OF_CENTRAL_DIR_SIG)
            && le_u16(data, at + 20).map(|len| at + EOCD_SIZE + usize::from(len))
                == Some(data.len())
    })
}

/// Names of all central-directory headers, in order.
///
/// Returns `None` when the directory cannot be walked without zip64
/// records or is inconsistent; callers then rely on the library's view.
pub(crate) fn scan_names(data: &[u8]) -> Option<Vec<String>> {
    let eocd = find_eocd(data)?;
    let count = le_u16(data, eocd + 10)?;
    let size = le_u32(data, eocd + 12)?;
    let offset = le_u32(data, eocd + 16)?;
    if count == u16::MAX || size == u32::MAX || offset == u32::MAX {
        return None;
    }

    // 目录紧贴在 EOCD 之前，这样也能处理前置数据
    let mut at = eocd.checked_sub(usize::try_from(size).ok()?)?;
    let mut names = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        if le_u32(data, at)? != CENTRAL_DIR_HEADER_SIG {
            return None;
        }
        let name_len = usize::from(le_u16(data, at + 28)?);
        let extra_len = usize::from(le_u16(data, at + 30)?);
        let comment_len = usize::from(le_u16(data, at + 32)?);
        let name_start = at + CENTRAL_DIR_HEADER_SIZE;
        let name = data.get(name_start..name_start + name_len)?;
        names.push(String::from_utf8_lossy(name).into_owned());
        at = name_start + name_len + extra_len + comment_len;
    }
    (at == eocd).then_some(names)
}

/// Directory position of the last occurrence of each name, plus one entry
/// per occurrence that replaced an earlier one.
pub(crate) fn last_positions(names: &[String]) -> (HashMap<&str, usize>, Vec<String>) {
    let mut positions = HashMap::with_capacity(names.len());
    let mut replaced = Vec::new();
    for (position, name) in names.iter().enumerate() {
        if positions.insert(name.as_str(), position).is_some() {
            replaced.push(name.clone());
        }
    }
    (positions, replaced)
}
