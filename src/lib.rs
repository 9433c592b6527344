//! zipmap - 按名称索引的 ZIP 归档辅助库
//!
//! 在 [`zip`] crate 之上提供一层薄封装：
//!
//! - 从文件路径或内存字节构建 名称 → 条目 的索引
//! - 将条目复制到另一个归档（保留名称和压缩方式）
//! - 读取条目解压后的内容
//! - 用新内容重写条目，保留原有头信息
//! - 追加新的未压缩条目
//!
//! ZIP 格式解析、压缩算法和 CRC 校验全部由 `zip` crate 负责。
//!
//! ## 示例
//!
//! ```no_run
//! use std::io::Cursor;
//! use zipmap::{ArchiveIndex, rewrite_entry, write_new_entry};
//!
//! let index = ArchiveIndex::from_path("input.zip").unwrap();
//! let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
//!
//! let entry = index.get("config.txt").unwrap();
//! let mut content = entry.read_content().unwrap();
//! content.extend_from_slice(b"\nextra=1\n");
//! rewrite_entry(&mut writer, entry, &content).unwrap();
//! write_new_entry(&mut writer, "NOTICE", b"patched").unwrap();
//!
//! let bytes = writer.finish().unwrap().into_inner();
//! ```

pub mod error;
pub mod index;
pub mod patch;
pub mod write;

// 重导出常用类型
pub use error::{ArchiveError, EntryOp, ErrorKind, Origin, Result};
pub use index::{ArchiveIndex, EntryHandle, IndexOptions};
pub use patch::{Patch, PatchReport};
pub use write::{copy_entry, copy_entry_raw, read_entry_content, rewrite_entry, write_new_entry};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
