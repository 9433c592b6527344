// 公共测试辅助函数

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const README: &[u8] = b"hello zipmap\n";
pub const MAIN_RS: &[u8] = b"fn main() {\n    println!(\"hi\");\n}\n";
pub const FILE_MODE: u32 = 0o640;

/// 所有测试条目使用的固定时间戳（DOS 时间精度为 2 秒）
pub fn fixture_time() -> DateTime {
    DateTime::from_date_and_time(2021, 6, 15, 10, 30, 20).unwrap()
}

pub fn fixture_options(method: CompressionMethod) -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(fixture_time())
        .unix_permissions(FILE_MODE)
}

/// 按顺序写入条目，返回完整的 ZIP 字节
pub fn build_zip(entries: &[(&str, &[u8], CompressionMethod)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content, method) in entries {
        writer.start_file(*name, fixture_options(*method)).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// 包含一个目录、一个 stored 条目和一个 deflated 条目的 ZIP
pub fn sample_zip() -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("readme.txt", fixture_options(CompressionMethod::Stored))
        .unwrap();
    writer.write_all(README).unwrap();
    writer
        .add_directory("docs/", SimpleFileOptions::default())
        .unwrap();
    writer
        .start_file("src/main.rs", fixture_options(CompressionMethod::Deflated))
        .unwrap();
    writer.write_all(MAIN_RS).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn new_writer() -> ZipWriter<Cursor<Vec<u8>>> {
    ZipWriter::new(Cursor::new(Vec::new()))
}

pub fn finish(writer: ZipWriter<Cursor<Vec<u8>>>) -> Vec<u8> {
    writer.finish().unwrap().into_inner()
}

/// 把字节写入临时目录中的文件
pub fn write_temp_zip(bytes: &[u8]) -> (TempDir, PathBuf) {
    let tmp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = tmp_dir.path().join("test.zip");
    std::fs::write(&path, bytes).unwrap();
    (tmp_dir, path)
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// 将所有出现的 `from` 替换为等长的 `to`
pub fn replace_all(bytes: &mut [u8], from: &[u8], to: &[u8]) -> usize {
    assert_eq!(from.len(), to.len());
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = find(&bytes[start..], from) {
        let at = start + pos;
        bytes[at..at + to.len()].copy_from_slice(to);
        start = at + to.len();
        count += 1;
    }
    count
}
