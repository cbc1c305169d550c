use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::document::{parse_document, XmlNode};
use crate::error::{AnalyzerError, Result};

/// 递归查找指定扩展名的导出文件，按路径排序
pub fn find_documents(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.');
    let mut documents = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|source| AnalyzerError::Walk {
            path: directory.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            documents.push(entry.into_path());
        }
    }

    documents.sort();
    log::debug!("Found {} document(s) under {}", documents.len(), directory.display());
    Ok(documents)
}

/// 解码文件内容：优先 UTF-8，失败时按 Latin-1 逐字节解码
pub fn read_text(bytes: Vec<u8>) -> String {
    let bytes = if bytes.starts_with(b"\xEF\xBB\xBF") {
        bytes[3..].to_vec()
    } else {
        bytes
    };

    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("Not valid UTF-8 ({}), decoding as Latin-1", e.utf8_error());
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

/// 读取并解析一份文档；读取或解析失败都是致命错误
pub fn load_document(path: &Path) -> Result<XmlNode> {
    let bytes = fs::read(path).map_err(|source| AnalyzerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_document(&read_text(bytes)).map_err(|source| AnalyzerError::Document {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Parsed {} (root <{}>)", path.display(), document.tag());
    Ok(document)
}
