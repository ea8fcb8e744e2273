use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};

use crate::model::{FileInfo, FileKind};
use crate::providers::{ProviderError, ResultStream, SearchContext, SearchProvider};
use crate::result::SearchResult;

pub struct FileSearchProvider;

impl SearchProvider for FileSearchProvider {
    fn id(&self) -> &'static str {
        "files"
    }

    fn search(&self, ctx: &SearchContext, query: &str) -> ResultStream {
        let cfg = &ctx.config;
        if query.trim().is_empty() || !cfg.search_result_files || !ctx.permissions.files {
            return ResultStream::ready(Vec::new());
        }

        let roots = cfg.file_search_roots.clone();
        let max_depth = cfg.file_search_max_depth;
        let limit = cfg.max_file_results as usize;
        let keyword = query.trim().to_lowercase();
        ResultStream::spawn_blocking(self.id(), ctx, move |interrupt| {
            let files = search_files(&roots, &keyword, max_depth, limit, interrupt)?;
            Ok(files.into_iter().map(SearchResult::File).collect())
        })
    }
}

pub fn search_files(
    roots: &[PathBuf],
    keyword: &str,
    max_depth: usize,
    limit: usize,
    interrupt: &CancellationToken,
) -> Result<Vec<FileInfo>, ProviderError> {
    let mut found = Vec::new();
    for root in roots {
        if !root.is_dir() {
            continue;
        }
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry));
        for entry in walker {
            if interrupt.is_cancelled() {
                return Ok(Vec::new());
            }
            let Ok(entry) = entry else {
                continue;
            };
            let name = entry.file_name().to_string_lossy();
            if !name.to_lowercase().contains(keyword) {
                continue;
            }
            if let Some(info) = file_info(&entry) {
                found.push(info);
            }
        }
    }

    found.sort_by(|a, b| {
        b.modified_epoch_millis
            .cmp(&a.modified_epoch_millis)
            .then_with(|| a.path.cmp(&b.path))
    });
    found.truncate(limit);
    Ok(found)
}

// Roots are searched even when their own name is dot-prefixed.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn file_info(entry: &DirEntry) -> Option<FileInfo> {
    let metadata = entry.metadata().ok()?;
    let kind = if metadata.is_dir() {
        FileKind::Folder
    } else if metadata.is_file() {
        FileKind::File
    } else {
        return None;
    };
    let modified_epoch_millis = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    let path = entry.path();

    Some(FileInfo {
        path: path.to_string_lossy().into_owned(),
        title: entry.file_name().to_string_lossy().into_owned(),
        size: if kind == FileKind::File { metadata.len() } else { 0 },
        modified_epoch_millis,
        mime_type: match kind {
            FileKind::File => mime_type_for(path).map(str::to_string),
            FileKind::Folder => None,
        },
        kind,
    })
}

pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "txt" | "md" | "log" => "text/plain",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "mkv" => "video/x-matroska",
        "zip" => "application/zip",
        "apk" => "application/vnd.android.package-archive",
        "json" => "application/json",
        "doc" | "docx" => "application/msword",
        "xls" | "xlsx" => "application/vnd.ms-excel",
        _ => return None,
    };
    Some(mime)
}
