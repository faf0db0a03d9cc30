//! The outline on disk: one JSON tree of `{id, content, children?}` records.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{info, warn};

use crate::error::DocumentError;
use crate::outline::{BlockRecord, Outline};

pub fn to_json(outline: &Outline) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&outline.to_record()?)?)
}

pub fn from_json(json: &str) -> Result<Outline, DocumentError> {
    let record: BlockRecord = serde_json::from_str(json)?;
    let mut outline = Outline::from_record(record)?;
    outline.ensure_initialized();
    Ok(outline)
}

/// Reads the outline at `path`, or the built-in page when nothing is saved
/// there yet. The flag reports whether the file existed.
pub fn load(path: &Path) -> Result<(Outline, bool), DocumentError> {
    match fs::read_to_string(path) {
        Ok(json) => {
            let outline = from_json(&json)?;
            info!(path = %path.display(), blocks = outline.len(), "loaded outline");
            Ok((outline, true))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok((default_outline(), false)),
        Err(err) => Err(err.into()),
    }
}

pub struct Opened {
    pub outline: Outline,
    /// False when a file exists at the path but could not be read. Writing
    /// back would destroy it, so saving waits for an explicit request.
    pub writable: bool,
    pub status: Option<String>,
}

/// Like [`load`], but never fails: an unreadable document falls back to the
/// built-in page and is marked read-only.
pub fn open(path: &Path) -> Opened {
    match load(path) {
        Ok((outline, existed)) => Opened {
            outline,
            writable: true,
            status: (!existed).then(|| "New outline".to_string()),
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "falling back to the default page");
            Opened {
                outline: default_outline(),
                writable: false,
                status: Some(format!(
                    "Could not read {}: {err}. Autosave is off; Ctrl-S overwrites it.",
                    path.display()
                )),
            }
        }
    }
}

/// Writes through a sibling temp file so a crash never leaves half a
/// document behind.
pub fn save(path: &Path, outline: &Outline) -> Result<(), DocumentError> {
    let json = to_json(outline)?;
    let temp = temp_path(path);
    fs::write(&temp, json)?;
    fs::rename(&temp, path)?;
    info!(path = %path.display(), blocks = outline.len(), "saved outline");
    Ok(())
}

/// Forgets the saved document. Returns whether there was one.
pub fn clear(path: &Path) -> Result<bool, DocumentError> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "cleared saved outline");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// The page shown on first start: a short tour of the key bindings.
pub fn default_outline() -> Outline {
    fn b(content: &str) -> BlockRecord {
        BlockRecord::new(content)
    }

    let page = b("").with_children(vec![
        b("This is a playground for a plain-text outliner in the terminal"),
        b(""),
        b("Everything is a block, and blocks nest").with_children(vec![b(
            "The whole page is saved as JSON after every structural edit",
        )]),
        b("Features").with_children(vec![
            b("Create, edit, and delete blocks"),
            b("State inspection").with_children(vec![b(
                "Press F2 to see the current outline as JSON in the right pane",
            )]),
            b("Key bindings").with_children(vec![
                b("tab: increase level"),
                b("shift+tab: decrease level"),
                b("enter: add a new block after the current block").with_children(vec![
                    b("Adds a sibling if the current block has no children, or a first child if it does"),
                    b("The cursor moves to the new block"),
                ]),
                b("shift+enter or alt+enter: insert a newline"),
                b("backspace at the start of a block: merge it into the block above"),
                b("arrow up/down: move to the previous/next visual line").with_children(vec![
                    b("\"The next visual line\" is the line right below the current one as it appears on screen, taking wrapping into account.")
                        .with_children(vec![
                            b("If the caret is on the last visual line of the block, it goes to the first line of the next block."),
                            b("Otherwise it goes to the next visual line of the current block."),
                        ]),
                    b("The column is preserved"),
                ]),
                b("ctrl+a: move the cursor to the beginning of the line"),
                b("ctrl+e: move the cursor to the end of the line"),
                b("ctrl+s: save, ctrl+k: clear the saved document, ctrl+q: quit"),
            ]),
        ]),
    ]);
    Outline::from_record(page).unwrap_or_default()
}
