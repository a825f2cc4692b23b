use std::path::Path;

use base64::Engine;

use crate::ui::PageUi;

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];

#[derive(Debug, Clone)]
pub struct UploadSelection {
  pub file_name: String,
  pub mime: String,
  pub bytes: Vec<u8>,
}

impl UploadSelection {
  pub fn from_path(path: &Path) -> anyhow::Result<Self> {
    let bytes = std::fs::read(path)?;
    let file_name = path
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("upload")
      .to_string();
    let ext = path
      .extension()
      .and_then(|e| e.to_str())
      .map(|e| e.to_ascii_lowercase());
    let mime = match ext.as_deref() {
      Some("png") => "image/png",
      Some("jpg") => "image/jpg",
      Some("jpeg") => "image/jpeg",
      Some("webp") => "image/webp",
      Some("pdf") => "application/pdf",
      _ => "application/octet-stream",
    }
    .to_string();
    Ok(Self {
      file_name,
      mime,
      bytes,
    })
  }

  pub fn preview_data_url(&self) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
    format!("data:{};base64,{}", self.mime, encoded)
  }
}

// Runs on every picker change. Never touches the network: a disallowed type
// or a cancelled selection only clears local state.
pub fn handle_selection_change(
  picked: Option<UploadSelection>,
  ui: &mut dyn PageUi,
) -> Option<UploadSelection> {
  let Some(picked) = picked else {
    ui.clear_preview();
    return None;
  };

  if !ALLOWED_IMAGE_TYPES.contains(&picked.mime.as_str()) {
    ui.notify("File type not allowed. (png, jpg, jpeg, webp)");
    ui.clear_preview();
    return None;
  }

  ui.show_preview(&picked.preview_data_url());
  ui.clear_inline_error();
  Some(picked)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::testing::MockUi;

  fn picked(mime: &str) -> UploadSelection {
    UploadSelection {
      file_name: "item.bin".to_string(),
      mime: mime.to_string(),
      bytes: vec![0xAA, 0xBB],
    }
  }

  #[test]
  fn disallowed_type_clears_selection_and_preview() {
    let mut ui = MockUi::default();
    ui.show_preview("data:stale");

    let held = handle_selection_change(Some(picked("application/pdf")), &mut ui);
    assert!(held.is_none());
    assert!(ui.preview.is_none());
    assert_eq!(ui.notices.len(), 1);
    assert!(ui.notices[0].contains("not allowed"));
  }

  #[test]
  fn cancelled_selection_clears_held_state() {
    let mut ui = MockUi::default();
    ui.show_preview("data:stale");

    let held = handle_selection_change(None, &mut ui);
    assert!(held.is_none());
    assert!(ui.preview.is_none());
    assert!(ui.notices.is_empty());
  }

  #[test]
  fn allowed_type_is_held_and_previewed() {
    let mut ui = MockUi::default();
    ui.show_inline_error("stale");

    let held = handle_selection_change(Some(picked("image/png")), &mut ui);
    let held = held.expect("png should be held");
    assert_eq!(held.mime, "image/png");
    assert!(ui
      .preview
      .as_deref()
      .unwrap()
      .starts_with("data:image/png;base64,"));
    assert!(ui.inline_error.is_none());
  }

  #[test]
  fn mime_is_inferred_from_the_extension() {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("synthdesk-upload-{}.WEBP", std::process::id()));
    std::fs::write(&path, [1u8, 2, 3]).unwrap();

    let picked = UploadSelection::from_path(&path).unwrap();
    assert_eq!(picked.mime, "image/webp");
    assert_eq!(picked.bytes.len(), 3);

    let _ = std::fs::remove_file(&path);
  }
}
