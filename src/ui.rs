use std::io::{self, Write};

// The surface a page workflow is allowed to touch. Workflows never render
// anything themselves; they drive one of these.
pub trait PageUi {
  fn set_user_line(&mut self, text: &str);
  fn show_base_model(&mut self, name: &str, image_url: &str);
  fn show_inline_error(&mut self, message: &str);
  fn clear_inline_error(&mut self);
  fn notify(&mut self, message: &str);
  // true disables the triggering control and shows the busy indicator;
  // false is the unconditional exit
  fn set_busy(&mut self, busy: bool);
  fn show_result(&mut self, image_url: &str);
  fn hide_result(&mut self);
  fn show_preview(&mut self, data_url: &str);
  fn clear_preview(&mut self);
}

pub fn prompt(label: &str) -> anyhow::Result<String> {
  print!("{label}");
  io::stdout().flush()?;
  let mut line = String::new();
  io::stdin().read_line(&mut line)?;
  Ok(line.trim().to_string())
}

#[derive(Default)]
pub struct TerminalUi;

impl TerminalUi {
  pub fn new() -> Self {
    Self
  }
}

impl PageUi for TerminalUi {
  fn set_user_line(&mut self, text: &str) {
    println!("{text}");
  }

  fn show_base_model(&mut self, name: &str, image_url: &str) {
    println!("base model: {name} ({image_url})");
  }

  fn show_inline_error(&mut self, message: &str) {
    eprintln!("! {message}");
  }

  fn clear_inline_error(&mut self) {}

  fn notify(&mut self, message: &str) {
    println!("{message}");
  }

  fn set_busy(&mut self, busy: bool) {
    if busy {
      println!("synthesizing...");
    }
  }

  fn show_result(&mut self, image_url: &str) {
    println!("result: {image_url} (download available)");
  }

  fn hide_result(&mut self) {}

  fn show_preview(&mut self, data_url: &str) {
    let head: String = data_url.chars().take(40).collect();
    println!("preview: {head}...");
  }

  fn clear_preview(&mut self) {}
}

#[cfg(test)]
pub mod testing {
  use super::PageUi;

  #[derive(Default)]
  pub struct MockUi {
    pub user_line: Option<String>,
    pub base_model: Option<(String, String)>,
    pub inline_error: Option<String>,
    pub notices: Vec<String>,
    pub busy_log: Vec<bool>,
    pub result: Option<String>,
    pub preview: Option<String>,
  }

  impl MockUi {
    pub fn busy(&self) -> bool {
      self.busy_log.last().copied().unwrap_or(false)
    }
  }

  impl PageUi for MockUi {
    fn set_user_line(&mut self, text: &str) {
      self.user_line = Some(text.to_string());
    }

    fn show_base_model(&mut self, name: &str, image_url: &str) {
      self.base_model = Some((name.to_string(), image_url.to_string()));
    }

    fn show_inline_error(&mut self, message: &str) {
      self.inline_error = Some(message.to_string());
    }

    fn clear_inline_error(&mut self) {
      self.inline_error = None;
    }

    fn notify(&mut self, message: &str) {
      self.notices.push(message.to_string());
    }

    fn set_busy(&mut self, busy: bool) {
      self.busy_log.push(busy);
    }

    fn show_result(&mut self, image_url: &str) {
      self.result = Some(image_url.to_string());
    }

    fn hide_result(&mut self) {
      self.result = None;
    }

    fn show_preview(&mut self, data_url: &str) {
      self.preview = Some(data_url.to_string());
    }

    fn clear_preview(&mut self) {
      self.preview = None;
    }
  }
}
