use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct UserAccount {
  pub email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserInfo {
  #[serde(default)]
  pub success: bool,
  pub user: Option<UserAccount>,
  pub remaining_attempts: Option<i64>,
}

impl UserInfo {
  pub fn display_line(&self) -> String {
    let email = self
      .user
      .as_ref()
      .map(|u| u.email.as_str())
      .unwrap_or("unknown");
    let remaining = self
      .remaining_attempts
      .map(|n| n.to_string())
      .unwrap_or_else(|| "?".to_string());
    format!("Welcome, {email}! | remaining: {remaining}")
  }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActiveBaseModel {
  #[serde(default)]
  pub success: bool,
  pub name: Option<String>,
  pub image_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SynthesisResult {
  #[serde(default)]
  pub success: bool,
  pub result_image_url: Option<String>,
  pub message: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_line_with_full_info() {
    let info = UserInfo {
      success: true,
      user: Some(UserAccount {
        email: "a@b.com".to_string(),
      }),
      remaining_attempts: Some(2),
    };
    assert_eq!(info.display_line(), "Welcome, a@b.com! | remaining: 2");
  }

  #[test]
  fn display_line_falls_back_on_missing_fields() {
    let info = UserInfo {
      success: true,
      user: None,
      remaining_attempts: None,
    };
    assert_eq!(info.display_line(), "Welcome, unknown! | remaining: ?");
  }
}
