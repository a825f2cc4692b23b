use crate::api::ApiClient;
use crate::ui::PageUi;
use crate::upload::UploadSelection;

pub const ITEM_TYPES: [&str; 4] = ["top", "bottom", "hair", "shoes"];

#[derive(Debug, PartialEq)]
pub enum InitOutcome {
  Ready,
  RedirectToLogin,
}

#[derive(Debug, PartialEq)]
pub enum Navigation {
  Home,
  Login,
  Stay,
}

// Session check, then reference data. Any failure during the session check
// counts as unauthenticated; a missing base model leaves the page usable.
pub async fn initialize_page(client: &ApiClient, ui: &mut dyn PageUi) -> InitOutcome {
  ui.clear_inline_error();

  let user = match client.user_info().await {
    Ok(info) if info.success => info,
    Ok(_) | Err(_) => return InitOutcome::RedirectToLogin,
  };
  ui.set_user_line(&user.display_line());

  match client.active_base_model().await {
    Ok(model) if model.success && model.image_url.is_some() => {
      let name = model.name.as_deref().unwrap_or("Active Base Model");
      let url = model.image_url.as_deref().unwrap_or_default();
      ui.show_base_model(name, url);
    }
    Ok(_) => ui.show_inline_error("Failed to load the active base model."),
    Err(err) => ui.show_inline_error(&format!("Error loading the base model: {err}")),
  }

  InitOutcome::Ready
}

pub fn validate_login(email: &str, password: &str) -> Result<(), &'static str> {
  if email.is_empty() || password.is_empty() {
    return Err("Enter both email and password.");
  }
  Ok(())
}

pub fn validate_register(email: &str, password: &str, confirm: &str) -> Result<(), &'static str> {
  if email.is_empty() || password.is_empty() || confirm.is_empty() {
    return Err("Fill in all fields.");
  }
  if password != confirm {
    return Err("Passwords do not match.");
  }
  Ok(())
}

pub async fn submit_login(
  client: &ApiClient,
  ui: &mut dyn PageUi,
  email: &str,
  password: &str,
) -> Navigation {
  ui.clear_inline_error();
  if let Err(message) = validate_login(email, password) {
    ui.show_inline_error(message);
    return Navigation::Stay;
  }

  match client.login(email, password).await {
    Ok(result) if result.success() => {
      ui.notify("Login successful!");
      Navigation::Home
    }
    Ok(result) => {
      let message = result.message().unwrap_or("Login failed. Please try again.");
      ui.show_inline_error(message);
      Navigation::Stay
    }
    Err(err) => {
      ui.show_inline_error(&err.to_string());
      Navigation::Stay
    }
  }
}

pub async fn submit_register(
  client: &ApiClient,
  ui: &mut dyn PageUi,
  email: &str,
  password: &str,
  confirm: &str,
) -> Navigation {
  ui.clear_inline_error();
  if let Err(message) = validate_register(email, password, confirm) {
    ui.show_inline_error(message);
    return Navigation::Stay;
  }

  match client.register(email, password).await {
    Ok(result) if result.success() => {
      ui.notify("Registration successful! Continue to log in.");
      Navigation::Login
    }
    Ok(result) => {
      let message = result
        .message()
        .unwrap_or("Registration failed. Please try again.");
      ui.show_inline_error(message);
      Navigation::Stay
    }
    Err(err) => {
      ui.show_inline_error(&err.to_string());
      Navigation::Stay
    }
  }
}

pub async fn submit_logout(client: &ApiClient, ui: &mut dyn PageUi) -> Navigation {
  match client.logout().await {
    Ok(_) => ui.notify("Logged out."),
    Err(err) => ui.notify(&format!("Logout failed: {err}")),
  }
  Navigation::Login
}

// Returns the result locator on success so the caller can offer a download.
pub async fn run_synthesis(
  client: &ApiClient,
  ui: &mut dyn PageUi,
  item_type: &str,
  selection: Option<UploadSelection>,
) -> Option<String> {
  ui.clear_inline_error();

  if item_type.is_empty() {
    ui.notify("Select an item category first.");
    return None;
  }
  let Some(selection) = selection else {
    ui.notify("Choose an item image first.");
    return None;
  };

  // busy state is scoped: entered here, left on every path below
  ui.set_busy(true);
  ui.hide_result();
  let outcome = synthesize_once(client, ui, item_type, selection).await;
  ui.set_busy(false);

  match outcome {
    Ok(url) => Some(url),
    Err(message) => {
      ui.show_inline_error(&format!("Synthesis failed: {message}"));
      None
    }
  }
}

async fn synthesize_once(
  client: &ApiClient,
  ui: &mut dyn PageUi,
  item_type: &str,
  selection: UploadSelection,
) -> Result<String, String> {
  let result = client
    .synthesize(item_type, selection)
    .await
    .map_err(|err| err.to_string())?;

  if !result.success {
    return Err(
      result
        .message
        .unwrap_or_else(|| "unexpected response shape".to_string()),
    );
  }
  let Some(url) = result.result_image_url else {
    return Err("unexpected response shape".to_string());
  };

  ui.show_result(&url);

  // keep the displayed remaining count current; a refresh failure is not
  // allowed to fail the synthesis that already succeeded
  if let Ok(info) = client.user_info().await {
    if info.success {
      ui.set_user_line(&info.display_line());
    }
  }

  Ok(url)
}
