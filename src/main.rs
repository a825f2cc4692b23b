mod api;
mod config;
mod error;
mod logger;
mod models;
mod ui;
mod upload;
mod workflow;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use api::ApiClient;
use config::AppConfig;
use logger::Logger;
use ui::{prompt, PageUi, TerminalUi};
use upload::UploadSelection;
use workflow::{InitOutcome, Navigation, ITEM_TYPES};

#[derive(Parser)]
#[command(
  name = "synthdesk",
  about = "Terminal client for the SynthDesk image synthesis service"
)]
struct Cli {
  /// Service base URL, overriding the config file.
  #[arg(long)]
  base_url: Option<String>,

  /// Directory for the config file and log (defaults to the platform data dir).
  #[arg(long)]
  data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::data_dir()
      .context("missing platform data dir")?
      .join("synthdesk"),
  };
  std::fs::create_dir_all(&data_dir)?;

  let mut config = config::load_or_init(&data_dir.join("config.json"))?;
  if let Some(base_url) = cli.base_url {
    config.base_url = base_url;
  }

  let logger = Arc::new(Logger::new(&data_dir.join("synthdesk.log"))?);
  logger.info("synthdesk starting up");

  let client = ApiClient::new(&config.base_url, logger.clone())?;
  let mut ui = TerminalUi::new();

  loop {
    match workflow::initialize_page(&client, &mut ui).await {
      InitOutcome::RedirectToLogin => {
        if !auth_menu(&client, &mut ui).await? {
          break;
        }
      }
      InitOutcome::Ready => {
        if !home_menu(&client, &mut ui, &config).await? {
          break;
        }
      }
    }
  }

  logger.info("synthdesk exiting");
  Ok(())
}

async fn auth_menu(client: &ApiClient, ui: &mut TerminalUi) -> anyhow::Result<bool> {
  loop {
    println!();
    println!("1) log in  2) register  q) quit");
    match prompt("> ")?.as_str() {
      "1" => {
        let email = prompt("email: ")?;
        let password = prompt("password: ")?;
        if workflow::submit_login(client, ui, &email, &password).await == Navigation::Home {
          return Ok(true);
        }
      }
      "2" => {
        let email = prompt("email: ")?;
        let password = prompt("password: ")?;
        let confirm = prompt("confirm password: ")?;
        // a successful registration lands back on this menu to log in
        workflow::submit_register(client, ui, &email, &password, &confirm).await;
      }
      "q" => return Ok(false),
      _ => {}
    }
  }
}

async fn home_menu(
  client: &ApiClient,
  ui: &mut TerminalUi,
  config: &AppConfig,
) -> anyhow::Result<bool> {
  let mut selection: Option<UploadSelection> = None;
  let mut last_result: Option<String> = None;

  loop {
    println!();
    println!("1) choose item image  2) synthesize  3) download last result  4) log out  q) quit");
    match prompt("> ")?.as_str() {
      "1" => {
        let path = prompt("image path (empty to clear): ")?;
        let picked = if path.is_empty() {
          None
        } else {
          match UploadSelection::from_path(Path::new(&path)) {
            Ok(picked) => Some(picked),
            Err(err) => {
              ui.show_inline_error(&format!("Could not read file: {err}"));
              continue;
            }
          }
        };
        selection = upload::handle_selection_change(picked, ui);
      }
      "2" => {
        let item_type = prompt(&format!("item category {ITEM_TYPES:?}: "))?;
        if !ITEM_TYPES.contains(&item_type.as_str()) {
          ui.notify("Unknown item category.");
          continue;
        }
        // the held file is consumed by the submission
        if let Some(url) = workflow::run_synthesis(client, ui, &item_type, selection.take()).await {
          last_result = Some(url);
        }
      }
      "3" => {
        let Some(url) = last_result.as_deref() else {
          ui.notify("No synthesis result to download yet.");
          continue;
        };
        match client.download_image(url, Path::new(&config.download_dir)).await {
          Ok(path) => ui.notify(&format!("Saved {}", path.display())),
          Err(err) => ui.show_inline_error(&format!("Download failed: {err}")),
        }
      }
      "4" => {
        workflow::submit_logout(client, ui).await;
        return Ok(true);
      }
      "q" => return Ok(false),
      _ => {}
    }
  }
}
