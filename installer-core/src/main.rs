use installer_core::prompt::Prompter;
use installer_core::Outcome;
use std::io;

fn main() {
  let args: Vec<String> = std::env::args().collect();

  let code = match installer_core::run_console(&args) {
    Ok(Outcome::Exited) => return,
    Ok(Outcome::Installed(_)) => 0,
    Err(e) => {
      tracing::error!(error = ?e, "installer aborted");
      println!("Error: {e:#}");
      println!();
      1
    }
  };

  // Keep the console window open when launched by double-click.
  Prompter::new(io::stdin().lock(), io::stdout()).wait_for_enter("Press enter to exit.");
  std::process::exit(code);
}
